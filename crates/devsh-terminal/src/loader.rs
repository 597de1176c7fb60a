//! The `load` command: replace-or-create a script task.

use std::sync::Arc;

use devsh_platform::{DeviceRegistry, MessageSink, ScriptFactory, TaskMonitor};
use devsh_types::error::{DevshError, Result};

/// Loads scripts through one of two factories and swaps them into the
/// registry and the task monitor.
///
/// Names ending in the secondary suffix (`.rb`, say) go to the secondary
/// factory with the suffix stripped; everything else goes to the primary
/// factory as-is.
pub struct ScriptLoader<'a> {
    primary: &'a dyn ScriptFactory,
    secondary: &'a dyn ScriptFactory,
    secondary_suffix: String,
    registry: &'a dyn DeviceRegistry,
    monitor: &'a dyn TaskMonitor,
    sink: &'a dyn MessageSink,
}

impl<'a> ScriptLoader<'a> {
    pub fn new(
        primary: &'a dyn ScriptFactory,
        secondary: &'a dyn ScriptFactory,
        secondary_suffix: impl Into<String>,
        registry: &'a dyn DeviceRegistry,
        monitor: &'a dyn TaskMonitor,
        sink: &'a dyn MessageSink,
    ) -> Self {
        Self {
            primary,
            secondary,
            secondary_suffix: secondary_suffix.into(),
            registry,
            monitor,
            sink,
        }
    }

    /// Load (or reload) `name` with `args`.
    ///
    /// Any existing entry under the base name is stopped and unregistered
    /// before the factory runs. Failures are reported to the sink and
    /// returned.
    pub fn load(&self, name: &str, args: &[String]) -> Result<()> {
        let result = self.replace(name, args);
        match &result {
            Ok(base) => self.sink.message(&format!(" -- loaded script: {base}")),
            Err(e) => self.sink.error(&e.to_string()),
        }
        result.map(|_| ())
    }

    /// Which factory handles `name`, and the base name it is given.
    fn select<'n>(&self, name: &'n str) -> (&'a dyn ScriptFactory, &'n str) {
        match name.strip_suffix(self.secondary_suffix.as_str()) {
            Some(base) if !base.is_empty() => (self.secondary, base),
            _ => (self.primary, name),
        }
    }

    fn replace<'n>(&self, name: &'n str, args: &[String]) -> Result<&'n str> {
        if name.is_empty() {
            return Err(DevshError::EmptyScriptName);
        }
        let (factory, base) = self.select(name);
        log::debug!("load: {name} -> base '{base}', {} arg(s)", args.len());

        if let Some(existing) = self.registry.get(base) {
            if existing.ready() {
                self.monitor.remove_monitorable(existing.as_ref());
                if let Err(e) = existing.stop() {
                    self.sink.warning(&format!("Failed to stop previous {base}: {e}"));
                }
            }
            self.registry.remove(base);
        }

        let script = factory.create_script(base, args)?;
        self.monitor.add_monitorable(Arc::clone(&script));
        self.registry.add(script);
        Ok(base)
    }
}
