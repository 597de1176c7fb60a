//! Line interpreter: classify, resolve, invoke, report.

use devsh_platform::{
    Device, DeviceRegistry, Invoker, MessageSink, RunLoop, ScriptFactory, TaskMonitor,
};
use devsh_types::error::{DevshError, Result};

use crate::command::{DeviceOperation, HELP_TEXT, LifecycleAction, ParsedCommand, classify};
use crate::loader::ScriptLoader;
use crate::parse::device_identifier;

/// Everything the interpreter talks to.
pub struct Services<'a> {
    /// Devices (loaded scripts included) by identifier.
    pub registry: &'a dyn DeviceRegistry,
    /// Get/set/invoke on a resolved device.
    pub invoker: &'a dyn Invoker,
    /// Tracks loaded script tasks.
    pub monitor: &'a dyn TaskMonitor,
    /// Destination for every message, warning and error.
    pub sink: &'a dyn MessageSink,
    /// Stopped by `exit`.
    pub run_loop: &'a dyn RunLoop,
    /// Factory for plain script names.
    pub primary_factory: &'a dyn ScriptFactory,
    /// Factory for names ending in `secondary_suffix`.
    pub secondary_factory: &'a dyn ScriptFactory,
    /// Name suffix (`.rb`, say) that selects the secondary factory.
    pub secondary_suffix: &'a str,
}

/// Interprets one command line at a time against borrowed services.
pub struct Interpreter<'a> {
    registry: &'a dyn DeviceRegistry,
    invoker: &'a dyn Invoker,
    monitor: &'a dyn TaskMonitor,
    sink: &'a dyn MessageSink,
    run_loop: &'a dyn RunLoop,
    loader: ScriptLoader<'a>,
}

impl<'a> Interpreter<'a> {
    pub fn new(services: Services<'a>) -> Self {
        let loader = ScriptLoader::new(
            services.primary_factory,
            services.secondary_factory,
            services.secondary_suffix,
            services.registry,
            services.monitor,
            services.sink,
        );
        Self {
            registry: services.registry,
            invoker: services.invoker,
            monitor: services.monitor,
            sink: services.sink,
            run_loop: services.run_loop,
            loader,
        }
    }

    /// Interpret a single line.
    ///
    /// Returns `Ok(true)` when the line was handled, `Ok(false)` when it was
    /// not a command or named a device that is not registered. Errors from
    /// the invocation capability other than a missing member are returned
    /// as-is; everything else is reported to the sink.
    pub fn interpret(&self, line: &str) -> Result<bool> {
        let line = line.trim();
        let command = match classify(line) {
            Ok(command) => command,
            Err(e @ DevshError::AmbiguousParameterType(_)) => {
                return Ok(self.report_parse_failure(line, &e));
            },
            Err(e) => return Err(e),
        };
        log::debug!("interpret: {line:?} -> {command:?}");

        match command {
            ParsedCommand::Exit => {
                self.run_loop.stop();
                Ok(true)
            },
            ParsedCommand::ListDevices => {
                self.registry.print_devices(self.sink);
                Ok(true)
            },
            ParsedCommand::ListTasks => {
                self.monitor.print_tasks(self.sink);
                Ok(true)
            },
            ParsedCommand::Help => {
                self.sink.message(&HELP_TEXT.join("\n"));
                Ok(true)
            },
            ParsedCommand::LoadScript { name, args } => {
                if let Err(e) = self.loader.load(&name, &args) {
                    log::debug!("load {name:?} failed: {e}");
                }
                Ok(true)
            },
            ParsedCommand::Lifecycle { action, device_id } => {
                self.lifecycle(action, &device_id)?;
                Ok(true)
            },
            ParsedCommand::DeviceInteraction {
                device_id,
                operation,
            } => self.dispatch(&device_id, &operation),
            ParsedCommand::Unrecognized => Ok(false),
        }
    }

    fn dispatch(&self, device_id: &str, operation: &DeviceOperation) -> Result<bool> {
        let Some(device) = self.registry.get(device_id) else {
            self.warn_missing(device_id);
            return Ok(false);
        };
        let device: &dyn Device = device.as_ref();

        let outcome = match operation {
            DeviceOperation::Describe => {
                self.sink.message(&device.describe());
                return Ok(true);
            },
            DeviceOperation::GetAttribute { name } => self.invoker.get(device, name),
            DeviceOperation::SetAttribute { name, raw_value } => {
                self.invoker.set(device, name, raw_value).map(|()| None)
            },
            DeviceOperation::InvokeMethod { name, params } => {
                self.invoker.invoke(device, name, params)
            },
        };

        match outcome {
            Ok(Some(value)) => self.sink.message(&value.to_string()),
            Ok(None) => {},
            Err(DevshError::MemberNotFound { member, message }) => {
                self.sink
                    .error(&format!("{device_id}: missing member '{member}': {message}"));
            },
            Err(e) => return Err(e),
        }
        Ok(true)
    }

    fn lifecycle(&self, action: LifecycleAction, device_id: &str) -> Result<()> {
        let Some(device) = self.registry.get(device_id) else {
            self.sink.warning(&format!("No device named: {device_id}"));
            return Ok(());
        };
        self.sink.message(&format!(" -- {}: {device_id}", action.verb()));
        match action {
            LifecycleAction::Start => device.start(),
            LifecycleAction::Stop => device.stop(),
            LifecycleAction::Restart => {
                device.stop()?;
                device.start()
            },
        }
    }

    /// A bad method argument. An unknown device still takes precedence.
    fn report_parse_failure(&self, line: &str, error: &DevshError) -> bool {
        let device_id = device_identifier(line);
        if !self.registry.has(device_id) {
            self.warn_missing(device_id);
            return false;
        }
        self.sink.error(&format!("{device_id}: {error}"));
        true
    }

    fn warn_missing(&self, device_id: &str) {
        let e = DevshError::DeviceNotFound(device_id.to_string());
        self.sink.warning(&e.to_string());
    }
}
