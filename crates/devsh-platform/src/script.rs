//! File-backed script tasks.
//!
//! A script is read from `<dir>/<base>.<ext>` and registered both as a
//! device and as a monitored task. Its source is held as text; running it is
//! up to whoever drives the task.

use std::fmt;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};

use devsh_types::error::{DevshError, Result};
use devsh_types::{Literal, Value};

use crate::services::{Device, DeviceHandle, ScriptFactory};

/// Lifecycle state of a script task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    Loaded,
    Running,
    Stopped,
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Loaded => write!(f, "loaded"),
            Self::Running => write!(f, "running"),
            Self::Stopped => write!(f, "stopped"),
        }
    }
}

/// A loaded script.
///
/// Attributes: `path`, `args`, `state`, `lines`. Methods: `line(n)`
/// (1-based), `source()`.
#[derive(Debug)]
pub struct ScriptTask {
    id: String,
    path: PathBuf,
    args: Vec<String>,
    source: Vec<String>,
    state: Mutex<TaskState>,
}

impl ScriptTask {
    pub fn new(
        id: impl Into<String>,
        path: impl Into<PathBuf>,
        args: &[String],
        source: &str,
    ) -> Self {
        Self {
            id: id.into(),
            path: path.into(),
            args: args.to_vec(),
            source: source.lines().map(str::to_string).collect(),
            state: Mutex::new(TaskState::Loaded),
        }
    }

    pub fn state(&self) -> TaskState {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn set_state(&self, next: TaskState) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        log::debug!("script {}: {} -> {next}", self.id, *state);
        *state = next;
    }
}

impl Device for ScriptTask {
    fn id(&self) -> &str {
        &self.id
    }

    fn describe(&self) -> String {
        format!("script {} ({})", self.path.display(), self.state())
    }

    fn ready(&self) -> bool {
        self.state() != TaskState::Stopped
    }

    fn start(&self) -> Result<()> {
        self.set_state(TaskState::Running);
        Ok(())
    }

    fn stop(&self) -> Result<()> {
        self.set_state(TaskState::Stopped);
        Ok(())
    }

    fn get_attribute(&self, name: &str) -> Result<Option<Value>> {
        match name {
            "path" => Ok(Some(Value::Text(self.path.display().to_string()))),
            "args" => Ok(Some(Value::List(
                self.args.iter().map(|a| Value::Text(a.clone())).collect(),
            ))),
            "state" => Ok(Some(Value::Text(self.state().to_string()))),
            "lines" => Ok(Some(Value::Int(self.source.len() as i64))),
            _ => Err(DevshError::member_not_found(
                name,
                format!("script {} has no attribute '{name}'", self.id),
            )),
        }
    }

    fn call(&self, method: &str, params: &[Literal]) -> Result<Option<Value>> {
        match (method, params) {
            ("source", []) => Ok(Some(Value::Text(self.source.join("\n")))),
            ("line", [param]) => {
                let n = param.as_int().ok_or_else(line_usage)?;
                let idx = usize::try_from(n)
                    .ok()
                    .and_then(|n| n.checked_sub(1))
                    .filter(|&i| i < self.source.len())
                    .ok_or_else(|| {
                        DevshError::InvocationFailed(format!(
                            "line {n} out of range 1..={}",
                            self.source.len()
                        ))
                    })?;
                Ok(Some(Value::Text(self.source[idx].clone())))
            },
            ("line", _) => Err(line_usage()),
            _ => Err(DevshError::member_not_found(
                method,
                format!("script {} has no method '{method}'", self.id),
            )),
        }
    }
}

fn line_usage() -> DevshError {
    DevshError::InvocationFailed("usage: line(<number>)".to_string())
}

/// Builds [`ScriptTask`]s from files with one extension in one directory.
#[derive(Debug, Clone)]
pub struct FileScriptFactory {
    dir: PathBuf,
    extension: String,
}

impl FileScriptFactory {
    pub fn new(dir: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            extension: extension.into(),
        }
    }

    /// Path a base name resolves to.
    pub fn script_path(&self, base_name: &str) -> PathBuf {
        self.dir.join(format!("{base_name}.{}", self.extension))
    }
}

impl ScriptFactory for FileScriptFactory {
    fn create_script(&self, base_name: &str, args: &[String]) -> Result<DeviceHandle> {
        if base_name.is_empty()
            || base_name.contains(['.', '/', '\\'])
            || base_name.contains(char::is_whitespace)
        {
            return Err(DevshError::Script(format!("invalid script name: '{base_name}'")));
        }
        let path = self.script_path(base_name);
        if !path.is_file() {
            return Err(DevshError::Script(format!(
                "script not found: {}",
                path.display()
            )));
        }
        let source = std::fs::read_to_string(&path)?;
        log::info!("loaded script {base_name} from {}", path.display());
        Ok(Arc::new(ScriptTask::new(base_name, path, args, &source)))
    }
}
