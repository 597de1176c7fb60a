//! Command forms and the classifier that picks one for a line.

use std::fmt;

use devsh_types::Literal;
use devsh_types::error::Result;

use crate::parse::parse_device_operation;

/// What to do with a resolved device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceOperation {
    /// `lamp`
    Describe,
    /// `lamp.brightness`
    GetAttribute { name: String },
    /// `lamp.brightness = 10` (value kept as raw text)
    SetAttribute { name: String, raw_value: String },
    /// `lamp.blink("slow", 3)`
    InvokeMethod { name: String, params: Vec<Literal> },
}

/// Lifecycle commands: `start <id>`, `stop <id>`, `restart <id>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleAction {
    Start,
    Stop,
    Restart,
}

impl LifecycleAction {
    fn from_keyword(word: &str) -> Option<Self> {
        match word {
            "start" => Some(Self::Start),
            "stop" => Some(Self::Stop),
            "restart" => Some(Self::Restart),
            _ => None,
        }
    }

    /// Progressive form used in messages ("starting").
    pub fn verb(&self) -> &'static str {
        match self {
            Self::Start => "starting",
            Self::Stop => "stopping",
            Self::Restart => "restarting",
        }
    }
}

impl fmt::Display for LifecycleAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Start => write!(f, "start"),
            Self::Stop => write!(f, "stop"),
            Self::Restart => write!(f, "restart"),
        }
    }
}

/// A classified input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedCommand {
    Exit,
    ListDevices,
    ListTasks,
    Help,
    /// `load <name> [args...]`. `name` is empty when missing.
    LoadScript { name: String, args: Vec<String> },
    Lifecycle {
        action: LifecycleAction,
        device_id: String,
    },
    DeviceInteraction {
        device_id: String,
        operation: DeviceOperation,
    },
    Unrecognized,
}

/// Classify one line.
///
/// Builtins are exact matches; `load` and the lifecycle keywords are matched
/// on the first whitespace-separated token. Anything else is handed to the
/// device-operation parser. Fails only when a method-call argument is not a
/// valid literal.
pub fn classify(line: &str) -> Result<ParsedCommand> {
    match line {
        "exit" => return Ok(ParsedCommand::Exit),
        "devices" => return Ok(ParsedCommand::ListDevices),
        "tasks" => return Ok(ParsedCommand::ListTasks),
        "help" => return Ok(ParsedCommand::Help),
        _ => {},
    }

    let tokens: Vec<&str> = line.split_whitespace().collect();
    match tokens.as_slice() {
        ["load", rest @ ..] => {
            let (name, args) = match rest {
                [] => (String::new(), Vec::new()),
                [name, args @ ..] => (
                    (*name).to_string(),
                    args.iter().map(|a| (*a).to_string()).collect(),
                ),
            };
            return Ok(ParsedCommand::LoadScript { name, args });
        },
        [keyword, device_id] => {
            if let Some(action) = LifecycleAction::from_keyword(keyword) {
                return Ok(ParsedCommand::Lifecycle {
                    action,
                    device_id: (*device_id).to_string(),
                });
            }
        },
        _ => {},
    }

    parse_device_operation(line)
}

/// Lines shown by `help`.
pub const HELP_TEXT: &[&str] = &[
    "Commands:",
    "  devices                   list registered devices",
    "  tasks                     list monitored tasks",
    "  load <script> [args...]   load or reload a script",
    "  start|stop|restart <id>   control a device's lifecycle",
    "  <id>                      describe a device",
    "  <id>.<attr>               read an attribute",
    "  <id>.<attr> = <value>     assign an attribute",
    "  <id>.<method>(args...)    call a method (args: \"text\" or integers)",
    "  exit                      leave the shell",
];
