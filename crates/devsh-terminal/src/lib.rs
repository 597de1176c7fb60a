//! Command interpreter for the device shell.
//!
//! A line is classified into a builtin, a `load`, a lifecycle command, or a
//! device interaction (`id`, `id.attr`, `id.attr = value`, `id.method(args)`).
//! The [`Interpreter`] resolves the device and applies the operation through
//! the injected [`devsh_platform::Invoker`], reporting to a
//! [`devsh_platform::MessageSink`].

pub mod command;
mod interpreter;
mod loader;
pub mod parse;

/// Parsed command forms.
pub use command::{DeviceOperation, LifecycleAction, ParsedCommand, classify};
/// Dispatching interpreter and the services it borrows.
pub use interpreter::{Interpreter, Services};
/// `load` orchestration.
pub use loader::ScriptLoader;
pub use parse::{device_identifier, parse_device_operation};

#[cfg(test)]
mod tests;
