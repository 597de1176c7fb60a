//! Message sinks: one that logs, one that records.

use std::sync::{Mutex, PoisonError};

use crate::services::MessageSink;

/// Log target used for user-facing output.
pub const OUTPUT_TARGET: &str = "devsh";

/// Routes messages to the `log` facade: message → info, warning → warn,
/// error → error.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl MessageSink for LogSink {
    fn message(&self, text: &str) {
        log::info!(target: OUTPUT_TARGET, "{text}");
    }

    fn warning(&self, text: &str) {
        log::warn!(target: OUTPUT_TARGET, "{text}");
    }

    fn error(&self, text: &str) {
        log::error!(target: OUTPUT_TARGET, "{text}");
    }
}

/// Severity of a recorded message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Message,
    Warning,
    Error,
}

/// Keeps every message in memory, in order.
#[derive(Debug, Default)]
pub struct BufferSink {
    entries: Mutex<Vec<(Level, String)>>,
}

impl BufferSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All entries in emission order.
    pub fn entries(&self) -> Vec<(Level, String)> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn messages(&self) -> Vec<String> {
        self.of(Level::Message)
    }

    pub fn warnings(&self) -> Vec<String> {
        self.of(Level::Warning)
    }

    pub fn errors(&self) -> Vec<String> {
        self.of(Level::Error)
    }

    pub fn is_empty(&self) -> bool {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_empty()
    }

    pub fn clear(&self) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    fn of(&self, level: Level) -> Vec<String> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, text)| text.clone())
            .collect()
    }

    fn push(&self, level: Level, text: &str) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((level, text.to_string()));
    }
}

impl MessageSink for BufferSink {
    fn message(&self, text: &str) {
        self.push(Level::Message, text);
    }

    fn warning(&self, text: &str) {
        self.push(Level::Warning, text);
    }

    fn error(&self, text: &str) {
        self.push(Level::Error, text);
    }
}
