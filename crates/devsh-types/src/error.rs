//! Error types for devsh.

use std::io;

/// Errors produced by the device shell.
#[derive(Debug, thiserror::Error)]
pub enum DevshError {
    #[error("Device not found: {0}")]
    DeviceNotFound(String),

    #[error("member not found: {member}: {message}")]
    MemberNotFound { member: String, message: String },

    #[error("ambiguous parameter type: {0}")]
    AmbiguousParameterType(String),

    #[error("No script name specified")]
    EmptyScriptName,

    #[error("invocation failed: {0}")]
    InvocationFailed(String),

    #[error("script error: {0}")]
    Script(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

impl DevshError {
    /// Shorthand for a [`DevshError::MemberNotFound`].
    pub fn member_not_found(member: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MemberNotFound {
            member: member.into(),
            message: message.into(),
        }
    }

    /// Whether this failure is one the interpreter reports and recovers from.
    ///
    /// Everything else coming out of a device or the invocation capability
    /// is passed back to the caller untouched.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::DeviceNotFound(_)
                | Self::MemberNotFound { .. }
                | Self::AmbiguousParameterType(_)
                | Self::EmptyScriptName
        )
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, DevshError>;
