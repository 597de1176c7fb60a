//! Printable values returned by devices.

use std::fmt;

use serde::Deserialize;

use crate::literal::Literal;

/// A value read from or stored on a device.
///
/// Getters and method calls return `Option<Value>`; `None` stands for "no
/// result" and is never printed.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    List(Vec<Value>),
}

impl Value {
    /// Short type name used in messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Int(_) => "integer",
            Self::Float(_) => "float",
            Self::Text(_) => "text",
            Self::List(_) => "list",
        }
    }

    /// Guess the type of raw assignment text.
    ///
    /// `true`/`false`, integers and floats are recognised; a double-quoted
    /// token loses its quotes; anything else is kept as text.
    pub fn infer(raw: &str) -> Self {
        let raw = raw.trim();
        if let Ok(b) = raw.parse::<bool>() {
            return Self::Bool(b);
        }
        if let Ok(n) = raw.parse::<i64>() {
            return Self::Int(n);
        }
        if let Ok(f) = raw.parse::<f64>() {
            return Self::Float(f);
        }
        Self::Text(unquote(raw).to_string())
    }

    /// Convert raw assignment text to the same type as `self`.
    ///
    /// Returns `None` when the text does not fit. Integers widen into float
    /// attributes; lists accept a comma separated sequence of inferred items.
    pub fn coerce(&self, raw: &str) -> Option<Self> {
        let raw = raw.trim();
        match self {
            Self::Bool(_) => match raw {
                "true" | "on" | "1" => Some(Self::Bool(true)),
                "false" | "off" | "0" => Some(Self::Bool(false)),
                _ => None,
            },
            Self::Int(_) => raw.parse().ok().map(Self::Int),
            Self::Float(_) => raw.parse().ok().map(Self::Float),
            Self::Text(_) => Some(Self::Text(unquote(raw).to_string())),
            Self::List(_) => {
                let inner = raw
                    .strip_prefix('[')
                    .and_then(|r| r.strip_suffix(']'))
                    .unwrap_or(raw);
                Some(Self::List(
                    inner
                        .split(',')
                        .map(str::trim)
                        .filter(|s| !s.is_empty())
                        .map(Self::infer)
                        .collect(),
                ))
            },
        }
    }
}

fn unquote(raw: &str) -> &str {
    raw.strip_prefix('"')
        .and_then(|r| r.strip_suffix('"'))
        .unwrap_or(raw)
}

impl From<Literal> for Value {
    fn from(lit: Literal) -> Self {
        match lit {
            Literal::Str(s) => Self::Text(s),
            Literal::Int(n) => Self::Int(n),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Text(s) => write!(f, "{s}"),
            Self::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            },
        }
    }
}
