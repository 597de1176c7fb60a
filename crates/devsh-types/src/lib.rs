//! Foundation types for devsh.
//!
//! Shared by every devsh crate: the error enum, command-line literals,
//! device values, and the TOML configuration.

pub mod config;
pub mod error;
pub mod literal;
pub mod value;

pub use error::{DevshError, Result};
pub use literal::Literal;
pub use value::Value;
