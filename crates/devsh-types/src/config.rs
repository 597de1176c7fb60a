//! Shell configuration loaded from `devsh.toml`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{DevshError, Result};
use crate::value::Value;

/// Default config file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "devsh.toml";

/// Top-level shell configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    /// Prompt printed before each line in interactive mode.
    pub prompt: String,
    /// Default `env_logger` filter when `RUST_LOG` is unset.
    pub log_level: String,
    pub scripts: ScriptConfig,
    /// Devices registered at startup.
    pub devices: Vec<DeviceConfig>,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            prompt: "devsh> ".to_string(),
            log_level: "info".to_string(),
            scripts: ScriptConfig::default(),
            devices: Vec::new(),
        }
    }
}

/// Where script files live and how their names select a factory.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScriptConfig {
    pub dir: PathBuf,
    /// Extension of scripts built by the primary factory.
    pub primary_extension: String,
    /// A `load` name ending in `.<secondary_extension>` goes to the
    /// secondary factory.
    pub secondary_extension: String,
}

impl Default for ScriptConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("scripts"),
            primary_extension: "dsh".to_string(),
            secondary_extension: "rb".to_string(),
        }
    }
}

impl ScriptConfig {
    /// The suffix (`.rb` by default) that routes a name to the secondary factory.
    pub fn secondary_suffix(&self) -> String {
        format!(".{}", self.secondary_extension)
    }
}

/// A device declared in the config file.
#[derive(Debug, Clone, Deserialize)]
pub struct DeviceConfig {
    pub id: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub attributes: BTreeMap<String, Value>,
}

impl ShellConfig {
    /// Parse a config document.
    pub fn from_toml(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load `path`, falling back to defaults when the file does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("no config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)?;
        Self::from_toml(&text)
    }

    fn validate(&self) -> Result<()> {
        if self.scripts.secondary_extension.is_empty() {
            return Err(DevshError::Config(
                "scripts.secondary_extension must not be empty".to_string(),
            ));
        }
        let mut seen = std::collections::HashSet::new();
        for dev in &self.devices {
            if dev.id.is_empty() || dev.id.contains('.') || dev.id.contains(char::is_whitespace) {
                return Err(DevshError::Config(format!("invalid device id: '{}'", dev.id)));
            }
            if !seen.insert(dev.id.as_str()) {
                return Err(DevshError::Config(format!("duplicate device id: {}", dev.id)));
            }
        }
        Ok(())
    }
}
