// Monkeytrapper Configuration
// Immutable startup configuration loaded from TOML

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::input::{DeviceMatch, HI_RES_PER_DETENT};
use crate::transform::{ScrollMode, ScrollRule};

/// Errors that can occur when loading configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("TOML parse error: {0}")]
    TomlParse(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Virtual device settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Name the virtual device is registered under
    pub name: String,
}

impl OutputConfig {
    pub const DEFAULT_NAME: &'static str = "MonkeyTrapper";
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            name: Self::DEFAULT_NAME.to_string(),
        }
    }
}

/// Scroll rewrite settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScrollConfig {
    /// Wheel step written for each rewritten event
    pub value: i32,
    /// true: fast drags along the plate edge keep their acceleration
    /// false: every scroll step is the fixed value
    pub allow_accel: bool,
}

impl ScrollConfig {
    pub const DEFAULT_VALUE: i32 = 3;

    pub fn mode(&self) -> ScrollMode {
        ScrollMode::from_allow_accel(self.allow_accel)
    }
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            value: Self::DEFAULT_VALUE,
            allow_accel: false,
        }
    }
}

/// Complete configuration, fixed once the process has started
///
/// ```toml
/// [device]
/// phys = "usb-0000:00:14.0-14.3/input1"
/// name = "TRAPPER DATA Mousetrapper Advance 2.0"
///
/// [output]
/// name = "MonkeyTrapper"
///
/// [scroll]
/// value = 3
/// allow_accel = false
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub device: DeviceMatch,
    pub output: OutputConfig,
    pub scroll: ScrollConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string and validate it
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Config =
            toml::from_str(content).map_err(|e| ConfigError::TomlParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default config path (~/.config/monkeytrapper/config.toml)
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("monkeytrapper").join("config.toml"))
    }

    /// Load from an explicit path, which must exist, or else from the
    /// default location if present, or else the built-in defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = path {
            return Self::from_file(path);
        }
        if let Some(path) = Self::default_path() {
            if path.exists() {
                log::debug!("Loading config from {}", path.display());
                return Self::from_file(path);
            }
        }
        Ok(Self::default())
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.scroll.value <= 0 {
            return Err(ConfigError::Invalid(format!(
                "scroll.value must be positive, got {}",
                self.scroll.value
            )));
        }
        if self.scroll.value.checked_mul(HI_RES_PER_DETENT).is_none() {
            return Err(ConfigError::Invalid(format!(
                "scroll.value {} overflows the hi-res axis",
                self.scroll.value
            )));
        }
        if self.output.name.trim().is_empty() {
            return Err(ConfigError::Invalid("output.name must not be empty".to_string()));
        }
        // uinput devices have no physical path
        if self.device.matches(None, Some(&self.output.name)) {
            return Err(ConfigError::Invalid(format!(
                "output.name {:?} would be selected as the source device on the next start",
                self.output.name
            )));
        }
        Ok(())
    }

    /// The scroll rule this configuration selects
    pub fn scroll_rule(&self) -> ScrollRule {
        ScrollRule::new(self.scroll.mode(), self.scroll.value)
    }

    /// Render as TOML, for --check-config
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Invalid(e.to_string()))
    }
}
