//! Configuration file loading for the TTA wrapper.
//!
//! [`TtaConfig`] can be stored as TOML or JSON; the format of a file is picked
//! from its extension.

use std::path::Path;

use super::tta::TtaConfig;
use crate::core::TtaError;

/// Configuration file format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// TOML format
    Toml,
    /// JSON format
    Json,
}

impl ConfigFormat {
    /// Detect format from file extension
    pub fn from_extension(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "toml" => Some(Self::Toml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Loads and saves [`TtaConfig`] values.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a file, auto-detecting the format from the extension
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use flip_tta::core::config::ConfigLoader;
    /// use std::path::Path;
    ///
    /// let config = ConfigLoader::load_from_file(Path::new("tta.toml"))?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn load_from_file(path: &Path) -> Result<TtaConfig, TtaError> {
        let format = Self::format_for(path)?;

        let content = std::fs::read_to_string(path).map_err(|e| TtaError::ConfigError {
            message: format!("Failed to read config file {}: {}", path.display(), e),
        })?;

        Self::load_from_string(&content, format)
    }

    /// Load configuration from a string with specified format
    pub fn load_from_string(content: &str, format: ConfigFormat) -> Result<TtaConfig, TtaError> {
        match format {
            ConfigFormat::Toml => Self::load_from_toml(content),
            ConfigFormat::Json => Self::load_from_json(content),
        }
    }

    /// Load configuration from TOML string
    pub fn load_from_toml(content: &str) -> Result<TtaConfig, TtaError> {
        toml::from_str(content).map_err(|e| TtaError::ConfigError {
            message: format!("Failed to parse TOML config: {e}"),
        })
    }

    /// Load configuration from JSON string
    pub fn load_from_json(content: &str) -> Result<TtaConfig, TtaError> {
        serde_json::from_str(content).map_err(|e| TtaError::ConfigError {
            message: format!("Failed to parse JSON config: {e}"),
        })
    }

    /// Save configuration to a file, auto-detecting the format from the extension
    pub fn save_to_file(config: &TtaConfig, path: &Path) -> Result<(), TtaError> {
        let format = Self::format_for(path)?;
        let content = Self::save_to_string(config, format)?;

        std::fs::write(path, content).map_err(|e| TtaError::ConfigError {
            message: format!("Failed to write config file {}: {}", path.display(), e),
        })
    }

    /// Save configuration to string with specified format
    pub fn save_to_string(config: &TtaConfig, format: ConfigFormat) -> Result<String, TtaError> {
        match format {
            ConfigFormat::Toml => toml::to_string_pretty(config).map_err(|e| {
                TtaError::ConfigError {
                    message: format!("Failed to serialize config to TOML: {e}"),
                }
            }),
            ConfigFormat::Json => serde_json::to_string_pretty(config).map_err(|e| {
                TtaError::ConfigError {
                    message: format!("Failed to serialize config to JSON: {e}"),
                }
            }),
        }
    }

    fn format_for(path: &Path) -> Result<ConfigFormat, TtaError> {
        ConfigFormat::from_extension(path).ok_or_else(|| TtaError::ConfigError {
            message: format!("Unsupported config file extension: {:?}", path.extension()),
        })
    }
}
