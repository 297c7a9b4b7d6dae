//! Configuration module for the xlt CLI.
//!
//! This module handles loading, saving, and managing configuration
//! settings for the xlt application.

use dirs::{config_dir, home_dir};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Result, XltError};

/// Default configuration file name.
pub const CONFIG_FILE_NAME: &str = "xlt.toml";

/// Application configuration structure.
///
/// This struct represents the complete configuration for the xlt CLI,
/// including global settings and command-specific options.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Global verbose setting.
    #[serde(default)]
    pub verbose: bool,

    /// Default output directory for the `transpile` subcommand.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Default input directory for the `check` subcommand.
    #[serde(default = "default_input_dir")]
    pub input_dir: String,

    /// Transpile-specific configuration.
    #[serde(default)]
    pub transpile: TranspileConfig,

    /// Check-specific configuration.
    #[serde(default)]
    pub check: CheckConfig,
}

/// Transpile-specific configuration options.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TranspileConfig {
    /// Source-language tag to assume when `--from` is not given and the
    /// input file's extension doesn't resolve to one of the four known
    /// languages.
    #[serde(default)]
    pub default_from: Option<String>,

    /// Overwrite existing sibling output files.
    #[serde(default)]
    pub force: bool,
}

/// Check-specific configuration options.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CheckConfig {
    /// Stop scanning a directory at the first file whose round-trip
    /// self-check reports an error.
    #[serde(default)]
    pub stop_on_first_error: bool,
}

fn default_output_dir() -> String {
    "output".to_string()
}

fn default_input_dir() -> String {
    "input".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            verbose: false,
            output_dir: default_output_dir(),
            input_dir: default_input_dir(),
            transpile: TranspileConfig::default(),
            check: CheckConfig::default(),
        }
    }
}

impl Default for TranspileConfig {
    fn default() -> Self {
        Self { default_from: None, force: false }
    }
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self { stop_on_first_error: false }
    }
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// Searches for configuration in the following order:
    /// 1. Current directory
    /// 2. User's home directory
    /// 3. System configuration directory
    ///
    /// Returns the default configuration if no config file is found.
    pub fn load() -> Result<Self> {
        let config_path = Self::find_config_file()?;

        match config_path {
            Some(path) => Self::load_from_path(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load configuration from a specific path.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(XltError::Config(format!("Configuration file not found: {}", path.display())));
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config =
            toml::from_str(&content).map_err(|e| XltError::Config(format!("Failed to parse configuration: {}", e)))?;

        Ok(config)
    }

    /// Save configuration to a specific path.
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content =
            toml::to_string_pretty(self).map_err(|e| XltError::Config(format!("Failed to serialize configuration: {}", e)))?;

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Check for config in current directory.
    fn check_current_dir_config() -> Option<PathBuf> {
        let path = PathBuf::from(CONFIG_FILE_NAME);
        path.exists().then_some(path)
    }

    /// Check for config in home directory.
    fn check_home_config() -> Option<PathBuf> {
        home_dir().map(|dir| dir.join(".config").join("xlt").join(CONFIG_FILE_NAME)).filter(|path| path.exists())
    }

    /// Check for config in system config directory.
    fn check_system_config() -> Option<PathBuf> {
        config_dir().map(|dir| dir.join("xlt").join(CONFIG_FILE_NAME)).filter(|path| path.exists())
    }

    /// Find the configuration file in standard locations.
    fn find_config_file() -> Result<Option<PathBuf>> {
        Ok(Self::check_current_dir_config().or_else(Self::check_home_config).or_else(Self::check_system_config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_config() -> Config {
        Config {
            verbose: true,
            output_dir: "/tmp/output".to_string(),
            input_dir: "/tmp/input".to_string(),
            transpile: TranspileConfig { default_from: Some("scripting".to_string()), force: true },
            check: CheckConfig { stop_on_first_error: true },
        }
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(!config.verbose);
        assert_eq!(config.output_dir, "output");
        assert_eq!(config.input_dir, "input");
        assert!(config.transpile.default_from.is_none());
        assert!(!config.check.stop_on_first_error);
    }

    #[test]
    fn test_config_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("test_config.toml");

        let original_config = create_test_config();
        original_config.save_to_path(&config_path).unwrap();

        let loaded_config = Config::load_from_path(&config_path).unwrap();

        assert_eq!(original_config, loaded_config);
    }

    #[test]
    fn test_load_from_nonexistent_path() {
        let result = Config::load_from_path(Path::new("/nonexistent/path/config.toml"));
        assert!(result.is_err());
    }
}
