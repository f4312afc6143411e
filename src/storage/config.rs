//! Configuration handling
//!
//! Configuration is layered, later sources winning:
//! 1. `~/.config/resmatch/config.toml` (global, platform-specific location)
//! 2. `./resmatch.toml` (working directory)
//! 3. Command-line flags and `RESMATCH_DB`, applied by the CLI

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Name of the working-directory config file
pub const LOCAL_CONFIG_FILE: &str = "resmatch.toml";

/// Default database file, relative to the working directory
pub const DEFAULT_DATABASE: &str = "resource_matching.db";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

/// Output format for commands
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Settings read from a single config file; absent keys stay `None`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    /// Path to the SQLite database
    pub database: Option<PathBuf>,

    /// Default output format (text or json)
    pub default_format: Option<OutputFormat>,

    /// Log level when `--verbose` is not given (error, warn, info, debug, trace)
    pub log_level: Option<String>,
}

/// Effective configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub database: PathBuf,
    pub default_format: OutputFormat,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: PathBuf::from(DEFAULT_DATABASE),
            default_format: OutputFormat::Text,
            log_level: "warn".to_string(),
        }
    }
}

impl Config {
    /// Loads configuration from the global and working-directory files
    pub fn load() -> Result<Self> {
        let mut config = Self::default();

        if let Some(dir) = Self::global_config_dir() {
            if let Some(file) = Self::read_file(&dir.join("config.toml"))? {
                config.apply(file)?;
            }
        }

        if let Some(file) = Self::read_file(Path::new(LOCAL_CONFIG_FILE))? {
            config.apply(file)?;
        }

        Ok(config)
    }

    /// Returns the global config directory
    pub fn global_config_dir() -> Option<PathBuf> {
        ProjectDirs::from("dev", "resmatch", "resmatch").map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Reads and parses a config file, `None` if it does not exist
    pub fn read_file(path: &Path) -> Result<Option<ConfigFile>> {
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;

        let file = toml::from_str(&content)
            .map_err(|e| ConfigError::Parse(e.to_string()))
            .with_context(|| format!("Failed to parse config: {}", path.display()))?;

        Ok(Some(file))
    }

    /// Overlays the keys present in `file`
    pub fn apply(&mut self, file: ConfigFile) -> Result<()> {
        if let Some(database) = file.database {
            if database.as_os_str().is_empty() {
                return Err(ConfigError::Invalid("database path is empty".to_string()).into());
            }
            self.database = database;
        }
        if let Some(format) = file.default_format {
            self.default_format = format;
        }
        if let Some(level) = file.log_level {
            self.log_level = normalize_level(&level)?;
        }
        Ok(())
    }
}

fn normalize_level(level: &str) -> Result<String> {
    let normalized = level.trim().to_ascii_lowercase();
    match normalized.as_str() {
        "error" | "warn" | "info" | "debug" | "trace" | "off" => Ok(normalized),
        _ => Err(ConfigError::Invalid(format!("unsupported log_level '{level}'")).into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config() {
        let config = Config::default();

        assert_eq!(config.database, PathBuf::from("resource_matching.db"));
        assert_eq!(config.default_format, OutputFormat::Text);
        assert_eq!(config.log_level, "warn");
    }

    #[test]
    fn parse_config_file() {
        let toml = r#"
database = "/tmp/matching.db"
default_format = "json"
log_level = "INFO"
"#;

        let file: ConfigFile = toml::from_str(toml).unwrap();
        let mut config = Config::default();
        config.apply(file).unwrap();

        assert_eq!(config.database, PathBuf::from("/tmp/matching.db"));
        assert_eq!(config.default_format, OutputFormat::Json);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let file: ConfigFile = toml::from_str(r#"default_format = "json""#).unwrap();
        let mut config = Config::default();
        config.apply(file).unwrap();

        assert_eq!(config.database, PathBuf::from(DEFAULT_DATABASE));
        assert_eq!(config.default_format, OutputFormat::Json);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let result: Result<ConfigFile, _> = toml::from_str(r#"databse = "typo.db""#);
        assert!(result.is_err());
    }

    #[test]
    fn bad_log_level_is_rejected() {
        let file = ConfigFile {
            log_level: Some("loud".to_string()),
            ..ConfigFile::default()
        };
        assert!(Config::default().apply(file).is_err());
    }

    #[test]
    fn read_missing_file_is_none() {
        let dir = TempDir::new().unwrap();
        let result = Config::read_file(&dir.path().join("resmatch.toml")).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn read_file_reports_parse_errors() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("resmatch.toml");
        fs::write(&path, "database = [").unwrap();

        let err = Config::read_file(&path).unwrap_err();
        assert!(format!("{err:#}").contains("Failed to parse config"));
    }
}
