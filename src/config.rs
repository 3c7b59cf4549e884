// EDICT-Search Configuration
// Layered settings: CLI flags, environment, config file, defaults

use crate::romanization::RomanizationEnum;
use encoding_rs::Encoding;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default directory holding the dictionary files
pub const DEFAULT_DICT_DIR: &str = "dict";

/// Default text encoding of the dictionary files
pub const DEFAULT_ENCODING: &str = "utf-8";

/// Default maximum number of results shown
pub const DEFAULT_LIMIT: usize = 20;

/// Errors raised while loading or saving configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found: {path}")]
    FileNotFound { path: String },

    #[error("Failed to parse config {path}: {message}")]
    ParseError { path: String, message: String },

    #[error("Invalid value for '{field}': {message}")]
    ValidationFailed { field: String, message: String },

    #[error("Failed to write config {path}: {message}")]
    WriteError { path: String, message: String },
}

/// User settings
///
/// Every field is optional so that layers can be merged; the `effective_*`
/// accessors fall back to the compiled defaults.
///
/// Resolution order (highest priority first):
/// 1. CLI flags
/// 2. Environment variables (`EDICT_*`)
/// 3. Config file given with `--config`
/// 4. User config (`~/.edict-search/config.toml`)
/// 5. Compiled defaults
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Romanization system used to read and print romaji
    pub romanization: Option<RomanizationEnum>,
    /// Directory with the dictionary files and their index caches
    pub dict_dir: Option<PathBuf>,
    /// Encoding label of the dictionary files, e.g. `euc-jp`
    pub encoding: Option<String>,
    /// Maximum number of results shown per query
    pub default_limit: Option<usize>,
}

/// Values given on the command line
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub romanization: Option<RomanizationEnum>,
    pub dict_dir: Option<PathBuf>,
    pub encoding: Option<String>,
    pub limit: Option<usize>,
}

impl Config {
    /// Load configuration from every layer and validate the result
    pub fn load(
        config_path: Option<&Path>,
        cli_overrides: Option<&CliOverrides>,
    ) -> Result<Self, ConfigError> {
        Self::resolve(
            Self::user_config_path().as_deref(),
            config_path,
            cli_overrides,
            |key| std::env::var(key).ok(),
        )
    }

    fn resolve(
        user_path: Option<&Path>,
        config_path: Option<&Path>,
        cli_overrides: Option<&CliOverrides>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(path) = user_path.filter(|p| p.exists()) {
            match Self::from_file(path) {
                Ok(user) => config.merge(&user),
                Err(e @ ConfigError::ParseError { .. }) => return Err(e),
                Err(e) => log::warn!("Ignoring user config: {}", e),
            }
        }

        if let Some(path) = config_path {
            config.merge(&Self::from_file(path)?);
        }

        config.apply_env_overrides(env);

        if let Some(cli) = cli_overrides {
            config.apply_cli_overrides(cli);
        }

        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })
    }

    /// Read a TOML config file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Serialize to TOML
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::WriteError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }

    /// Write the configuration to `path`, creating parent directories
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let write_error = |e: std::io::Error| ConfigError::WriteError {
            path: path.display().to_string(),
            message: e.to_string(),
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(write_error)?;
        }
        std::fs::write(path, self.to_toml()?).map_err(write_error)
    }

    /// Check the configured values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(label) = &self.encoding {
            if Encoding::for_label(label.as_bytes()).is_none() {
                return Err(ConfigError::ValidationFailed {
                    field: "encoding".to_string(),
                    message: format!("unknown encoding '{}'", label),
                });
            }
        }
        if self.default_limit == Some(0) {
            return Err(ConfigError::ValidationFailed {
                field: "default_limit".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        Ok(())
    }

    /// Location of the user config: `~/.edict-search/config.toml`
    pub fn user_config_path() -> Option<PathBuf> {
        home_dir().map(|h| h.join(".edict-search").join("config.toml"))
    }

    pub fn effective_romanization(&self) -> RomanizationEnum {
        self.romanization.unwrap_or_default()
    }

    pub fn effective_dict_dir(&self) -> PathBuf {
        self.dict_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DICT_DIR))
    }

    pub fn effective_limit(&self) -> usize {
        self.default_limit.unwrap_or(DEFAULT_LIMIT)
    }

    /// The dictionary file encoding, UTF-8 unless configured otherwise
    pub fn effective_encoding(&self) -> &'static Encoding {
        self.encoding
            .as_deref()
            .and_then(|label| Encoding::for_label(label.as_bytes()))
            .unwrap_or(encoding_rs::UTF_8)
    }

    /// Overwrite fields of `self` with the ones set in `other`
    fn merge(&mut self, other: &Config) {
        if other.romanization.is_some() {
            self.romanization = other.romanization;
        }
        if other.dict_dir.is_some() {
            self.dict_dir = other.dict_dir.clone();
        }
        if other.encoding.is_some() {
            self.encoding = other.encoding.clone();
        }
        if other.default_limit.is_some() {
            self.default_limit = other.default_limit;
        }
    }

    /// Apply `EDICT_ROMANIZATION`, `EDICT_DICT_DIR`, `EDICT_ENCODING` and `EDICT_LIMIT`
    fn apply_env_overrides(&mut self, env: impl Fn(&str) -> Option<String>) {
        if let Some(val) = env("EDICT_ROMANIZATION") {
            match val.parse() {
                Ok(v) => self.romanization = Some(v),
                Err(e) => log::warn!("Ignoring EDICT_ROMANIZATION: {}", e),
            }
        }
        if let Some(val) = env("EDICT_DICT_DIR") {
            self.dict_dir = Some(PathBuf::from(val));
        }
        if let Some(val) = env("EDICT_ENCODING") {
            self.encoding = Some(val);
        }
        if let Some(val) = env("EDICT_LIMIT") {
            match val.parse::<usize>() {
                Ok(v) => self.default_limit = Some(v),
                Err(e) => log::warn!("Ignoring EDICT_LIMIT '{}': {}", val, e),
            }
        }
    }

    fn apply_cli_overrides(&mut self, cli: &CliOverrides) {
        if let Some(v) = cli.romanization {
            self.romanization = Some(v);
        }
        if let Some(ref v) = cli.dict_dir {
            self.dict_dir = Some(v.clone());
        }
        if let Some(ref v) = cli.encoding {
            self.encoding = Some(v.clone());
        }
        if let Some(v) = cli.limit {
            self.default_limit = Some(v);
        }
    }
}

fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
}
