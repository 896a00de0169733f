//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - Session defaults (sentences per scenario, fixed shuffle seed)
//! - Where scenario files live and which extension they use
//! - The clitic list used for segmentation and display
//! - The database file name
//!
//! Configuration is stored at `~/.config/finyap/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::error::{ConfigError, Result};
use crate::text::{CliticSet, DEFAULT_CLITICS};

/// Defaults for a new practice session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionDefaults {
    #[serde(default = "default_sentences_per_scenario")]
    pub sentences_per_scenario: usize,
    /// Fixed shuffle seed; random when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

/// Scenario file location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentConfig {
    /// Relative paths resolve against the working directory.
    #[serde(default = "default_scenarios_dir")]
    pub scenarios_dir: String,
    #[serde(default = "default_extension")]
    pub extension: String,
}

/// Text processing settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextConfig {
    /// Enclitic suffixes, tried in list order.
    #[serde(default = "default_clitics")]
    pub clitics: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// File name inside the data directory.
    #[serde(default = "default_database_file")]
    pub database_file: String,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/finyap/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub session: SessionDefaults,
    #[serde(default)]
    pub content: ContentConfig,
    #[serde(default)]
    pub text: TextConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

fn default_sentences_per_scenario() -> usize {
    10
}
fn default_scenarios_dir() -> String {
    "scenarios".into()
}
fn default_extension() -> String {
    "tsv".into()
}
fn default_clitics() -> Vec<String> {
    DEFAULT_CLITICS.iter().map(|c| (*c).to_string()).collect()
}
fn default_database_file() -> String {
    "finyap.db".into()
}

impl Default for SessionDefaults {
    fn default() -> Self {
        Self {
            sentences_per_scenario: default_sentences_per_scenario(),
            seed: None,
        }
    }
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            scenarios_dir: default_scenarios_dir(),
            extension: default_extension(),
        }
    }
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            clitics: default_clitics(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_file: default_database_file(),
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> std::result::Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_some() {
                current = current.get_mut(part).ok_or_else(unknown)?;
                continue;
            }

            let obj = current.as_object_mut().ok_or_else(unknown)?;
            // Optional fields are absent from the serialized form when unset.
            let existing = obj.get(part).cloned().unwrap_or(serde_json::Value::Null);
            if existing.is_null() && !Self::is_optional_key(key) {
                return Err(unknown());
            }

            let new_value = match existing {
                serde_json::Value::Bool(_) => serde_json::Value::Bool(
                    value
                        .parse::<bool>()
                        .map_err(|e| invalid(e.to_string()))?,
                ),
                serde_json::Value::Number(_) => serde_json::Value::Number(
                    value
                        .parse::<u64>()
                        .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?
                        .into(),
                ),
                serde_json::Value::Null => {
                    if value.is_empty() || value.eq_ignore_ascii_case("none") {
                        serde_json::Value::Null
                    } else {
                        serde_json::Value::Number(
                            value
                                .parse::<u64>()
                                .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?
                                .into(),
                        )
                    }
                }
                serde_json::Value::Array(_) => Self::parse_list(value),
                serde_json::Value::Object(_) => {
                    serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                }
                serde_json::Value::String(_) => serde_json::Value::String(value.into()),
            };

            obj.insert(part.to_string(), new_value);
            return Ok(());
        }

        Err(unknown())
    }

    fn is_optional_key(key: &str) -> bool {
        key == "session.seed"
    }

    /// Lists accept a JSON array or a comma-separated string.
    fn parse_list(value: &str) -> serde_json::Value {
        if let Ok(json @ serde_json::Value::Array(_)) = serde_json::from_str(value) {
            return json;
        }
        serde_json::Value::Array(
            value
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|s| serde_json::Value::String(s.to_string()))
                .collect(),
        )
    }

    fn path() -> Result<PathBuf> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk or return default.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    /// Load from an explicit file, writing defaults there if it is missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be parsed or the defaults
    /// cannot be written.
    pub fn load_from(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg: Config = toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })?;
                cfg.validate()?;
                Ok(cfg)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }
            .into()),
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    /// Persist to an explicit file.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by key without saving.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value does not fit it.
    pub fn update(&mut self, key: &str, value: &str) -> Result<()> {
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// Set a config value by key and save. Returns error if key is unknown.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// or the config cannot be saved.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.update(key, value)?;
        self.save()
    }

    /// # Errors
    /// Returns an error naming the first out-of-range setting.
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.session.sentences_per_scenario == 0 {
            return Err(ConfigError::InvalidValue {
                key: "session.sentences_per_scenario".into(),
                message: "must be a positive number".into(),
            });
        }
        if self.content.extension.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "content.extension".into(),
                message: "must not be empty".into(),
            });
        }
        if self.storage.database_file.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "storage.database_file".into(),
                message: "must not be empty".into(),
            });
        }
        Ok(())
    }

    /// Clitic suffixes as a segmenter.
    pub fn clitic_set(&self) -> CliticSet {
        CliticSet::new(self.text.clitics.iter().map(String::as_str))
    }

    pub fn scenarios_dir(&self) -> PathBuf {
        PathBuf::from(&self.content.scenarios_dir)
    }

    /// Full path of the database file inside the data directory.
    ///
    /// # Errors
    /// Returns an error if the data directory is unavailable.
    pub fn database_path(&self) -> Result<PathBuf> {
        Ok(data_dir()?.join(&self.storage.database_file))
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "falling back to default config");
            Self::default()
        })
    }
}
