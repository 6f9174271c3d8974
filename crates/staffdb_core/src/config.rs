//! Store and logging configuration.
//!
//! # Responsibility
//! - Describe where the employee store lives and how logging is set up.
//! - Load settings from an optional JSON file plus `STAFFDB_*` overrides.
//!
//! # Invariants
//! - `db_path = None` always means an isolated in-memory store.
//! - Unset keys fall back to `StoreConfig::default()` values.
//! - A loaded config always passes `StoreConfig::validate()`.

use crate::logging::default_log_level;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;
/// SQLite stores the busy timeout as a signed 32-bit millisecond count.
pub const MAX_BUSY_TIMEOUT_MS: u64 = i32::MAX as u64;

pub const ENV_CONFIG_FILE: &str = "STAFFDB_CONFIG";
pub const ENV_DB_PATH: &str = "STAFFDB_DB_PATH";
pub const ENV_BUSY_TIMEOUT_MS: &str = "STAFFDB_BUSY_TIMEOUT_MS";
pub const ENV_LOG_LEVEL: &str = "STAFFDB_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "STAFFDB_LOG_DIR";

/// Configuration error raised while loading settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidNumber { key: &'static str, value: String },
    OutOfRange { key: &'static str, value: u64, max: u64 },
    /// Config file could not be read.
    Io { path: PathBuf, message: String },
    /// Config file is not valid JSON for `StoreConfig`.
    Parse { path: PathBuf, message: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidNumber { key, value } => {
                write!(f, "`{key}` must be a non-negative integer, got `{value}`")
            }
            Self::OutOfRange { key, value, max } => {
                write!(f, "`{key}` must be at most {max}, got {value}")
            }
            Self::Io { path, message } => {
                write!(f, "failed to read config `{}`: {message}", path.display())
            }
            Self::Parse { path, message } => {
                write!(f, "invalid config `{}`: {message}", path.display())
            }
        }
    }
}

impl Error for ConfigError {}

/// Runtime settings for opening the store and starting logging.
///
/// Deserialized from JSON files; missing keys take their default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// SQLite file path; `None` opens an in-memory store.
    pub db_path: Option<PathBuf>,
    pub busy_timeout_ms: u64,
    pub log_level: String,
    /// Absolute directory for rolling log files; `None` leaves logging off.
    pub log_dir: Option<PathBuf>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
            log_level: default_log_level().to_string(),
            log_dir: None,
        }
    }
}

impl StoreConfig {
    /// Loads configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads a JSON config file.
    ///
    /// # Errors
    /// - `Io` when the file cannot be read.
    /// - `Parse` on malformed JSON or unknown value types.
    /// - `OutOfRange` when a value fails `validate()`.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|err| ConfigError::Io {
            path: path.to_path_buf(),
            message: err.to_string(),
        })?;
        let config: Self = serde_json::from_str(&text).map_err(|err| ConfigError::Parse {
            path: path.to_path_buf(),
            message: err.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration through an arbitrary key lookup.
    ///
    /// `STAFFDB_CONFIG` names a JSON file used as the base; the other keys
    /// override it. Blank values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let mut config = match read(ENV_CONFIG_FILE) {
            Some(path) => Self::from_json_file(path)?,
            None => Self::default(),
        };
        if let Some(path) = read(ENV_DB_PATH) {
            config.db_path = Some(PathBuf::from(path));
        }
        if let Some(value) = read(ENV_BUSY_TIMEOUT_MS) {
            config.busy_timeout_ms =
                value
                    .parse::<u64>()
                    .map_err(|_| ConfigError::InvalidNumber {
                        key: ENV_BUSY_TIMEOUT_MS,
                        value,
                    })?;
        }
        if let Some(level) = read(ENV_LOG_LEVEL) {
            config.log_level = level;
        }
        if let Some(dir) = read(ENV_LOG_DIR) {
            config.log_dir = Some(PathBuf::from(dir));
        }
        config.validate()?;
        Ok(config)
    }

    /// Checks value ranges the store cannot accept.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.busy_timeout_ms > MAX_BUSY_TIMEOUT_MS {
            return Err(ConfigError::OutOfRange {
                key: ENV_BUSY_TIMEOUT_MS,
                value: self.busy_timeout_ms,
                max: MAX_BUSY_TIMEOUT_MS,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, StoreConfig, DEFAULT_BUSY_TIMEOUT_MS, MAX_BUSY_TIMEOUT_MS};
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_yields_defaults() {
        let config = StoreConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, StoreConfig::default());
        assert_eq!(config.db_path, None);
        assert_eq!(config.busy_timeout_ms, DEFAULT_BUSY_TIMEOUT_MS);
    }

    #[test]
    fn overrides_are_applied_and_blank_values_ignored() {
        let config = StoreConfig::from_lookup(lookup_from(&[
            ("STAFFDB_DB_PATH", "/tmp/staff.sqlite3"),
            ("STAFFDB_BUSY_TIMEOUT_MS", " 250 "),
            ("STAFFDB_LOG_LEVEL", "warn"),
            ("STAFFDB_LOG_DIR", "   "),
        ]))
        .unwrap();

        assert_eq!(config.db_path, Some(PathBuf::from("/tmp/staff.sqlite3")));
        assert_eq!(config.busy_timeout_ms, 250);
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.log_dir, None);
    }

    #[test]
    fn invalid_timeout_is_rejected() {
        let err = StoreConfig::from_lookup(lookup_from(&[("STAFFDB_BUSY_TIMEOUT_MS", "soon")]))
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidNumber {
                key: "STAFFDB_BUSY_TIMEOUT_MS",
                value: "soon".to_string(),
            }
        );
    }

    #[test]
    fn timeout_beyond_sqlite_range_is_rejected() {
        let err = StoreConfig::from_lookup(lookup_from(&[("STAFFDB_BUSY_TIMEOUT_MS", "3000000000")]))
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::OutOfRange {
                key: "STAFFDB_BUSY_TIMEOUT_MS",
                value: 3_000_000_000,
                max: MAX_BUSY_TIMEOUT_MS,
            }
        );

        let at_limit = StoreConfig::from_lookup(lookup_from(&[(
            "STAFFDB_BUSY_TIMEOUT_MS",
            "2147483647",
        )]))
        .unwrap();
        assert_eq!(at_limit.busy_timeout_ms, MAX_BUSY_TIMEOUT_MS);
    }

    #[test]
    fn json_file_is_base_and_env_overrides_it() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("staffdb.json");
        std::fs::write(
            &path,
            r#"{ "db_path": "/var/lib/staff.sqlite3", "busy_timeout_ms": 750 }"#,
        )
        .unwrap();

        let from_file = StoreConfig::from_json_file(&path).unwrap();
        assert_eq!(from_file.db_path, Some(PathBuf::from("/var/lib/staff.sqlite3")));
        assert_eq!(from_file.busy_timeout_ms, 750);
        assert_eq!(from_file.log_level, StoreConfig::default().log_level);

        let path_text = path.to_str().unwrap();
        let merged = StoreConfig::from_lookup(lookup_from(&[
            ("STAFFDB_CONFIG", path_text),
            ("STAFFDB_BUSY_TIMEOUT_MS", "20"),
        ]))
        .unwrap();
        assert_eq!(merged.db_path, from_file.db_path);
        assert_eq!(merged.busy_timeout_ms, 20);
    }

    #[test]
    fn json_file_errors_are_reported() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.json");
        assert!(matches!(
            StoreConfig::from_json_file(&missing),
            Err(ConfigError::Io { .. })
        ));

        let malformed = dir.path().join("malformed.json");
        std::fs::write(&malformed, r#"{ "busy_timeout_ms": "soon" }"#).unwrap();
        assert!(matches!(
            StoreConfig::from_json_file(&malformed),
            Err(ConfigError::Parse { .. })
        ));

        let too_big = dir.path().join("too_big.json");
        std::fs::write(&too_big, r#"{ "busy_timeout_ms": 3000000000 }"#).unwrap();
        assert!(matches!(
            StoreConfig::from_json_file(&too_big),
            Err(ConfigError::OutOfRange { .. })
        ));
    }
}
