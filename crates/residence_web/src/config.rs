//! Startup configuration read from environment variables.
//!
//! Values come from the process environment first, then from a `.env` file
//! in the working directory or one of its parents. Every key has a default;
//! only malformed values fail startup.

use residence_core::default_log_level;
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::Read;
use std::path::{Path, PathBuf};

pub const DEFAULT_PORT: u16 = 3333;
pub const DEFAULT_DATABASE_PATH: &str = "residence.sqlite3";
pub const DEFAULT_PUBLIC_DIR: &str = "public";
/// `DATABASE_PATH` value selecting a throwaway in-memory store.
pub const IN_MEMORY_DATABASE: &str = ":memory:";
/// Connection-string key of earlier deployments; honored only when it holds
/// a store path rather than a `mongodb://` URI.
pub const LEGACY_STORE_KEY: &str = "MONGO_URI";

#[derive(Debug)]
pub enum ConfigError {
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
    /// The `.env` file exists but could not be read or parsed.
    EnvFile(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidValue { key, value, reason } => {
                write!(f, "invalid {key} value `{value}`: {reason}")
            }
            Self::EnvFile(reason) => write!(f, "invalid .env file: {reason}"),
        }
    }
}

impl Error for ConfigError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub port: u16,
    /// Store file path, or `:memory:`.
    pub database_path: String,
    pub public_dir: PathBuf,
    pub log_level: String,
    /// Absolute directory for rotating log files; stderr when unset.
    pub log_dir: Option<String>,
    /// Keys that fell back to their default, reported once logging is up.
    pub defaulted: Vec<&'static str>,
    /// Keys that were set but cannot be used, reported once logging is up.
    pub ignored: Vec<&'static str>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let env_file = match dotenvy::dotenv_iter() {
            Ok(iter) => collect_env_file(iter)?,
            Err(err) if err.not_found() => HashMap::new(),
            Err(err) => return Err(ConfigError::EnvFile(err.to_string())),
        };
        Self::from_layers(|key| std::env::var(key).ok(), &env_file)
    }

    /// Process values win over `.env` values, as with `dotenv`.
    pub fn from_layers(
        process: impl Fn(&str) -> Option<String>,
        env_file: &HashMap<String, String>,
    ) -> Result<Self, ConfigError> {
        Self::from_lookup(|key| process(key).or_else(|| env_file.get(key).cloned()))
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut defaulted = Vec::new();
        let mut ignored = Vec::new();
        let mut read = |key: &'static str| {
            let value = non_blank(&lookup, key);
            if value.is_none() {
                defaulted.push(key);
            }
            value
        };

        let port = match read("PORT") {
            Some(value) => value
                .parse::<u16>()
                .map_err(|err| ConfigError::InvalidValue {
                    key: "PORT",
                    value: value.clone(),
                    reason: err.to_string(),
                })?,
            None => DEFAULT_PORT,
        };
        let public_dir = PathBuf::from(
            read("PUBLIC_DIR").unwrap_or_else(|| DEFAULT_PUBLIC_DIR.to_string()),
        );
        let log_level = read("LOG_LEVEL").unwrap_or_else(|| default_log_level().to_string());
        let log_dir = read("LOG_DIR");

        let database_path = match non_blank(&lookup, "DATABASE_PATH") {
            Some(path) => path,
            None => match non_blank(&lookup, LEGACY_STORE_KEY) {
                Some(uri) if is_connection_uri(&uri) => {
                    ignored.push(LEGACY_STORE_KEY);
                    defaulted.push("DATABASE_PATH");
                    DEFAULT_DATABASE_PATH.to_string()
                }
                Some(path) => path,
                None => {
                    defaulted.push("DATABASE_PATH");
                    DEFAULT_DATABASE_PATH.to_string()
                }
            },
        };

        Ok(Self {
            port,
            database_path,
            public_dir,
            log_level,
            log_dir,
            defaulted,
            ignored,
        })
    }

    pub fn is_in_memory(&self) -> bool {
        self.database_path == IN_MEMORY_DATABASE
    }

    pub fn bind_address(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}

/// Reads `KEY=value` pairs from the env file at `path`.
pub fn read_env_file(path: &Path) -> Result<HashMap<String, String>, ConfigError> {
    let iter =
        dotenvy::from_path_iter(path).map_err(|err| ConfigError::EnvFile(err.to_string()))?;
    collect_env_file(iter)
}

fn collect_env_file<R: Read>(iter: dotenvy::Iter<R>) -> Result<HashMap<String, String>, ConfigError> {
    iter.map(|item| item.map_err(|err| ConfigError::EnvFile(err.to_string())))
        .collect()
}

fn non_blank(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    lookup(key)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn is_connection_uri(value: &str) -> bool {
    value.contains("://")
}

#[cfg(test)]
mod tests {
    use super::{read_env_file, Config, ConfigError, DEFAULT_DATABASE_PATH, DEFAULT_PORT};
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.database_path, DEFAULT_DATABASE_PATH);
        assert_eq!(config.log_dir, None);
        assert!(config.defaulted.contains(&"PORT"));
        assert_eq!(config.bind_address(), "0.0.0.0:3333");
    }

    #[test]
    fn explicit_values_override_defaults() {
        let config = Config::from_lookup(lookup(&[
            ("PORT", "8080"),
            ("DATABASE_PATH", ":memory:"),
            ("LOG_DIR", "/var/log/residence"),
            ("LOG_LEVEL", " warn "),
        ]))
        .unwrap();
        assert_eq!(config.port, 8080);
        assert!(config.is_in_memory());
        assert_eq!(config.log_dir.as_deref(), Some("/var/log/residence"));
        assert_eq!(config.log_level, "warn");
        assert!(!config.defaulted.contains(&"PORT"));
    }

    #[test]
    fn blank_value_counts_as_unset() {
        let config = Config::from_lookup(lookup(&[("PORT", "  ")])).unwrap();
        assert_eq!(config.port, DEFAULT_PORT);
    }

    #[test]
    fn malformed_port_is_rejected() {
        let err = Config::from_lookup(lookup(&[("PORT", "eighty")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key: "PORT", .. }));
    }

    #[test]
    fn legacy_store_key_is_used_as_a_path() {
        let config = Config::from_lookup(lookup(&[("MONGO_URI", "/tmp/x.sqlite3")])).unwrap();
        assert_eq!(config.database_path, "/tmp/x.sqlite3");
        assert!(!config.defaulted.contains(&"DATABASE_PATH"));
        assert!(config.ignored.is_empty());
    }

    #[test]
    fn legacy_connection_uri_is_reported_and_default_store_used() {
        let config = Config::from_lookup(lookup(&[(
            "MONGO_URI",
            "mongodb://localhost:27017/residence",
        )]))
        .unwrap();
        assert_eq!(config.database_path, DEFAULT_DATABASE_PATH);
        assert_eq!(config.ignored, vec!["MONGO_URI"]);
        assert!(config.defaulted.contains(&"DATABASE_PATH"));
    }

    #[test]
    fn database_path_wins_over_legacy_store_key() {
        let config = Config::from_lookup(lookup(&[
            ("DATABASE_PATH", ":memory:"),
            ("MONGO_URI", "/tmp/other.sqlite3"),
        ]))
        .unwrap();
        assert!(config.is_in_memory());
    }

    #[test]
    fn env_file_fills_keys_missing_from_the_process() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        std::fs::write(&path, "PORT=4444\nLOG_LEVEL=error\n# comment\nDATABASE_PATH=\":memory:\"\n")
            .unwrap();

        let env_file = read_env_file(&path).unwrap();
        let config = Config::from_layers(lookup(&[("LOG_LEVEL", "warn")]), &env_file).unwrap();
        assert_eq!(config.port, 4444);
        assert_eq!(config.log_level, "warn");
        assert!(config.is_in_memory());
    }

    #[test]
    fn unreadable_env_file_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_env_file(&dir.path().join("missing.env")).unwrap_err();
        assert!(matches!(err, ConfigError::EnvFile(_)));
    }
}
