//! Runtime configuration for hosts embedding the core.
//!
//! Every setting has a default so a host can start with zero configuration.
//! Environment variables override the defaults.

use crate::logging::default_log_level;
use directories::ProjectDirs;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

/// Env: data directory holding the preference database.
pub const ENV_DATA_DIR: &str = "STUDYNOTE_DATA_DIR";
/// Env: `trace|debug|info|warn|error`.
pub const ENV_LOG_LEVEL: &str = "STUDYNOTE_LOG_LEVEL";
/// Env: absolute directory for rolling log files.
pub const ENV_LOG_DIR: &str = "STUDYNOTE_LOG_DIR";

const DEFAULT_DB_FILE_NAME: &str = "studynote.sqlite3";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// No platform data directory and no `STUDYNOTE_DATA_DIR` override.
    NoDataDir,
    /// An override was set to an empty value.
    EmptyValue(&'static str),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoDataDir => write!(
                f,
                "could not determine application data directory; set {ENV_DATA_DIR}"
            ),
            Self::EmptyValue(name) => write!(f, "environment variable {name} is empty"),
        }
    }
}

impl Error for ConfigError {}

/// Core configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    /// Directory containing the preference database.
    /// Env: `STUDYNOTE_DATA_DIR`. Default: platform data dir.
    pub data_dir: PathBuf,
    /// File name of the preference database inside `data_dir`.
    pub db_file_name: String,
    /// Env: `STUDYNOTE_LOG_LEVEL`. Default: `debug` in debug builds, else `info`.
    pub log_level: String,
    /// Env: `STUDYNOTE_LOG_DIR`. Default: `<data_dir>/logs`.
    pub log_dir: PathBuf,
}

impl CoreConfig {
    /// Builds a configuration rooted at `data_dir` with default settings.
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        let data_dir = data_dir.into();
        Self {
            log_dir: data_dir.join("logs"),
            data_dir,
            db_file_name: DEFAULT_DB_FILE_NAME.to_string(),
            log_level: default_log_level().to_string(),
        }
    }

    /// Loads configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Loads configuration from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |name: &'static str| -> Result<Option<String>, ConfigError> {
            match lookup(name) {
                Some(value) if value.trim().is_empty() => Err(ConfigError::EmptyValue(name)),
                Some(value) => Ok(Some(value.trim().to_string())),
                None => Ok(None),
            }
        };

        let data_dir = match read(ENV_DATA_DIR)? {
            Some(dir) => PathBuf::from(dir),
            None => platform_data_dir().ok_or(ConfigError::NoDataDir)?,
        };

        let mut config = Self::with_data_dir(data_dir);
        if let Some(level) = read(ENV_LOG_LEVEL)? {
            config.log_level = level;
        }
        if let Some(dir) = read(ENV_LOG_DIR)? {
            config.log_dir = PathBuf::from(dir);
        }
        Ok(config)
    }

    /// Full path of the preference database.
    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(&self.db_file_name)
    }
}

fn platform_data_dir() -> Option<PathBuf> {
    ProjectDirs::from("com", "studynote", "studynote").map(|dirs| dirs.data_dir().to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, CoreConfig, ENV_DATA_DIR, ENV_LOG_DIR, ENV_LOG_LEVEL};
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn overrides_replace_defaults() {
        let config = CoreConfig::from_lookup(lookup(&[
            (ENV_DATA_DIR, "/tmp/studynote-data"),
            (ENV_LOG_LEVEL, "warn"),
            (ENV_LOG_DIR, "/tmp/studynote-logs"),
        ]))
        .unwrap();

        assert_eq!(config.data_dir, PathBuf::from("/tmp/studynote-data"));
        assert_eq!(
            config.db_path(),
            PathBuf::from("/tmp/studynote-data/studynote.sqlite3")
        );
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.log_dir, PathBuf::from("/tmp/studynote-logs"));
    }

    #[test]
    fn log_dir_defaults_under_data_dir() {
        let config = CoreConfig::from_lookup(lookup(&[(ENV_DATA_DIR, "/srv/notes")])).unwrap();
        assert_eq!(config.log_dir, PathBuf::from("/srv/notes/logs"));
    }

    #[test]
    fn empty_override_is_rejected() {
        let err = CoreConfig::from_lookup(lookup(&[(ENV_DATA_DIR, "  ")])).unwrap_err();
        assert_eq!(err, ConfigError::EmptyValue(ENV_DATA_DIR));
    }
}
