//! Host configuration resolved from the environment.
//!
//! # Invariants
//! - Blank environment values count as unset.
//! - Resolution never fails; every setting has a default except the log
//!   directory, whose absence disables file logging.

use crate::logging::default_log_level;
use std::path::PathBuf;

pub const DB_PATH_ENV: &str = "HABITDECK_DB_PATH";
pub const LOG_LEVEL_ENV: &str = "HABITDECK_LOG_LEVEL";
pub const LOG_DIR_ENV: &str = "HABITDECK_LOG_DIR";
const DEFAULT_DB_FILE_NAME: &str = "habitdeck.sqlite3";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    pub db_path: PathBuf,
    pub log_level: String,
    pub log_dir: Option<PathBuf>,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            db_path: std::env::temp_dir().join(DEFAULT_DB_FILE_NAME),
            log_level: default_log_level().to_string(),
            log_dir: None,
        }
    }
}

impl CoreConfig {
    /// Reads `HABITDECK_*` variables from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Resolves configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let defaults = Self::default();

        Self {
            db_path: read(DB_PATH_ENV).map_or(defaults.db_path, PathBuf::from),
            log_level: read(LOG_LEVEL_ENV).unwrap_or(defaults.log_level),
            log_dir: read(LOG_DIR_ENV).map(PathBuf::from),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{CoreConfig, DB_PATH_ENV, LOG_DIR_ENV, LOG_LEVEL_ENV};
    use std::collections::HashMap;
    use std::path::PathBuf;

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let env = HashMap::from([(DB_PATH_ENV, "  "), (LOG_LEVEL_ENV, "")]);
        let config = CoreConfig::from_lookup(|name| env.get(name).map(|v| v.to_string()));
        assert_eq!(config, CoreConfig::default());
    }

    #[test]
    fn explicit_values_override_defaults() {
        let env = HashMap::from([
            (DB_PATH_ENV, "/data/habits.db"),
            (LOG_LEVEL_ENV, "warn"),
            (LOG_DIR_ENV, "/data/logs"),
        ]);
        let config = CoreConfig::from_lookup(|name| env.get(name).map(|v| v.to_string()));
        assert_eq!(config.db_path, PathBuf::from("/data/habits.db"));
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.log_dir, Some(PathBuf::from("/data/logs")));
    }
}
