//! Runtime configuration resolved from the environment.
//!
//! # Invariants
//! - Resolution never fails; unset, blank or invalid values fall back to
//!   defaults.

use crate::logging::{default_log_level, normalize_level};
use std::path::PathBuf;

/// Overrides the store file location.
pub const DB_PATH_ENV: &str = "TODO_DB_PATH";
/// Overrides the log level (`trace|debug|info|warn|error`).
pub const LOG_LEVEL_ENV: &str = "TODO_LOG_LEVEL";
/// Store file name used under the temp directory when no path is configured.
pub const DEFAULT_DB_FILE_NAME: &str = "todo_core.sqlite3";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    pub db_path: PathBuf,
    pub log_level: &'static str,
}

impl CoreConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Resolves configuration through `lookup` instead of the process env.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_blank = |name: &str| {
            lookup(name)
                .map(|raw| raw.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let db_path = non_blank(DB_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_DB_FILE_NAME));
        let log_level = non_blank(LOG_LEVEL_ENV)
            .and_then(|raw| normalize_level(&raw).ok())
            .unwrap_or_else(default_log_level);

        Self { db_path, log_level }
    }
}

#[cfg(test)]
mod tests {
    use super::{CoreConfig, DB_PATH_ENV, DEFAULT_DB_FILE_NAME, LOG_LEVEL_ENV};
    use crate::logging::default_log_level;
    use std::path::PathBuf;

    #[test]
    fn defaults_apply_when_unset_or_blank() {
        let config = CoreConfig::from_lookup(|name| (name == DB_PATH_ENV).then(|| "  ".to_string()));
        assert_eq!(
            config.db_path,
            std::env::temp_dir().join(DEFAULT_DB_FILE_NAME)
        );
        assert_eq!(config.log_level, default_log_level());
    }

    #[test]
    fn overrides_are_trimmed_and_normalized() {
        let config = CoreConfig::from_lookup(|name| match name {
            DB_PATH_ENV => Some(" /data/todo.sqlite3 ".to_string()),
            LOG_LEVEL_ENV => Some("WARNING".to_string()),
            _ => None,
        });
        assert_eq!(config.db_path, PathBuf::from("/data/todo.sqlite3"));
        assert_eq!(config.log_level, "warn");
    }

    #[test]
    fn invalid_level_falls_back() {
        let config =
            CoreConfig::from_lookup(|name| (name == LOG_LEVEL_ENV).then(|| "loud".to_string()));
        assert_eq!(config.log_level, default_log_level());
    }
}
