//! Runtime configuration resolved from the process environment.
//!
//! # Responsibility
//! - Resolve database location and logging settings for embedders and CLI.
//!
//! # Invariants
//! - Blank variables are treated as unset.
//! - Resolution never fails; invalid logging values surface at
//!   `init_logging` time instead.

use crate::logging::default_log_level;
use std::path::PathBuf;

pub const DB_PATH_ENV: &str = "TASKLET_DB_PATH";
pub const LOG_LEVEL_ENV: &str = "TASKLET_LOG_LEVEL";
pub const LOG_DIR_ENV: &str = "TASKLET_LOG_DIR";

const DEFAULT_DB_FILE_NAME: &str = "tasklet.sqlite3";

/// Resolved runtime settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskletConfig {
    /// SQLite database file backing the store.
    pub db_path: PathBuf,
    pub log_level: String,
    /// Rolling log directory; logging stays off when `None`.
    pub log_dir: Option<PathBuf>,
}

impl TaskletConfig {
    /// Reads `TASKLET_*` variables from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves settings through an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: &str| {
            lookup(key)
                .map(|raw| raw.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        Self {
            db_path: read(DB_PATH_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(default_db_path),
            log_level: read(LOG_LEVEL_ENV).unwrap_or_else(|| default_log_level().to_string()),
            log_dir: read(LOG_DIR_ENV).map(PathBuf::from),
        }
    }
}

/// Default database location under the system temp directory.
pub fn default_db_path() -> PathBuf {
    std::env::temp_dir().join(DEFAULT_DB_FILE_NAME)
}
