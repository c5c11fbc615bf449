//! Configuration
//!
//! Database and logging settings, loaded from JSON and overridable from the
//! environment.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::{DomainError, DomainResult};

pub const ENV_DB_PATH: &str = "KANBAN_DB_PATH";
pub const ENV_BUSY_TIMEOUT_MS: &str = "KANBAN_BUSY_TIMEOUT_MS";
pub const ENV_LOG_DIR: &str = "KANBAN_LOG_DIR";
pub const ENV_LOG_FILTER: &str = "KANBAN_LOG_FILTER";

/// SQLite path that opens a private in-memory database
pub const IN_MEMORY: &str = ":memory:";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    pub database_path: PathBuf,
    /// How long a writer waits for another connection's write lock
    pub busy_timeout_ms: u64,
    /// Rolling log files go here; `None` leaves logging to the host
    pub log_dir: Option<PathBuf>,
    pub log_filter: String,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from("kanban.db"),
            busy_timeout_ms: 5000,
            log_dir: None,
            log_filter: "info".to_string(),
        }
    }
}

impl BoardConfig {
    pub fn in_memory() -> Self {
        Self {
            database_path: PathBuf::from(IN_MEMORY),
            ..Default::default()
        }
    }

    pub fn with_database(path: impl Into<PathBuf>) -> Self {
        Self {
            database_path: path.into(),
            ..Default::default()
        }
    }

    pub fn is_in_memory(&self) -> bool {
        self.database_path.as_os_str() == IN_MEMORY
    }

    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms)
    }

    /// Parse a JSON config; missing keys fall back to defaults
    pub fn from_json(json: &str) -> DomainResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| DomainError::InvalidArgument(format!("bad config: {}", e)))
    }

    pub fn load(path: &Path) -> DomainResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            DomainError::InvalidArgument(format!("cannot read config {}: {}", path.display(), e))
        })?;
        Self::from_json(&text)
    }

    /// Apply `KANBAN_*` variables from the process environment
    pub fn with_env_overrides(self) -> DomainResult<Self> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from any lookup; unset keys leave fields untouched
    pub fn with_overrides<F>(mut self, lookup: F) -> DomainResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup(ENV_DB_PATH) {
            self.database_path = PathBuf::from(path);
        }
        if let Some(ms) = lookup(ENV_BUSY_TIMEOUT_MS) {
            self.busy_timeout_ms = ms.trim().parse().map_err(|_| {
                DomainError::InvalidArgument(format!("{} must be milliseconds, got '{}'", ENV_BUSY_TIMEOUT_MS, ms))
            })?;
        }
        if let Some(dir) = lookup(ENV_LOG_DIR) {
            self.log_dir = Some(PathBuf::from(dir));
        }
        if let Some(filter) = lookup(ENV_LOG_FILTER) {
            self.log_filter = filter;
        }
        Ok(self)
    }
}
