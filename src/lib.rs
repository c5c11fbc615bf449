//! Kanban Board Ordering Engine
//!
//! Layered architecture:
//! - config: database and logging settings
//! - domain: entities, read models and position rules
//! - repository: SQLite storage and the ordering components
//! - service: the async facade every caller goes through

pub mod config;
pub mod domain;
pub mod repository;
pub mod service;

pub use config::BoardConfig;
pub use domain::{DomainError, DomainResult};
pub use service::OrderingService;

use kanban_logger::{LoggerError, LoggerHandle};

const APP_NAME: &str = "kanban-board";

/// Open the configured database and, when `log_dir` is set, install the
/// rolling logger.
///
/// Keep the returned handle alive for as long as file logging should run.
/// A global logger already installed by the host is left in place.
pub async fn bootstrap(config: &BoardConfig) -> DomainResult<(OrderingService, Option<LoggerHandle>)> {
    let logger = match &config.log_dir {
        Some(dir) => match kanban_logger::init_logger(dir, APP_NAME, &config.log_filter) {
            Ok(handle) => Some(handle),
            Err(LoggerError::AlreadyInstalled(reason)) => {
                log::warn!("keeping existing logger: {}", reason);
                None
            }
            Err(e) => return Err(DomainError::InvalidArgument(e.to_string())),
        },
        None => None,
    };

    let db = repository::init_db(config).await?;
    kanban_logger::info(&format!(
        "{} started with database {}",
        APP_NAME,
        config.database_path.display()
    ));

    Ok((OrderingService::new(db), logger))
}
