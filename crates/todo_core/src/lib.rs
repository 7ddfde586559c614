//! Core persistence and consistency layer for the Todo app.
//! Hosts (FFI, CLI) go through this crate for every read and write.

pub mod config;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod store;

pub use config::CoreConfig;
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::category::{
    Category, COLOR_OPTIONS, DEFAULT_CATEGORY_ID, DEFAULT_CATEGORY_NAME, REFERENCE_BLUE,
};
pub use model::task::Task;
pub use model::{RecordId, ValidationError};
pub use repo::category_repo::{CategoryRepository, CATEGORIES_KEY};
pub use repo::task_repo::{TaskRepository, TODOS_KEY};
pub use repo::{RepoError, RepoResult};
pub use service::todo_service::{Board, BoardSection, TodoService};
pub use store::{
    open_store, open_store_in_memory, KeyValueStore, MemoryKvStore, SqliteKvStore, StoreError,
    StoreResult,
};

/// Minimal health-check API for host integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
