//! Core domain logic for MyTodo.
//! This crate is the single source of truth for business invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod storage;
pub mod view;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::profile::{is_valid_email, Profile, ProfileValidationError};
pub use model::todo::{
    Priority, Project, ProjectId, SubTask, SubTaskId, Task, TaskId, TodoDocument,
};
pub use repo::document_repo::{
    DocumentRepository, KvDocumentRepository, TODO_DOCUMENT_BACKUP_KEY, TODO_DOCUMENT_KEY,
};
pub use repo::profile_repo::{KvProfileRepository, ProfileRepository, PROFILE_KEY};
pub use repo::{RepoError, RepoResult};
pub use service::profile_service::{ProfileService, ProfileServiceError};
pub use service::todo_service::TodoService;
pub use storage::{KeyValueStore, SqliteKvStore, StorageError, StorageResult};
pub use view::stats::TaskStats;
pub use view::task_view::{due_status, filter_by_title, is_overdue, sort_for_display, DueStatus};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
