//! Core domain logic for Tasklet.
//! This crate is the single source of truth for todo invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod notify;
pub mod repo;
pub mod service;

pub use config::TaskletConfig;
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::todo::{NewTodo, Todo, TodoDraft, TodoId, TodoPatch};
pub use model::validation::{TodoValidationError, DESCRIPTION_MAX_CHARS, TITLE_MAX_CHARS};
pub use notify::{ChangeBuffer, ChangeNotifier, TodoChange, TodoObserver};
pub use repo::todo_repo::{
    RepoError, RepoResult, SqliteTodoRepository, TodoListQuery, TodoRepository,
    TODO_LIST_DEFAULT_LIMIT,
};
pub use service::todo_service::{
    TodoErrorKind, TodoService, TodoServiceError, TodoServiceResult,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
