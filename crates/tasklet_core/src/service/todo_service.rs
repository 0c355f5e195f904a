//! Todo use-case service.
//!
//! # Responsibility
//! - Provide the create/list/get/update/delete/toggle entry points.
//! - Apply validation before any mutation.
//! - Map repository failures onto the caller-facing error taxonomy.
//!
//! # Invariants
//! - Validation failures never reach the repository.
//! - Every mutating call returns the row its own statement wrote, so a
//!   concurrent writer can never leak into the result.
//! - Observers are notified only after the operation fully succeeded.

use crate::model::todo::{NewTodo, Todo, TodoId, TodoPatch};
use crate::model::validation::TodoValidationError;
use crate::notify::{ChangeNotifier, TodoChange, TodoObserver};
use crate::repo::todo_repo::{RepoError, TodoListQuery, TodoRepository};
use log::{error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;
use std::time::Instant;

/// Caller-facing failure classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TodoErrorKind {
    /// Input violates a field rule; the caller can correct and retry.
    InvalidInput,
    /// The id matches no record, typically a stale reference.
    NotFound,
    /// The store failed a step it expected to succeed.
    Persistence,
}

/// Service error for todo use-cases.
#[derive(Debug)]
pub enum TodoServiceError {
    InvalidInput(TodoValidationError),
    NotFound(TodoId),
    /// Storage-layer failure.
    Persistence(RepoError),
}

impl TodoServiceError {
    pub fn kind(&self) -> TodoErrorKind {
        match self {
            Self::InvalidInput(_) => TodoErrorKind::InvalidInput,
            Self::NotFound(_) => TodoErrorKind::NotFound,
            Self::Persistence(_) => TodoErrorKind::Persistence,
        }
    }

    /// Stable machine-readable code used in log events.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "invalid_input",
            Self::NotFound(_) => "not_found",
            Self::Persistence(err) => err.error_code(),
        }
    }
}

impl Display for TodoServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidInput(err) => write!(f, "invalid input: {err}"),
            Self::NotFound(id) => write!(f, "todo not found: {id}"),
            Self::Persistence(err) => write!(f, "persistence failure: {err}"),
        }
    }
}

impl Error for TodoServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidInput(err) => Some(err),
            Self::Persistence(err) => Some(err),
            _ => None,
        }
    }
}

impl From<TodoValidationError> for TodoServiceError {
    fn from(value: TodoValidationError) -> Self {
        Self::InvalidInput(value)
    }
}

impl From<RepoError> for TodoServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::InvalidInput(err),
            RepoError::NotFound(id) => Self::NotFound(id),
            other => Self::Persistence(other),
        }
    }
}

pub type TodoServiceResult<T> = Result<T, TodoServiceError>;

/// Todo service facade over a repository implementation.
pub struct TodoService<R: TodoRepository> {
    repo: R,
    notifier: ChangeNotifier,
}

impl<R: TodoRepository> TodoService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self {
            repo,
            notifier: ChangeNotifier::new(),
        }
    }

    /// Registers an observer for committed mutations.
    pub fn subscribe(&mut self, observer: Arc<dyn TodoObserver>) {
        self.notifier.subscribe(observer);
    }

    /// Validates input, inserts a new todo and returns it as stored.
    pub fn create_todo(&self, input: NewTodo) -> TodoServiceResult<Todo> {
        let started_at = Instant::now();
        let result = self.create_inner(input);
        log_outcome(
            "todo_create",
            result.as_ref().ok().map(|todo| todo.id),
            started_at,
            result.as_ref().map(|_| ()),
        );

        let todo = result?;
        self.notifier.notify(&TodoChange::Created(todo.clone()));
        Ok(todo)
    }

    /// Lists todos newest first, optionally filtered on the completed flag.
    pub fn list_todos(&self, query: &TodoListQuery) -> TodoServiceResult<Vec<Todo>> {
        Ok(self.repo.list_todos(query)?)
    }

    /// Gets one todo by id; `Ok(None)` when no record matches.
    pub fn get_todo(&self, id: TodoId) -> TodoServiceResult<Option<Todo>> {
        Ok(self.repo.get_todo(id)?)
    }

    /// Applies the supplied patch fields and returns the updated record.
    ///
    /// Fields absent from the patch keep their stored values.
    pub fn update_todo(&self, id: TodoId, patch: &TodoPatch) -> TodoServiceResult<Todo> {
        let started_at = Instant::now();
        let result = self.update_inner(id, patch);
        log_outcome("todo_update", Some(id), started_at, result.as_ref().map(|_| ()));

        let todo = result?;
        self.notifier.notify(&TodoChange::Updated(todo.clone()));
        Ok(todo)
    }

    /// Flips the completed flag and returns the updated record.
    pub fn toggle_completed(&self, id: TodoId) -> TodoServiceResult<Todo> {
        let started_at = Instant::now();
        let result = self.repo.toggle_completed(id).map_err(TodoServiceError::from);
        log_outcome("todo_toggle", Some(id), started_at, result.as_ref().map(|_| ()));

        let todo = result?;
        self.notifier.notify(&TodoChange::Updated(todo.clone()));
        Ok(todo)
    }

    /// Permanently removes a todo.
    pub fn delete_todo(&self, id: TodoId) -> TodoServiceResult<()> {
        let started_at = Instant::now();
        let result = self.repo.delete_todo(id).map_err(TodoServiceError::from);
        log_outcome("todo_delete", Some(id), started_at, result.as_ref().map(|_| ()));

        result?;
        self.notifier.notify(&TodoChange::Deleted(id));
        Ok(())
    }

    fn create_inner(&self, input: NewTodo) -> TodoServiceResult<Todo> {
        let draft = input.into_draft()?;
        Ok(self.repo.create_todo(&draft)?)
    }

    fn update_inner(&self, id: TodoId, patch: &TodoPatch) -> TodoServiceResult<Todo> {
        let patch = patch.normalized()?;
        Ok(self.repo.update_todo(id, &patch)?)
    }
}

fn log_outcome(
    event: &'static str,
    todo_id: Option<TodoId>,
    started_at: Instant,
    outcome: Result<(), &TodoServiceError>,
) {
    let duration_ms = started_at.elapsed().as_millis();
    let todo_id = todo_id.map_or_else(|| "-".to_string(), |id| id.to_string());
    match outcome {
        Ok(()) => info!(
            "event={event} module=service status=ok todo_id={todo_id} duration_ms={duration_ms}"
        ),
        Err(err) if err.kind() == TodoErrorKind::Persistence => error!(
            "event={event} module=service status=error todo_id={todo_id} duration_ms={duration_ms} error_code={} error={err}",
            err.error_code()
        ),
        Err(err) => warn!(
            "event={event} module=service status=rejected todo_id={todo_id} duration_ms={duration_ms} error_code={}",
            err.error_code()
        ),
    }
}
