//! Change notification layered over the synchronous todo contract.
//!
//! # Responsibility
//! - Let callers observe committed mutations without polling `list`/`get`.
//!
//! # Invariants
//! - Observers only hear about operations that succeeded.
//! - Observers are called synchronously, in registration order.
//! - Reads never produce notifications.

use crate::model::todo::{Todo, TodoId};
use std::sync::{Arc, Mutex, PoisonError};

/// One committed mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TodoChange {
    /// Carries the record as inserted.
    Created(Todo),
    /// Emitted by update and toggle with the record as written.
    Updated(Todo),
    Deleted(TodoId),
}

impl TodoChange {
    pub fn todo_id(&self) -> TodoId {
        match self {
            Self::Created(todo) | Self::Updated(todo) => todo.id,
            Self::Deleted(id) => *id,
        }
    }
}

/// Receiver of committed todo mutations.
pub trait TodoObserver: Send + Sync {
    fn on_change(&self, change: &TodoChange);
}

impl<F> TodoObserver for F
where
    F: Fn(&TodoChange) + Send + Sync,
{
    fn on_change(&self, change: &TodoChange) {
        self(change)
    }
}

/// Ordered set of registered observers.
#[derive(Default)]
pub struct ChangeNotifier {
    observers: Vec<Arc<dyn TodoObserver>>,
}

impl ChangeNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, observer: Arc<dyn TodoObserver>) {
        self.observers.push(observer);
    }

    pub fn notify(&self, change: &TodoChange) {
        for observer in &self.observers {
            observer.on_change(change);
        }
    }
}

/// Observer that queues changes for a consumer that drains them on its own
/// schedule, e.g. a view deciding when to re-fetch.
#[derive(Debug, Default)]
pub struct ChangeBuffer {
    pending: Mutex<Vec<TodoChange>>,
}

impl ChangeBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes every queued change, oldest first.
    pub fn drain(&self) -> Vec<TodoChange> {
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        std::mem::take(&mut *pending)
    }
}

impl TodoObserver for ChangeBuffer {
    fn on_change(&self, change: &TodoChange) {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(change.clone());
    }
}
