//! Todo domain model.
//!
//! # Responsibility
//! - Define the persisted `Todo` record and its serialized shape.
//! - Define write-side inputs: `NewTodo` for create, `TodoPatch` for update.
//!
//! # Invariants
//! - `id` is stable and never reused for another todo.
//! - A persisted `title` is trimmed and 1..=200 characters long.
//! - `description: None` (absent) is distinct from `Some("")` (empty).

use crate::model::validation::{validate_description, validate_title, TodoValidationError};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Stable identifier for a todo record.
pub type TodoId = Uuid;

/// Persisted todo record as returned by every read path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TodoWire")]
pub struct Todo {
    pub id: TodoId,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    /// Unix epoch milliseconds, assigned by the store at insert time.
    pub created_at: i64,
    /// Unix epoch milliseconds of the last update or toggle.
    pub updated_at: i64,
}

impl Todo {
    /// Checks persisted-record invariants.
    ///
    /// Stored values are already trimmed, so re-running the field rules is
    /// enough to catch out-of-bounds data.
    pub fn validate(&self) -> Result<(), TodoValidationError> {
        validate_fields(self.id, &self.title, self.description.as_deref())
    }
}

fn validate_fields(
    id: TodoId,
    title: &str,
    description: Option<&str>,
) -> Result<(), TodoValidationError> {
    if id.is_nil() {
        return Err(TodoValidationError::NilId);
    }
    validate_title(title)?;
    validate_description(description)?;
    Ok(())
}

#[derive(Deserialize)]
struct TodoWire {
    id: TodoId,
    title: String,
    #[serde(default)]
    description: Option<String>,
    completed: bool,
    created_at: i64,
    updated_at: i64,
}

impl TryFrom<TodoWire> for Todo {
    type Error = TodoValidationError;

    fn try_from(wire: TodoWire) -> Result<Self, Self::Error> {
        let todo = Self {
            id: wire.id,
            title: wire.title,
            description: wire.description,
            completed: wire.completed,
            created_at: wire.created_at,
            updated_at: wire.updated_at,
        };
        todo.validate()?;
        Ok(todo)
    }
}

/// Create input as supplied by a caller, before validation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewTodo {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub completed: bool,
}

impl NewTodo {
    /// Builds an incomplete todo input with no description.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            completed: false,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_completed(mut self, completed: bool) -> Self {
        self.completed = completed;
        self
    }

    /// Validates and normalizes the input into an insertable draft with a
    /// freshly generated id.
    pub fn into_draft(self) -> Result<TodoDraft, TodoValidationError> {
        let title = validate_title(&self.title)?;
        let description = validate_description(self.description.as_deref())?;
        Ok(TodoDraft {
            id: Uuid::new_v4(),
            title,
            description,
            completed: self.completed,
        })
    }
}

/// Validated, normalized todo ready for insertion.
///
/// Timestamps are not part of the draft; the store assigns them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoDraft {
    pub id: TodoId,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
}

impl TodoDraft {
    pub fn validate(&self) -> Result<(), TodoValidationError> {
        validate_fields(self.id, &self.title, self.description.as_deref())
    }
}

/// Partial update input.
///
/// A field set to `Some(..)` was supplied and will be applied; `None` leaves
/// the stored value untouched. `description` is tri-state:
/// - `None`: keep the stored description.
/// - `Some(None)`: clear it.
/// - `Some(Some(text))`: replace it with the trimmed text.
///
/// When deserialized, a missing key maps to `None` while an explicit JSON
/// `null` is only accepted for `description`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TodoPatch {
    #[serde(default, deserialize_with = "deserialize_present")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "deserialize_present")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_present")]
    pub completed: Option<bool>,
}

impl TodoPatch {
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(Some(description.into()));
        self
    }

    pub fn clear_description(mut self) -> Self {
        self.description = Some(None);
        self
    }

    pub fn with_completed(mut self, completed: bool) -> Self {
        self.completed = Some(completed);
        self
    }

    /// Returns whether no field was supplied.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.completed.is_none()
    }

    /// Validates supplied fields and returns the patch with trimmed values.
    pub fn normalized(&self) -> Result<Self, TodoValidationError> {
        let title = match self.title.as_deref() {
            Some(raw) => Some(validate_title(raw)?),
            None => None,
        };
        let description = match &self.description {
            Some(value) => Some(validate_description(value.as_deref())?),
            None => None,
        };
        Ok(Self {
            title,
            description,
            completed: self.completed,
        })
    }
}

fn deserialize_present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}
