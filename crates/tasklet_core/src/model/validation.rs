//! Field validation rules for todo input.
//!
//! # Responsibility
//! - Enforce title/description bounds for create and update.
//! - Hand back the normalized (trimmed) value on success.
//!
//! # Invariants
//! - Rules are pure: identical input always yields the identical decision.
//! - Lengths count Unicode scalar values, not bytes.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Upper bound for the raw title length.
pub const TITLE_MAX_CHARS: usize = 200;
/// Upper bound for the trimmed description length.
pub const DESCRIPTION_MAX_CHARS: usize = 1000;

/// Validation failures for todo fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TodoValidationError {
    /// Title is empty once surrounding whitespace is removed.
    EmptyTitle,
    /// Title exceeds `TITLE_MAX_CHARS`.
    TitleTooLong { length: usize, max: usize },
    /// Trimmed description exceeds `DESCRIPTION_MAX_CHARS`.
    DescriptionTooLong { length: usize, max: usize },
    /// Record carries the nil UUID, which is never assigned by the store.
    NilId,
}

impl Display for TodoValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "title must not be empty"),
            Self::TitleTooLong { length, max } => {
                write!(f, "title is {length} characters; maximum is {max}")
            }
            Self::DescriptionTooLong { length, max } => {
                write!(f, "description is {length} characters; maximum is {max}")
            }
            Self::NilId => write!(f, "todo id must not be the nil uuid"),
        }
    }
}

impl Error for TodoValidationError {}

/// Validates a title and returns its trimmed form.
///
/// Emptiness is judged after trimming; the length bound applies to the
/// input as supplied.
pub fn validate_title(raw: &str) -> Result<String, TodoValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(TodoValidationError::EmptyTitle);
    }

    let length = raw.chars().count();
    if length > TITLE_MAX_CHARS {
        return Err(TodoValidationError::TitleTooLong {
            length,
            max: TITLE_MAX_CHARS,
        });
    }

    Ok(trimmed.to_string())
}

/// Validates an optional description and returns its trimmed form.
///
/// `None` stays `None`; an all-whitespace description becomes `Some("")`.
pub fn validate_description(raw: Option<&str>) -> Result<Option<String>, TodoValidationError> {
    let Some(raw) = raw else {
        return Ok(None);
    };

    let trimmed = raw.trim();
    let length = trimmed.chars().count();
    if length > DESCRIPTION_MAX_CHARS {
        return Err(TodoValidationError::DescriptionTooLong {
            length,
            max: DESCRIPTION_MAX_CHARS,
        });
    }

    Ok(Some(trimmed.to_string()))
}
