//! Domain model for todo records.
//!
//! # Responsibility
//! - Define the canonical `Todo` record and its write-side inputs.
//! - Own the field validation rules shared by every write path.
//!
//! # Invariants
//! - Every todo is identified by a stable, never-reused `TodoId`.
//! - Deletion is permanent; there is no tombstone state.

pub mod todo;
pub mod validation;
