//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Keep CLI and UI callers decoupled from storage details.

pub mod todo_service;
