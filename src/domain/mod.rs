/// Domain module containing the core entities and the streak ledger
///
/// This module defines Habit, CompletionEvent, and StreakInterval together
/// with their validation rules and the pure streak-accounting decision.

pub mod event;
pub mod habit;
pub mod streak;
pub mod types;

// Re-export public types for easy access
pub use event::*;
pub use habit::*;
pub use streak::*;
pub use types::*;

use thiserror::Error;

/// Errors that can occur during domain operations
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Invalid habit name: {0}")]
    InvalidHabitName(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),
}
