/// Storage layer for persisting tracker data
///
/// This module handles all database operations using SQLite. The
/// `HabitStore` trait is the seam the rollover logic and the command
/// interface are written against.

pub mod migrations;
pub mod sqlite;

// Re-export the main storage types
pub use sqlite::*;

use chrono::{NaiveDate, NaiveDateTime};
use thiserror::Error;

use crate::domain::{CompletionEvent, Habit, HabitId, StreakId, StreakInterval};

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database connection error: {0}")]
    Connection(String),

    #[error("Database query error: {0}")]
    Query(#[from] rusqlite::Error),

    #[error("Habit not found: {habit_id}")]
    HabitNotFound { habit_id: String },

    #[error("Streak not found: {streak_id}")]
    StreakNotFound { streak_id: String },

    #[error("Migration error: {0}")]
    Migration(String),
}

/// Durable storage contract for habits, the completion log, streak
/// intervals, and interaction markers
///
/// All durable entities are owned here; callers never cache entity state
/// beyond a single operation.
pub trait HabitStore {
    /// Insert a new habit
    fn create_habit(&self, habit: &Habit) -> Result<(), StorageError>;

    /// Full snapshot of every habit
    fn list_habits(&self) -> Result<Vec<Habit>, StorageError>;

    /// Set a habit's transient completed-today flag
    ///
    /// Idempotent. Returns false when the habit id is unknown so the
    /// caller can log and carry on.
    fn set_habit_completed(&self, habit_id: &HabitId, completed: bool)
        -> Result<bool, StorageError>;

    /// Clear the completed-today flag on every habit
    fn reset_all_completed(&self) -> Result<(), StorageError>;

    /// Append one event to the completion log
    fn append_event(&self, event: &CompletionEvent) -> Result<(), StorageError>;

    /// Most recent real completion (missed-day markers excluded), by date
    fn latest_completion(&self, habit_id: &HabitId)
        -> Result<Option<CompletionEvent>, StorageError>;

    /// A habit's full completion log, oldest first
    fn events_for_habit(&self, habit_id: &HabitId)
        -> Result<Vec<CompletionEvent>, StorageError>;

    /// Open a new streak interval for a habit
    fn open_streak(&self, habit_id: &HabitId, start_date: NaiveDate)
        -> Result<StreakInterval, StorageError>;

    /// Close a streak interval, fixing its end date and length
    fn close_streak(&self, streak_id: &StreakId, end_date: NaiveDate)
        -> Result<(), StorageError>;

    /// The habit's open streak interval, if one exists
    fn current_open_streak(&self, habit_id: &HabitId)
        -> Result<Option<StreakInterval>, StorageError>;

    /// Every streak interval recorded for a habit, oldest first
    fn list_streaks(&self, habit_id: &HabitId) -> Result<Vec<StreakInterval>, StorageError>;

    /// Append an "app was alive at this instant" marker
    fn record_interaction(&self, at: NaiveDateTime) -> Result<(), StorageError>;

    /// The most recent interaction marker, if any
    fn last_interaction(&self) -> Result<Option<NaiveDateTime>, StorageError>;
}
