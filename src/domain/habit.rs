/// Habit entity and validation
///
/// A habit is a user-defined task tracked once per day. The `completed`
/// flag only ever means "completed today" and is cleared by the midnight
/// rollover; historical state lives in the completion log.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{DomainError, HabitId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Habit {
    /// Unique identifier, stable for the life of the habit
    pub id: HabitId,
    /// Display name (e.g. "Morning Run")
    pub name: String,
    /// Optional detailed description
    pub description: Option<String>,
    /// Calendar date the habit was created, immutable
    pub created_on: NaiveDate,
    /// Whether the habit has been completed today
    pub completed: bool,
}

impl Habit {
    /// Create a new habit with validation
    ///
    /// New habits start not-completed and are dated with the caller's
    /// notion of "today" so the clock stays injectable.
    pub fn new(
        name: String,
        description: Option<String>,
        created_on: NaiveDate,
    ) -> Result<Self, DomainError> {
        Self::validate_name(&name)?;
        Self::validate_description(&description)?;

        Ok(Self {
            id: HabitId::new(),
            name,
            description,
            created_on,
            completed: false,
        })
    }

    /// Create a habit from existing data (used when loading from the database)
    pub fn from_existing(
        id: HabitId,
        name: String,
        description: Option<String>,
        created_on: NaiveDate,
        completed: bool,
    ) -> Self {
        Self {
            id,
            name,
            description,
            created_on,
            completed,
        }
    }

    /// Validate a habit name according to business rules
    fn validate_name(name: &str) -> Result<(), DomainError> {
        let trimmed = name.trim();

        if trimmed.is_empty() {
            return Err(DomainError::InvalidHabitName(
                "Habit name cannot be empty".to_string(),
            ));
        }

        if trimmed.len() > 100 {
            return Err(DomainError::InvalidHabitName(
                "Habit name cannot be longer than 100 characters".to_string(),
            ));
        }

        Ok(())
    }

    /// Validate the optional description
    fn validate_description(description: &Option<String>) -> Result<(), DomainError> {
        if let Some(desc) = description {
            if desc.len() > 500 {
                return Err(DomainError::Validation {
                    message: "Description cannot be longer than 500 characters".to_string(),
                });
            }
        }
        Ok(())
    }
}
