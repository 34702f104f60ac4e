/// CompletionEvent entity for the append-only completion log
///
/// Every user-triggered completion appends one event carrying the local
/// date and time it was recorded. The midnight rollover appends synthetic
/// "missed" events stamped with the end-of-day sentinel time instead.
/// The log never enforces uniqueness per habit and date; readers use
/// most-recent-by-date semantics and tolerate duplicates.

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

use crate::domain::{EventId, HabitId};

/// Sentinel time stamped on synthetic missed-day events
pub fn end_of_day() -> NaiveTime {
    NaiveTime::from_hms_opt(23, 59, 59).unwrap()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionEvent {
    /// Unique identifier for this event
    pub id: EventId,
    /// Which habit this event is for
    pub habit_id: HabitId,
    /// Calendar date the event pertains to
    pub date: NaiveDate,
    /// Day of the week, derived from `date` and stored redundantly
    /// for query convenience
    pub day_of_week: Weekday,
    /// Time of day the event was recorded, or 23:59:59 for missed days
    pub time: NaiveTime,
    /// True for a real completion, false for a missed day
    pub completed: bool,
}

impl CompletionEvent {
    /// Record a real completion at the given local instant
    pub fn recorded(habit_id: HabitId, at: NaiveDateTime) -> Self {
        let date = at.date();
        Self {
            id: EventId::new(),
            habit_id,
            date,
            day_of_week: date.weekday(),
            time: at.time(),
            completed: true,
        }
    }

    /// Build a synthetic missed-day event for the rollover backfill
    pub fn missed(habit_id: HabitId, date: NaiveDate) -> Self {
        Self {
            id: EventId::new(),
            habit_id,
            date,
            day_of_week: date.weekday(),
            time: end_of_day(),
            completed: false,
        }
    }

    /// Create an event from existing data (used when loading from the database)
    pub fn from_existing(
        id: EventId,
        habit_id: HabitId,
        date: NaiveDate,
        time: NaiveTime,
        completed: bool,
    ) -> Self {
        Self {
            id,
            habit_id,
            date,
            day_of_week: date.weekday(),
            time,
            completed,
        }
    }
}
