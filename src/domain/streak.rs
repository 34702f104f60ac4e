/// Streak intervals and the ledger decision
///
/// A streak is a maximal run of consecutive calendar days on which a habit
/// was completed. Each run is stored as one interval: the start date, the
/// end date (None while the run is still alive), and the length in days.
/// For a given habit at most one interval is open at any time.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::domain::{HabitId, StreakId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreakInterval {
    /// Unique identifier for this interval
    pub id: StreakId,
    /// Which habit this interval belongs to
    pub habit_id: HabitId,
    /// Calendar date the streak began
    pub start_date: NaiveDate,
    /// Date of the most recent confirmed day, None while the streak is open
    pub end_date: Option<NaiveDate>,
    /// `end_date - start_date` in days, 0 while open or just-started
    pub length: i64,
}

impl StreakInterval {
    /// Open a fresh streak starting on the given date
    pub fn open(habit_id: HabitId, start_date: NaiveDate) -> Self {
        Self {
            id: StreakId::new(),
            habit_id,
            start_date,
            end_date: None,
            length: 0,
        }
    }

    /// Create an interval from existing data (used when loading from the database)
    pub fn from_existing(
        id: StreakId,
        habit_id: HabitId,
        start_date: NaiveDate,
        end_date: Option<NaiveDate>,
        length: i64,
    ) -> Self {
        Self {
            id,
            habit_id,
            start_date,
            end_date,
            length,
        }
    }

    /// Whether this interval is still open
    pub fn is_open(&self) -> bool {
        self.end_date.is_none()
    }

    /// Length the interval would have if closed on the given date
    pub fn length_if_closed_on(&self, end_date: NaiveDate) -> i64 {
        (end_date - self.start_date).num_days()
    }
}

/// What the ledger should do with a habit's streaks after a completion
///
/// Decided purely from the current open interval, the date of the latest
/// real completion before this one, and today's date, so the whole state
/// machine is testable without a database or a wall clock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreakUpdate {
    /// No streak is open for the habit: open one starting today
    Start { start: NaiveDate },
    /// Today was already accounted for: change nothing
    AlreadyCounted,
    /// The latest completion was yesterday: the run is unbroken
    Continues,
    /// A gap was detected: close the open interval at the last confirmed
    /// day and open a new one starting today
    Break {
        close_at: NaiveDate,
        restart: NaiveDate,
    },
}

impl StreakUpdate {
    /// Decide the ledger action for a completion recorded today
    ///
    /// `last_completed` is the date of the most recent real completion
    /// event prior to this one; missed-day markers never count.
    pub fn decide(
        open: Option<&StreakInterval>,
        last_completed: Option<NaiveDate>,
        today: NaiveDate,
    ) -> Self {
        if open.is_none() {
            return StreakUpdate::Start { start: today };
        }

        match last_completed {
            Some(date) if date == today => StreakUpdate::AlreadyCounted,
            Some(date) if date == today - Duration::days(1) => StreakUpdate::Continues,
            Some(date) => StreakUpdate::Break {
                close_at: date,
                restart: today,
            },
            // Open interval but no completion on record: keep it running
            // rather than inventing a break date.
            None => StreakUpdate::Continues,
        }
    }
}
