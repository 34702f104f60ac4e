/// SQLite implementation of the habit storage interface
///
/// This module provides the concrete SQLite implementation for storing
/// and retrieving tracker data. It handles all SQL queries and data
/// conversion. Dates are stored as `YYYY-MM-DD` text, times as `HH:MM:SS`,
/// interaction markers as `YYYY-MM-DD HH:MM:SS`, all local wall-clock.

use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rusqlite::{params, Connection};

use crate::domain::{CompletionEvent, EventId, Habit, HabitId, StreakId, StreakInterval};
use crate::storage::{migrations, HabitStore, StorageError};

const TIME_FORMAT: &str = "%H:%M:%S";
const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// SQLite-based storage implementation
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (or create) the database file and run any pending migrations
    pub fn open(db_path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let db_path = db_path.as_ref();
        let conn = Connection::open(db_path)
            .map_err(|e| StorageError::Connection(format!("Failed to open database: {}", e)))?;

        conn.execute("PRAGMA foreign_keys = ON", [])
            .map_err(|e| StorageError::Connection(format!("Failed to enable foreign keys: {}", e)))?;

        migrations::initialize_database(&conn)?;

        tracing::info!("SQLite store initialized at: {:?}", db_path);

        Ok(Self { conn })
    }

    /// In-memory database, used by tests
    pub fn open_in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| StorageError::Connection(format!("Failed to open database: {}", e)))?;
        migrations::initialize_database(&conn)?;
        Ok(Self { conn })
    }

    fn invalid_column(index: usize, what: &str) -> rusqlite::Error {
        rusqlite::Error::InvalidColumnType(index, what.to_string(), rusqlite::types::Type::Text)
    }

    fn habit_from_row(row: &rusqlite::Row<'_>) -> Result<Habit, rusqlite::Error> {
        let id_str: String = row.get(0)?;
        let id = HabitId::parse(&id_str).map_err(|_| Self::invalid_column(0, "Invalid UUID"))?;

        let created_on_str: String = row.get(3)?;
        let created_on = NaiveDate::parse_from_str(&created_on_str, "%Y-%m-%d")
            .map_err(|_| Self::invalid_column(3, "Invalid date"))?;

        Ok(Habit::from_existing(
            id,
            row.get(1)?, // name
            row.get(2)?, // description
            created_on,
            row.get(4)?, // completed
        ))
    }

    fn event_from_row(row: &rusqlite::Row<'_>) -> Result<CompletionEvent, rusqlite::Error> {
        let id_str: String = row.get(0)?;
        let id = EventId::parse(&id_str).map_err(|_| Self::invalid_column(0, "Invalid UUID"))?;

        let habit_id_str: String = row.get(1)?;
        let habit_id =
            HabitId::parse(&habit_id_str).map_err(|_| Self::invalid_column(1, "Invalid UUID"))?;

        let date_str: String = row.get(2)?;
        let date = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d")
            .map_err(|_| Self::invalid_column(2, "Invalid date"))?;

        let time_str: String = row.get(3)?;
        let time = NaiveTime::parse_from_str(&time_str, TIME_FORMAT)
            .map_err(|_| Self::invalid_column(3, "Invalid time"))?;

        // day_of_week is stored redundantly and re-derived from the date
        Ok(CompletionEvent::from_existing(
            id,
            habit_id,
            date,
            time,
            row.get(4)?, // completion_status
        ))
    }

    fn streak_from_row(row: &rusqlite::Row<'_>) -> Result<StreakInterval, rusqlite::Error> {
        let id_str: String = row.get(0)?;
        let id = StreakId::parse(&id_str).map_err(|_| Self::invalid_column(0, "Invalid UUID"))?;

        let habit_id_str: String = row.get(1)?;
        let habit_id =
            HabitId::parse(&habit_id_str).map_err(|_| Self::invalid_column(1, "Invalid UUID"))?;

        let start_str: String = row.get(2)?;
        let start_date = NaiveDate::parse_from_str(&start_str, "%Y-%m-%d")
            .map_err(|_| Self::invalid_column(2, "Invalid date"))?;

        let end_str: Option<String> = row.get(3)?;
        let end_date = match end_str {
            Some(s) => Some(
                NaiveDate::parse_from_str(&s, "%Y-%m-%d")
                    .map_err(|_| Self::invalid_column(3, "Invalid date"))?,
            ),
            None => None,
        };

        Ok(StreakInterval::from_existing(
            id,
            habit_id,
            start_date,
            end_date,
            row.get(4)?, // length
        ))
    }
}

impl HabitStore for SqliteStore {
    fn create_habit(&self, habit: &Habit) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT INTO habits (id, name, description, creation_date, completed)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                habit.id.to_string(),
                habit.name,
                habit.description,
                habit.created_on.to_string(),
                habit.completed,
            ],
        )?;

        tracing::debug!("Created habit: {} ({})", habit.name, habit.id);
        Ok(())
    }

    fn list_habits(&self) -> Result<Vec<Habit>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, description, creation_date, completed
             FROM habits ORDER BY creation_date, name",
        )?;

        let habit_iter = stmt.query_map([], Self::habit_from_row)?;

        let mut habits = Vec::new();
        for habit in habit_iter {
            habits.push(habit?);
        }

        Ok(habits)
    }

    fn set_habit_completed(
        &self,
        habit_id: &HabitId,
        completed: bool,
    ) -> Result<bool, StorageError> {
        let rows_affected = self.conn.execute(
            "UPDATE habits SET completed = ?1 WHERE id = ?2",
            params![completed, habit_id.to_string()],
        )?;

        Ok(rows_affected > 0)
    }

    fn reset_all_completed(&self) -> Result<(), StorageError> {
        let rows_affected = self.conn.execute("UPDATE habits SET completed = 0", [])?;
        tracing::debug!("Reset completed flag on {} habits", rows_affected);
        Ok(())
    }

    fn append_event(&self, event: &CompletionEvent) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT INTO completion_log (id, habit_id, date, day_of_week, time, completion_status)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                event.id.to_string(),
                event.habit_id.to_string(),
                event.date.to_string(),
                event.day_of_week.num_days_from_sunday(),
                event.time.format(TIME_FORMAT).to_string(),
                event.completed,
            ],
        )?;

        tracing::debug!(
            "Logged {} event for habit {} on {}",
            if event.completed { "completion" } else { "missed" },
            event.habit_id,
            event.date
        );
        Ok(())
    }

    fn latest_completion(
        &self,
        habit_id: &HabitId,
    ) -> Result<Option<CompletionEvent>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, habit_id, date, time, completion_status
             FROM completion_log
             WHERE habit_id = ?1 AND completion_status = 1
             ORDER BY date DESC, time DESC LIMIT 1",
        )?;

        let result = stmt.query_row(params![habit_id.to_string()], Self::event_from_row);

        match result {
            Ok(event) => Ok(Some(event)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(StorageError::Query(e)),
        }
    }

    fn events_for_habit(
        &self,
        habit_id: &HabitId,
    ) -> Result<Vec<CompletionEvent>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, habit_id, date, time, completion_status
             FROM completion_log
             WHERE habit_id = ?1
             ORDER BY date, time",
        )?;

        let event_iter = stmt.query_map(params![habit_id.to_string()], Self::event_from_row)?;

        let mut events = Vec::new();
        for event in event_iter {
            events.push(event?);
        }

        Ok(events)
    }

    fn open_streak(
        &self,
        habit_id: &HabitId,
        start_date: NaiveDate,
    ) -> Result<StreakInterval, StorageError> {
        let streak = StreakInterval::open(habit_id.clone(), start_date);

        self.conn.execute(
            "INSERT INTO streaks (id, habit_id, start_date, end_date, length)
             VALUES (?1, ?2, ?3, NULL, 0)",
            params![
                streak.id.to_string(),
                streak.habit_id.to_string(),
                streak.start_date.to_string(),
            ],
        )?;

        tracing::debug!("Opened streak for habit {} starting {}", habit_id, start_date);
        Ok(streak)
    }

    fn close_streak(&self, streak_id: &StreakId, end_date: NaiveDate) -> Result<(), StorageError> {
        let rows_affected = self.conn.execute(
            "UPDATE streaks
             SET end_date = ?1,
                 length = CAST(julianday(?1) - julianday(start_date) AS INTEGER)
             WHERE id = ?2",
            params![end_date.to_string(), streak_id.to_string()],
        )?;

        if rows_affected == 0 {
            return Err(StorageError::StreakNotFound {
                streak_id: streak_id.to_string(),
            });
        }

        tracing::debug!("Closed streak {} at {}", streak_id, end_date);
        Ok(())
    }

    fn current_open_streak(
        &self,
        habit_id: &HabitId,
    ) -> Result<Option<StreakInterval>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, habit_id, start_date, end_date, length
             FROM streaks
             WHERE habit_id = ?1 AND end_date IS NULL LIMIT 1",
        )?;

        let result = stmt.query_row(params![habit_id.to_string()], Self::streak_from_row);

        match result {
            Ok(streak) => Ok(Some(streak)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(StorageError::Query(e)),
        }
    }

    fn list_streaks(&self, habit_id: &HabitId) -> Result<Vec<StreakInterval>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, habit_id, start_date, end_date, length
             FROM streaks
             WHERE habit_id = ?1
             ORDER BY start_date",
        )?;

        let streak_iter = stmt.query_map(params![habit_id.to_string()], Self::streak_from_row)?;

        let mut streaks = Vec::new();
        for streak in streak_iter {
            streaks.push(streak?);
        }

        Ok(streaks)
    }

    fn record_interaction(&self, at: NaiveDateTime) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT INTO last_updates (last_interaction) VALUES (?1)",
            params![at.format(DATETIME_FORMAT).to_string()],
        )?;

        tracing::debug!("Interaction logged at {}", at.format(DATETIME_FORMAT));
        Ok(())
    }

    fn last_interaction(&self) -> Result<Option<NaiveDateTime>, StorageError> {
        let result = self.conn.query_row(
            "SELECT last_interaction FROM last_updates ORDER BY id DESC LIMIT 1",
            [],
            |row| {
                let raw: String = row.get(0)?;
                NaiveDateTime::parse_from_str(&raw, DATETIME_FORMAT)
                    .map_err(|_| Self::invalid_column(0, "Invalid datetime"))
            },
        );

        match result {
            Ok(at) => Ok(Some(at)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(StorageError::Query(e)),
        }
    }
}
