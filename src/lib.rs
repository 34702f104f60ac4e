/// Public library interface for the habit tracker core
///
/// This crate is the daily-rollover and streak-accounting engine behind a
/// desktop habit tracker UI. It owns the durable store, detects midnights
/// crossed while the app was closed, runs the in-process midnight timer,
/// and exposes the three commands the UI collaborator calls.

use std::path::Path;
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::Mutex;

// Internal modules
mod clock;
mod commands;
mod domain;
mod ipc;
mod rollover;
mod storage;

// Re-export public modules and types
pub use clock::{Clock, ManualClock, SystemClock};
pub use commands::{
    AddHabitParams, AddHabitResponse, HabitSummary, ListHabitsResponse, ToggleCompletionParams,
    ToggleCompletionResponse,
};
pub use domain::*;
pub use ipc::{CommandServer, Request, Response};
pub use rollover::{catch_up_after_offline, delay_until_midnight, run_rollover, RolloverScheduler};
pub use storage::{HabitStore, SqliteStore, StorageError};

/// Errors that can occur during tracker operation
#[derive(Error, Debug)]
pub enum TrackerError {
    #[error("Database error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("Domain validation error: {0}")]
    Domain(#[from] domain::DomainError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown command: {0}")]
    UnknownCommand(String),
}

/// The tracker core: shared store, clock, and command entry points
///
/// The store lives behind one async mutex; every command and every
/// rollover pass holds the lock for its whole multi-step sequence, which
/// keeps per-habit operations in program order and keeps rollovers from
/// interleaving with a half-applied toggle.
pub struct HabitTracker {
    store: Arc<Mutex<SqliteStore>>,
    clock: Arc<dyn Clock>,
}

impl HabitTracker {
    /// Open the tracker against a database file using the system clock
    pub fn open(db_path: impl AsRef<Path>) -> Result<Self, TrackerError> {
        Self::open_with_clock(db_path, Arc::new(SystemClock))
    }

    /// Open the tracker with an injected clock (used by tests)
    pub fn open_with_clock(
        db_path: impl AsRef<Path>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, TrackerError> {
        tracing::info!("Initializing habit tracker with database: {:?}", db_path.as_ref());

        let store = SqliteStore::open(db_path)?;

        Ok(Self {
            store: Arc::new(Mutex::new(store)),
            clock,
        })
    }

    /// Run the startup rollover detection
    ///
    /// Must be called once before serving commands. Returns the number of
    /// missed events backfilled, or None when no midnight elapsed.
    pub async fn catch_up(&self) -> Result<Option<usize>, TrackerError> {
        let store = self.store.lock().await;
        Ok(rollover::catch_up_after_offline(&*store, self.clock.as_ref())?)
    }

    /// Spawn the perpetual midnight rollover timer
    pub fn start_scheduler(&self) -> RolloverScheduler {
        RolloverScheduler::spawn(self.store.clone(), self.clock.clone())
    }

    /// Create a new habit
    pub async fn add_habit(&self, params: AddHabitParams) -> Result<AddHabitResponse, TrackerError> {
        let store = self.store.lock().await;
        commands::add_habit(&*store, self.clock.as_ref(), params)
    }

    /// Snapshot of every habit
    pub async fn list_habits(&self) -> Result<ListHabitsResponse, TrackerError> {
        let store = self.store.lock().await;
        commands::list_habits(&*store)
    }

    /// Update a habit's completed-today flag, settling the streak ledger
    /// on a transition to completed
    pub async fn toggle_completion(
        &self,
        params: ToggleCompletionParams,
    ) -> Result<ToggleCompletionResponse, TrackerError> {
        let store = self.store.lock().await;
        commands::toggle_completion(&*store, self.clock.as_ref(), params)
    }

    /// Shared handle to the store (useful for tests)
    pub fn store(&self) -> Arc<Mutex<SqliteStore>> {
        self.store.clone()
    }
}
