/// Midnight rollover: offline catch-up and the in-process scheduler
///
/// Two entry points share one rollover pass. The detector runs once at
/// startup and covers midnights that elapsed while the app was closed;
/// the scheduler covers midnights crossed while it is running. Keeping a
/// single pass function is what stops the two paths from drifting apart.

use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{Duration, NaiveDate, NaiveDateTime};
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::clock::Clock;
use crate::domain::CompletionEvent;
use crate::storage::{HabitStore, StorageError};

/// One rollover pass for the day that ended on `missed_date`
///
/// Appends a synthetic missed event dated `missed_date` for every habit
/// whose completed flag is still false, clears every flag, and records a
/// fresh interaction marker so the same day is not backfilled twice.
/// Returns how many missed events were logged.
pub fn run_rollover<S: HabitStore>(
    store: &S,
    missed_date: NaiveDate,
    now: NaiveDateTime,
) -> Result<usize, StorageError> {
    let habits = store.list_habits()?;

    let mut logged = 0;
    for habit in habits.iter().filter(|h| !h.completed) {
        store.append_event(&CompletionEvent::missed(habit.id.clone(), missed_date))?;
        logged += 1;
    }

    store.reset_all_completed()?;
    store.record_interaction(now)?;

    info!(
        "Rollover pass for {}: {} habits logged as missed, all flags reset",
        missed_date, logged
    );
    Ok(logged)
}

/// Startup detector for midnights crossed while the app was not running
///
/// Reads the last interaction marker. With no marker this is the first
/// run: a baseline marker is recorded and nothing else happens. When the
/// marker's date is before today, one rollover pass backfills the marker's
/// date. Gaps longer than a day still backfill only that single day.
/// Returns the number of missed events logged, or None when no midnight
/// elapsed.
pub fn catch_up_after_offline<S: HabitStore>(
    store: &S,
    clock: &dyn Clock,
) -> Result<Option<usize>, StorageError> {
    let now = clock.now();

    match store.last_interaction()? {
        None => {
            debug!("No previous interaction found, recording baseline");
            store.record_interaction(now)?;
            Ok(None)
        }
        Some(last) if last.date() < now.date() => {
            info!(
                "Last interaction was {}, today is {}: backfilling missed day",
                last.date(),
                now.date()
            );
            let logged = run_rollover(store, last.date(), now)?;
            Ok(Some(logged))
        }
        Some(_) => {
            // Same-day restart: the app is being interacted with, nothing
            // to roll over.
            store.record_interaction(now)?;
            Ok(None)
        }
    }
}

/// Time remaining until the next local midnight
pub fn delay_until_midnight(now: NaiveDateTime) -> StdDuration {
    let next_midnight = (now.date() + Duration::days(1))
        .and_hms_opt(0, 0, 0)
        .unwrap();
    (next_midnight - now).to_std().unwrap_or(StdDuration::ZERO)
}

/// Perpetual self-rescheduling midnight timer
///
/// Sleeps until the next local midnight, runs the shared rollover pass for
/// the day that just ended under the store lock, and reschedules itself.
/// The original design never cancels this; the handle exists for clean
/// shutdown and for tests.
pub struct RolloverScheduler {
    shutdown: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl RolloverScheduler {
    /// Spawn the scheduler task on the current tokio runtime
    pub fn spawn<S>(store: Arc<Mutex<S>>, clock: Arc<dyn Clock>) -> Self
    where
        S: HabitStore + Send + 'static,
    {
        let (shutdown, mut stopped) = watch::channel(false);

        let handle = tokio::spawn(async move {
            loop {
                let delay = delay_until_midnight(clock.now());
                debug!("Next rollover in {:?}", delay);

                tokio::select! {
                    _ = tokio::time::sleep(delay) => {
                        let now = clock.now();
                        let ended = now.date() - Duration::days(1);

                        let store = store.lock().await;
                        if let Err(e) = run_rollover(&*store, ended, now) {
                            // Storage failures are not fatal to the
                            // scheduler; the next midnight retries.
                            error!("Rollover pass failed: {}", e);
                        }
                    }
                    _ = stopped.changed() => {
                        info!("Rollover scheduler stopped");
                        break;
                    }
                }
            }
        });

        Self { shutdown, handle }
    }

    /// Stop the timer and wait for the task to finish
    pub async fn shutdown(self) {
        let _ = self.shutdown.send(true);
        let _ = self.handle.await;
    }
}
