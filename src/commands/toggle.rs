/// Command for toggling a habit's completed-today flag
///
/// This is the write path that feeds the streak ledger. The original
/// implementation ran it as a nest of callbacks; here it is a sequential
/// pipeline with the per-habit ordering explicit: record the interaction,
/// update the flag, read the prior completion, append the new event, then
/// apply the ledger decision. The caller holds the store lock for the
/// whole sequence.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::clock::Clock;
use crate::domain::{CompletionEvent, HabitId, StreakUpdate};
use crate::storage::HabitStore;
use crate::TrackerError;

/// Parameters for updating a habit's completion
#[derive(Debug, Deserialize)]
pub struct ToggleCompletionParams {
    pub id: String,
    pub completed: bool,
}

/// Acknowledgement of a completion update
#[derive(Debug, Serialize)]
pub struct ToggleCompletionResponse {
    pub id: String,
    pub completed: bool,
}

/// Update a habit's transient completed flag and, on a transition to
/// completed, log the event and settle the streak ledger
///
/// An unknown habit id is acknowledged as a no-op rather than failing the
/// session. Unchecking never retracts events or streaks.
pub fn toggle_completion<S: HabitStore>(
    store: &S,
    clock: &dyn Clock,
    params: ToggleCompletionParams,
) -> Result<ToggleCompletionResponse, TrackerError> {
    let now = clock.now();
    store.record_interaction(now)?;

    let habit_id = match HabitId::parse(&params.id) {
        Ok(id) => id,
        Err(_) => {
            warn!("Ignoring completion update for malformed habit id {}", params.id);
            return Ok(ToggleCompletionResponse {
                id: params.id,
                completed: params.completed,
            });
        }
    };

    let found = store.set_habit_completed(&habit_id, params.completed)?;
    if !found {
        warn!("Ignoring completion update for unknown habit {}", habit_id);
        return Ok(ToggleCompletionResponse {
            id: params.id,
            completed: params.completed,
        });
    }

    if params.completed {
        // The prior completion must be read before the new event lands,
        // otherwise the ledger would always see "today".
        let prior = store.latest_completion(&habit_id)?;
        let open = store.current_open_streak(&habit_id)?;

        store.append_event(&CompletionEvent::recorded(habit_id.clone(), now))?;

        let update = StreakUpdate::decide(open.as_ref(), prior.map(|e| e.date), now.date());
        debug!("Streak decision for habit {}: {:?}", habit_id, update);

        match update {
            StreakUpdate::Start { start } => {
                store.open_streak(&habit_id, start)?;
            }
            StreakUpdate::AlreadyCounted | StreakUpdate::Continues => {}
            StreakUpdate::Break { close_at, restart } => {
                // `open` is present whenever decide() returns Break
                if let Some(open) = open {
                    store.close_streak(&open.id, close_at)?;
                }
                store.open_streak(&habit_id, restart)?;
            }
        }
    }

    Ok(ToggleCompletionResponse {
        id: params.id,
        completed: params.completed,
    })
}
