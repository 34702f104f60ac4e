/// Command for creating a new habit

use serde::{Deserialize, Serialize};

use crate::clock::Clock;
use crate::domain::Habit;
use crate::storage::HabitStore;
use crate::TrackerError;

/// Parameters for creating a new habit
#[derive(Debug, Deserialize)]
pub struct AddHabitParams {
    pub name: String,
    pub description: Option<String>,
}

/// Response from creating a habit
#[derive(Debug, Serialize)]
pub struct AddHabitResponse {
    pub habit_id: String,
}

/// Create a new habit dated with today's local date
pub fn add_habit<S: HabitStore>(
    store: &S,
    clock: &dyn Clock,
    params: AddHabitParams,
) -> Result<AddHabitResponse, TrackerError> {
    let habit = Habit::new(params.name, params.description, clock.today())?;

    store.create_habit(&habit)?;

    tracing::info!("Added habit '{}' ({})", habit.name, habit.id);
    Ok(AddHabitResponse {
        habit_id: habit.id.to_string(),
    })
}
