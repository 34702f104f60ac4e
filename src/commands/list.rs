/// Command for listing all habits

use serde::Serialize;

use crate::storage::HabitStore;
use crate::TrackerError;

/// One habit in the list response
///
/// The UI collaborator filters and orders client-side, so this is a plain
/// snapshot of every habit.
#[derive(Debug, Serialize)]
pub struct HabitSummary {
    pub habit_id: String,
    pub name: String,
    pub description: Option<String>,
    pub creation_date: String,
    pub completed: bool,
}

/// Response from listing habits
#[derive(Debug, Serialize)]
pub struct ListHabitsResponse {
    pub habits: Vec<HabitSummary>,
}

/// List every habit
pub fn list_habits<S: HabitStore>(store: &S) -> Result<ListHabitsResponse, TrackerError> {
    let habits = store.list_habits()?;

    let habits = habits
        .into_iter()
        .map(|habit| HabitSummary {
            habit_id: habit.id.to_string(),
            name: habit.name,
            description: habit.description,
            creation_date: habit.created_on.to_string(),
            completed: habit.completed,
        })
        .collect();

    Ok(ListHabitsResponse { habits })
}
