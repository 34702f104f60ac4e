/// Command interface consumed by the UI collaborator
///
/// Three operations: add a habit, list habits, toggle a habit's
/// completed-today flag. Each is a plain function generic over the
/// storage seam so tests can drive them directly.

pub mod add;
pub mod list;
pub mod toggle;

pub use add::{add_habit, AddHabitParams, AddHabitResponse};
pub use list::{list_habits, HabitSummary, ListHabitsResponse};
pub use toggle::{toggle_completion, ToggleCompletionParams, ToggleCompletionResponse};
