/// End-to-end behavior of the tracker facade
use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use habit_ledger::{AddHabitParams, HabitStore, HabitTracker, ManualClock, ToggleCompletionParams};
use tempfile::tempdir;

fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, 0, 0)
        .unwrap()
}

#[tokio::test]
async fn add_then_list_roundtrip() {
    let dir = tempdir().expect("Failed to create temp dir");
    let clock = Arc::new(ManualClock::new(at(2026, 3, 1, 9)));
    let tracker =
        HabitTracker::open_with_clock(dir.path().join("habits.db"), clock).unwrap();

    let created = tracker
        .add_habit(AddHabitParams {
            name: "Read".to_string(),
            description: Some("30 min".to_string()),
        })
        .await
        .unwrap();
    assert!(!created.habit_id.is_empty());

    let listed = tracker.list_habits().await.unwrap();
    assert_eq!(listed.habits.len(), 1);

    let habit = &listed.habits[0];
    assert_eq!(habit.habit_id, created.habit_id);
    assert_eq!(habit.name, "Read");
    assert_eq!(habit.description.as_deref(), Some("30 min"));
    assert_eq!(habit.creation_date, "2026-03-01");
    assert!(!habit.completed);
}

#[tokio::test]
async fn empty_habit_name_is_rejected() {
    let dir = tempdir().expect("Failed to create temp dir");
    let tracker = HabitTracker::open(dir.path().join("habits.db")).unwrap();

    let result = tracker
        .add_habit(AddHabitParams {
            name: "  ".to_string(),
            description: None,
        })
        .await;
    assert!(result.is_err());

    let listed = tracker.list_habits().await.unwrap();
    assert!(listed.habits.is_empty());
}

#[tokio::test]
async fn database_persists_across_reopen() {
    let dir = tempdir().expect("Failed to create temp dir");
    let db_path = dir.path().join("habits.db");
    let clock = Arc::new(ManualClock::new(at(2026, 3, 1, 9)));

    let created = {
        let tracker = HabitTracker::open_with_clock(&db_path, clock.clone()).unwrap();
        tracker.catch_up().await.unwrap();
        let created = tracker
            .add_habit(AddHabitParams {
                name: "Meditate".to_string(),
                description: None,
            })
            .await
            .unwrap();
        tracker
            .toggle_completion(ToggleCompletionParams {
                id: created.habit_id.clone(),
                completed: true,
            })
            .await
            .unwrap();
        created
    };

    // Second process, same database, later the same day
    clock.set(at(2026, 3, 1, 20));
    let tracker = HabitTracker::open_with_clock(&db_path, clock).unwrap();
    assert_eq!(tracker.catch_up().await.unwrap(), None);

    let listed = tracker.list_habits().await.unwrap();
    assert_eq!(listed.habits.len(), 1);
    assert_eq!(listed.habits[0].habit_id, created.habit_id);
    assert!(listed.habits[0].completed);
}

#[tokio::test]
async fn reopen_after_midnight_resets_flags() {
    let dir = tempdir().expect("Failed to create temp dir");
    let db_path = dir.path().join("habits.db");
    let clock = Arc::new(ManualClock::new(at(2026, 3, 1, 9)));

    {
        let tracker = HabitTracker::open_with_clock(&db_path, clock.clone()).unwrap();
        tracker.catch_up().await.unwrap();
        let created = tracker
            .add_habit(AddHabitParams {
                name: "Meditate".to_string(),
                description: None,
            })
            .await
            .unwrap();
        tracker
            .toggle_completion(ToggleCompletionParams {
                id: created.habit_id,
                completed: true,
            })
            .await
            .unwrap();
    }

    clock.set(at(2026, 3, 2, 7));
    let tracker = HabitTracker::open_with_clock(&db_path, clock).unwrap();
    // The completed habit produced no missed marker, but its flag resets
    assert_eq!(tracker.catch_up().await.unwrap(), Some(0));

    let listed = tracker.list_habits().await.unwrap();
    assert!(!listed.habits[0].completed);
}

#[tokio::test]
async fn scheduler_starts_and_shuts_down() {
    let dir = tempdir().expect("Failed to create temp dir");
    let tracker = HabitTracker::open(dir.path().join("habits.db")).unwrap();

    let scheduler = tracker.start_scheduler();
    scheduler.shutdown().await;

    // The tracker is still serviceable afterwards
    let listed = tracker.list_habits().await.unwrap();
    assert!(listed.habits.is_empty());
}

#[tokio::test]
async fn store_handle_exposes_the_interaction_log() {
    let dir = tempdir().expect("Failed to create temp dir");
    let clock = Arc::new(ManualClock::new(at(2026, 3, 1, 9)));
    let tracker =
        HabitTracker::open_with_clock(dir.path().join("habits.db"), clock.clone()).unwrap();

    tracker.catch_up().await.unwrap();

    let store = tracker.store();
    let store = store.lock().await;
    assert_eq!(store.last_interaction().unwrap(), Some(at(2026, 3, 1, 9)));
}
