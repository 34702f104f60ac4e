/// Rollover detection and backfill behavior across restarts
use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use habit_ledger::{
    AddHabitParams, HabitId, HabitStore, HabitTracker, ManualClock, ToggleCompletionParams,
};
use tempfile::tempdir;

fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, 0, 0)
        .unwrap()
}

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

struct Fixture {
    tracker: HabitTracker,
    clock: Arc<ManualClock>,
    habit_ids: Vec<HabitId>,
    _dir: tempfile::TempDir,
}

/// Tracker with two habits, started at 2026-03-01 09:00 with the
/// baseline interaction already recorded
async fn fixture() -> Fixture {
    let dir = tempdir().expect("Failed to create temp dir");
    let clock = Arc::new(ManualClock::new(at(2026, 3, 1, 9)));
    let tracker = HabitTracker::open_with_clock(dir.path().join("habits.db"), clock.clone())
        .expect("Failed to open tracker");

    tracker.catch_up().await.expect("Startup catch-up failed");

    let mut habit_ids = Vec::new();
    for name in ["Read", "Run"] {
        let created = tracker
            .add_habit(AddHabitParams {
                name: name.to_string(),
                description: None,
            })
            .await
            .expect("Failed to add habit");
        habit_ids.push(HabitId::parse(&created.habit_id).unwrap());
    }

    Fixture {
        tracker,
        clock,
        habit_ids,
        _dir: dir,
    }
}

#[tokio::test]
async fn startup_after_midnight_backfills_one_missed_day() {
    let fx = fixture().await;

    // One habit completed before the gap, one not
    fx.tracker
        .toggle_completion(ToggleCompletionParams {
            id: fx.habit_ids[0].to_string(),
            completed: true,
        })
        .await
        .unwrap();

    // The app comes back two days later
    fx.clock.set(at(2026, 3, 3, 10));
    let logged = fx.tracker.catch_up().await.unwrap();
    assert_eq!(logged, Some(1));

    let store = fx.tracker.store();
    let store = store.lock().await;

    // The uncompleted habit got exactly one missed marker, dated at the
    // last day the app was seen, stamped 23:59:59
    let events = store.events_for_habit(&fx.habit_ids[1]).unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].date, day(2026, 3, 1));
    assert_eq!(events[0].time.to_string(), "23:59:59");
    assert!(!events[0].completed);

    // The completed habit got no synthetic event beyond its real one
    let events = store.events_for_habit(&fx.habit_ids[0]).unwrap();
    assert_eq!(events.len(), 1);
    assert!(events[0].completed);

    // Every flag is back to false
    let habits = store.list_habits().unwrap();
    assert!(habits.iter().all(|h| !h.completed));
}

#[tokio::test]
async fn same_day_startup_is_spurious_free() {
    let fx = fixture().await;

    fx.tracker
        .toggle_completion(ToggleCompletionParams {
            id: fx.habit_ids[0].to_string(),
            completed: true,
        })
        .await
        .unwrap();

    // Restart later the same day
    fx.clock.set(at(2026, 3, 1, 22));
    let logged = fx.tracker.catch_up().await.unwrap();
    assert_eq!(logged, None);

    let store = fx.tracker.store();
    let store = store.lock().await;

    // No synthetic events anywhere
    for id in &fx.habit_ids {
        let events = store.events_for_habit(id).unwrap();
        assert!(events.iter().all(|e| e.completed));
    }

    // The completed flag survived
    let habits = store.list_habits().unwrap();
    assert!(habits.iter().any(|h| h.completed));
}

#[tokio::test]
async fn catch_up_is_once_per_gap() {
    let fx = fixture().await;

    fx.clock.set(at(2026, 3, 5, 8));
    let first = fx.tracker.catch_up().await.unwrap();
    assert_eq!(first, Some(2));

    // A second startup the same day finds the fresh marker and stays quiet
    let second = fx.tracker.catch_up().await.unwrap();
    assert_eq!(second, None);

    let store = fx.tracker.store();
    let store = store.lock().await;
    for id in &fx.habit_ids {
        assert_eq!(store.events_for_habit(id).unwrap().len(), 1);
    }
}

#[tokio::test]
async fn multi_day_gap_backfills_only_the_last_seen_day() {
    let fx = fixture().await;

    // Ten days away; the design logs a single missed day, not ten
    fx.clock.set(at(2026, 3, 11, 9));
    fx.tracker.catch_up().await.unwrap();

    let store = fx.tracker.store();
    let store = store.lock().await;
    let events = store.events_for_habit(&fx.habit_ids[0]).unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].date, day(2026, 3, 1));
}

#[tokio::test]
async fn missed_day_breaks_the_streak_at_the_last_completed_date() {
    let fx = fixture().await;

    fx.tracker
        .toggle_completion(ToggleCompletionParams {
            id: fx.habit_ids[0].to_string(),
            completed: true,
        })
        .await
        .unwrap();

    // Offline across two midnights, then completed again on return;
    // the streak must close at the last completed date
    fx.clock.set(at(2026, 3, 3, 9));
    fx.tracker.catch_up().await.unwrap();

    fx.tracker
        .toggle_completion(ToggleCompletionParams {
            id: fx.habit_ids[0].to_string(),
            completed: true,
        })
        .await
        .unwrap();

    let store = fx.tracker.store();
    let store = store.lock().await;
    let streaks = store.list_streaks(&fx.habit_ids[0]).unwrap();
    assert_eq!(streaks.len(), 2);
    assert_eq!(streaks[0].end_date, Some(day(2026, 3, 1)));
    assert_eq!(streaks[1].start_date, day(2026, 3, 3));
    assert_eq!(streaks[1].end_date, None);
}
