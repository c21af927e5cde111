//! End-to-end tests over the local backend: submit through the
//! ingestion pipeline, read back through the aggregation pipeline.

use chrono::NaiveDate;
use trimcoach::dashboard::{self, RECENT_ROWS};
use trimcoach::ingest::{self, MealEntry, SubmitError, WeightEntry, WorkoutEntry};
use trimcoach::records::{Alcohol, MealSlot, StreamKind, WorkoutType};
use trimcoach::storage::{self, CsvStore, StreamStore};

fn test_store() -> (tempfile::TempDir, CsvStore) {
    let dir = tempfile::tempdir().unwrap();
    let store = CsvStore::new(dir.path().to_path_buf());
    storage::init_streams(&store).unwrap();
    (dir, store)
}

fn date(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

fn weight_entry(d: &str, weight_kg: f64, waist_cm: f64) -> WeightEntry {
    WeightEntry {
        date: date(d),
        weight_kg,
        waist_cm,
        sleep_h: 7.0,
        condition: 3,
        alcohol: Alcohol::None,
    }
}

#[test]
fn test_submitted_record_is_last_row_in_schema_order() {
    let (_dir, store) = test_store();

    ingest::submit_weight(&store, weight_entry("2024-01-01", 70.0, 80.0)).unwrap();
    ingest::submit_weight(&store, weight_entry("2024-01-02", 69.8, 0.0)).unwrap();

    let table = store.read_all(StreamKind::Weight).unwrap();
    assert_eq!(table.columns, StreamKind::Weight.columns());
    assert_eq!(table.len(), 2);

    let last = &table.rows[1];
    assert_eq!(last[1], "2024-01-02");
    assert_eq!(last[2], "69.8");
    assert_eq!(last[6], "없음");
}

#[test]
fn test_dashboard_over_submitted_entries() {
    let (_dir, store) = test_store();

    ingest::submit_weight(&store, weight_entry("2024-01-01", 70.0, 80.0)).unwrap();
    ingest::submit_weight(&store, weight_entry("2024-01-03", 69.5, 0.0)).unwrap();
    ingest::submit_meal(
        &store,
        MealEntry {
            date: date("2024-01-03"),
            meal_slot: MealSlot::PostWorkout,
            items: "위트빅스 3조각 + 프로틴 1스쿱, 햄 200g".to_string(),
            notes: String::new(),
        },
    )
    .unwrap();
    ingest::submit_workout(
        &store,
        WorkoutEntry {
            date: date("2024-01-03"),
            workout_type: WorkoutType::LowerBody,
            duration_min: 60,
            notes: "스쿼트 170".to_string(),
        },
    )
    .unwrap();

    let model = dashboard::summarize(&store);

    let summary = model.weight.unwrap().unwrap();
    assert_eq!(summary.latest_weight.unwrap().value, 69.5);
    assert_eq!(summary.latest_rolling, Some(69.75));
    // Waist 0 was measured as absent at entry time but is still a
    // stored number; the latest non-missing value is the zero
    assert_eq!(summary.latest_waist.unwrap().value, 0.0);
    assert_eq!(summary.weight_series.len(), 2);

    let meals = model.recent_meals.unwrap();
    assert_eq!(meals.len(), 1);
    assert_eq!(meals.cell(0, "items"), "위트빅스 3조각 + 프로틴 1스쿱, 햄 200g");

    let workouts = model.recent_workouts.unwrap();
    assert_eq!(workouts.cell(0, "workout_type"), "하체");
    assert_eq!(workouts.cell(0, "duration_min"), "60");
}

#[test]
fn test_latest_waist_tracks_independently_of_weight() {
    let (_dir, store) = test_store();

    ingest::submit_weight(&store, weight_entry("2024-01-01", 70.0, 80.0)).unwrap();
    // A row edited by hand in the sheet: weight present, waist blank
    store
        .append(
            StreamKind::Weight,
            &[
                "2024-01-03T21:00:00".to_string(),
                "2024-01-03".to_string(),
                "69.5".to_string(),
                String::new(),
                "7".to_string(),
                "3".to_string(),
                "없음".to_string(),
            ],
        )
        .unwrap();

    let summary = dashboard::weight_summary(&store).unwrap().unwrap();

    let latest_weight = summary.latest_weight.unwrap();
    assert_eq!(latest_weight.value, 69.5);
    assert_eq!(latest_weight.date, date("2024-01-03"));

    let latest_waist = summary.latest_waist.unwrap();
    assert_eq!(latest_waist.value, 80.0);
    assert_eq!(latest_waist.date, date("2024-01-01"));
}

#[test]
fn test_validation_failure_writes_nothing() {
    let (_dir, store) = test_store();

    let result = ingest::submit_meal(
        &store,
        MealEntry {
            date: date("2024-01-01"),
            meal_slot: MealSlot::Other,
            items: "   ".to_string(),
            notes: "note".to_string(),
        },
    );

    assert!(matches!(result, Err(SubmitError::Validation(_))));
    assert!(store.read_all(StreamKind::Meals).unwrap().is_empty());
}

#[test]
fn test_reinitializing_a_session_never_duplicates_headers() {
    let dir = tempfile::tempdir().unwrap();

    // First session
    let store = CsvStore::new(dir.path().to_path_buf());
    storage::init_streams(&store).unwrap();
    ingest::submit_weight(&store, weight_entry("2024-01-01", 70.0, 0.0)).unwrap();

    // Second session over the same directory
    let store = CsvStore::new(dir.path().to_path_buf());
    storage::init_streams(&store).unwrap();

    let table = store.read_all(StreamKind::Weight).unwrap();
    assert_eq!(table.len(), 1);
    let raw = std::fs::read_to_string(dir.path().join("weight.csv")).unwrap();
    assert_eq!(raw.matches("timestamp").count(), 1);
}

#[test]
fn test_recent_tables_cap_at_ten_rows() {
    let (_dir, store) = test_store();

    for day in 1..=12 {
        ingest::submit_meal(
            &store,
            MealEntry {
                date: date(&format!("2024-01-{:02}", day)),
                meal_slot: MealSlot::AtWork,
                items: format!("meal {}", day),
                notes: String::new(),
            },
        )
        .unwrap();
    }

    let model = dashboard::summarize(&store);
    let meals = model.recent_meals.unwrap();
    assert_eq!(meals.len(), RECENT_ROWS);
    // Insertion order, most recent last
    assert_eq!(meals.cell(0, "items"), "meal 3");
    assert_eq!(meals.cell(9, "items"), "meal 12");
}

#[test]
fn test_empty_weight_stream_signals_no_data_end_to_end() {
    let (_dir, store) = test_store();

    ingest::submit_workout(
        &store,
        WorkoutEntry {
            date: date("2024-01-01"),
            workout_type: WorkoutType::Rest,
            duration_min: 0,
            notes: String::new(),
        },
    )
    .unwrap();

    let model = dashboard::summarize(&store);
    assert!(matches!(model.weight, Ok(None)));
    assert_eq!(model.recent_workouts.unwrap().len(), 1);
}
