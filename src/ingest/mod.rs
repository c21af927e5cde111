//! Ingestion pipeline: validate a submitted entry, stamp it, and append
//! it to the right stream.
//!
//! Exactly one row is appended per successful submit; validation
//! failures are reported before any backend call is made.

use crate::records::{
    Alcohol, MealRecord, MealSlot, StreamKind, WeightRecord, WorkoutRecord, WorkoutType,
};
use crate::storage::{StorageError, StreamStore};
use chrono::{Local, NaiveDate};

/// A weight/condition entry as submitted by the user (no timestamp yet).
#[derive(Debug, Clone)]
pub struct WeightEntry {
    /// Calendar date the entry is for
    pub date: NaiveDate,
    /// Body weight in kilograms
    pub weight_kg: f64,
    /// Waist circumference in centimeters (0 = not measured)
    pub waist_cm: f64,
    /// Sleep duration in hours
    pub sleep_h: f64,
    /// Subjective condition, 1-5
    pub condition: u8,
    /// Alcohol intake
    pub alcohol: Alcohol,
}

/// A meal entry as submitted by the user.
#[derive(Debug, Clone)]
pub struct MealEntry {
    /// Calendar date the entry is for
    pub date: NaiveDate,
    /// Which part of the day the meal belongs to
    pub meal_slot: MealSlot,
    /// What was eaten (free text, required non-empty)
    pub items: String,
    /// Optional note
    pub notes: String,
}

/// A workout entry as submitted by the user.
#[derive(Debug, Clone)]
pub struct WorkoutEntry {
    /// Calendar date the entry is for
    pub date: NaiveDate,
    /// Workout category
    pub workout_type: WorkoutType,
    /// Duration in minutes
    pub duration_min: u32,
    /// Optional note
    pub notes: String,
}

/// Submission errors.
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    /// A required field failed validation; the backend was never called
    #[error("validation failed: {0}")]
    Validation(String),

    /// The backend rejected the append; nothing was written
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Append a weight/condition entry to the `weight` stream.
pub fn submit_weight(store: &dyn StreamStore, entry: WeightEntry) -> Result<(), SubmitError> {
    let record = WeightRecord {
        timestamp: Local::now(),
        date: entry.date,
        weight_kg: entry.weight_kg,
        waist_cm: entry.waist_cm,
        sleep_h: entry.sleep_h,
        condition: entry.condition,
        alcohol: entry.alcohol,
    };

    store.append(StreamKind::Weight, &record.to_row())?;
    tracing::info!("Logged weight entry for {}", entry.date);
    Ok(())
}

/// Append a meal entry to the `meals` stream.
///
/// `items` must be non-empty after trimming; `items` and `notes` are
/// stored trimmed.
pub fn submit_meal(store: &dyn StreamStore, entry: MealEntry) -> Result<(), SubmitError> {
    let items = entry.items.trim();
    if items.is_empty() {
        return Err(SubmitError::Validation(
            "meal items must not be empty".to_string(),
        ));
    }

    let record = MealRecord {
        timestamp: Local::now(),
        date: entry.date,
        meal_slot: entry.meal_slot,
        items: items.to_string(),
        notes: entry.notes.trim().to_string(),
    };

    store.append(StreamKind::Meals, &record.to_row())?;
    tracing::info!("Logged meal entry for {}", entry.date);
    Ok(())
}

/// Append a workout entry to the `workouts` stream.
pub fn submit_workout(store: &dyn StreamStore, entry: WorkoutEntry) -> Result<(), SubmitError> {
    let record = WorkoutRecord {
        timestamp: Local::now(),
        date: entry.date,
        workout_type: entry.workout_type,
        duration_min: entry.duration_min,
        notes: entry.notes.trim().to_string(),
    };

    store.append(StreamKind::Workouts, &record.to_row())?;
    tracing::info!("Logged workout entry for {}", entry.date);
    Ok(())
}
