//! Record schema registry: the three append-only streams and their
//! fixed column layouts.

mod types;

pub use types::{Alcohol, MealRecord, MealSlot, WeightRecord, WorkoutRecord, WorkoutType};

/// The three logical record streams.
///
/// Stream names and column orders are identical across every storage
/// backend; a stream's header must always match [`StreamKind::columns`]
/// exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreamKind {
    /// Daily weight / waist / sleep / condition / alcohol entries
    Weight,
    /// Meal entries (free-text items per meal slot)
    Meals,
    /// Workout entries (type + duration)
    Workouts,
}

impl StreamKind {
    /// All streams, in initialization order.
    pub const ALL: [StreamKind; 3] = [StreamKind::Weight, StreamKind::Meals, StreamKind::Workouts];

    /// The stream identifier used by both backends (worksheet title,
    /// local file stem).
    pub fn name(&self) -> &'static str {
        match self {
            StreamKind::Weight => "weight",
            StreamKind::Meals => "meals",
            StreamKind::Workouts => "workouts",
        }
    }

    /// The exact header for this stream, in schema order.
    pub fn columns(&self) -> &'static [&'static str] {
        match self {
            StreamKind::Weight => &[
                "timestamp",
                "date",
                "weight_kg",
                "waist_cm",
                "sleep_h",
                "condition",
                "alcohol",
            ],
            StreamKind::Meals => &["timestamp", "date", "meal_slot", "items", "notes"],
            StreamKind::Workouts => &["timestamp", "date", "workout_type", "duration_min", "notes"],
        }
    }
}

impl std::fmt::Display for StreamKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
