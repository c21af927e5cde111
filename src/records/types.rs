//! Typed records and their enumerated labels.
//!
//! Labels are stored as the Korean display strings the original sheet
//! used, so storage backends must round-trip non-ASCII text.

use chrono::{DateTime, Local, NaiveDate};
use serde::{Deserialize, Serialize};

/// Alcohol intake for a weight entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Alcohol {
    /// 없음 — none
    #[default]
    None,
    /// 1~2잔 — one or two drinks
    Light,
    /// 소주 1병 — one bottle of soju
    Bottle,
    /// 소주 1병 이상 — more than one bottle
    Heavy,
}

impl Alcohol {
    /// All variants, in the order the form presents them.
    pub const ALL: [Alcohol; 4] = [Alcohol::None, Alcohol::Light, Alcohol::Bottle, Alcohol::Heavy];

    /// The stored label.
    pub fn label(&self) -> &'static str {
        match self {
            Alcohol::None => "없음",
            Alcohol::Light => "1~2잔",
            Alcohol::Bottle => "소주 1병",
            Alcohol::Heavy => "소주 1병 이상",
        }
    }

    /// Look up a variant by its stored label.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.label() == label)
    }
}

impl std::fmt::Display for Alcohol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Which part of the day a meal belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MealSlot {
    /// 출근 전 — before work
    #[default]
    BeforeWork,
    /// 근무 중 — during work
    AtWork,
    /// 운동 전 — before training
    PreWorkout,
    /// 운동 후 — after training
    PostWorkout,
    /// 기타 — other
    Other,
}

impl MealSlot {
    /// All variants, in the order the form presents them.
    pub const ALL: [MealSlot; 5] = [
        MealSlot::BeforeWork,
        MealSlot::AtWork,
        MealSlot::PreWorkout,
        MealSlot::PostWorkout,
        MealSlot::Other,
    ];

    /// The stored label.
    pub fn label(&self) -> &'static str {
        match self {
            MealSlot::BeforeWork => "출근 전",
            MealSlot::AtWork => "근무 중",
            MealSlot::PreWorkout => "운동 전",
            MealSlot::PostWorkout => "운동 후",
            MealSlot::Other => "기타",
        }
    }

    /// Look up a variant by its stored label.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.label() == label)
    }
}

impl std::fmt::Display for MealSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Workout category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WorkoutType {
    /// 상체 — upper body
    #[default]
    UpperBody,
    /// 하체 — lower body
    LowerBody,
    /// 전신 — full body
    FullBody,
    /// 유산소 — cardio
    Cardio,
    /// 휴식 — rest day
    Rest,
}

impl WorkoutType {
    /// All variants, in the order the form presents them.
    pub const ALL: [WorkoutType; 5] = [
        WorkoutType::UpperBody,
        WorkoutType::LowerBody,
        WorkoutType::FullBody,
        WorkoutType::Cardio,
        WorkoutType::Rest,
    ];

    /// The stored label.
    pub fn label(&self) -> &'static str {
        match self {
            WorkoutType::UpperBody => "상체",
            WorkoutType::LowerBody => "하체",
            WorkoutType::FullBody => "전신",
            WorkoutType::Cardio => "유산소",
            WorkoutType::Rest => "휴식",
        }
    }

    /// Look up a variant by its stored label.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|w| w.label() == label)
    }
}

impl std::fmt::Display for WorkoutType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Format a submission instant at second precision (ISO 8601, local time).
pub(crate) fn format_timestamp(ts: DateTime<Local>) -> String {
    ts.format("%Y-%m-%dT%H:%M:%S").to_string()
}

/// A daily weight / condition entry.
///
/// `timestamp` is the submission instant; `date` is the calendar day the
/// entry is for. They may differ (logging yesterday's numbers today).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeightRecord {
    /// Submission instant (local time)
    pub timestamp: DateTime<Local>,
    /// User-chosen calendar date
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

impl WeightRecord {
    /// Render the record as a positional row in schema column order.
    pub fn to_row(&self) -> Vec<String> {
        vec![
            format_timestamp(self.timestamp),
            self.date.to_string(),
            self.weight_kg.to_string(),
            self.waist_cm.to_string(),
            self.sleep_h.to_string(),
            self.condition.to_string(),
            self.alcohol.label().to_string(),
        ]
    }
}

/// A meal entry. `items` holds the free-text description of what was
/// eaten; it is the only field with a validation requirement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MealRecord {
    /// Submission instant (local time)
    pub timestamp: DateTime<Local>,
    /// User-chosen calendar date
    pub date: NaiveDate,
    /// Which part of the day the meal belongs to
    pub meal_slot: MealSlot,
    /// What was eaten (free text, required)
    pub items: String,
    /// Optional note
    pub notes: String,
}

impl MealRecord {
    /// Render the record as a positional row in schema column order.
    pub fn to_row(&self) -> Vec<String> {
        vec![
            format_timestamp(self.timestamp),
            self.date.to_string(),
            self.meal_slot.label().to_string(),
            self.items.clone(),
            self.notes.clone(),
        ]
    }
}

/// A workout entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutRecord {
    /// Submission instant (local time)
    pub timestamp: DateTime<Local>,
    /// User-chosen calendar date
    pub date: NaiveDate,
    /// Workout category
    pub workout_type: WorkoutType,
    /// Duration in minutes
    pub duration_min: u32,
    /// Optional note
    pub notes: String,
}

impl WorkoutRecord {
    /// Render the record as a positional row in schema column order.
    pub fn to_row(&self) -> Vec<String> {
        vec![
            format_timestamp(self.timestamp),
            self.date.to_string(),
            self.workout_type.label().to_string(),
            self.duration_min.to_string(),
            self.notes.clone(),
        ]
    }
}
