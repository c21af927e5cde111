//! Type coercion and rolling-window arithmetic over a stream's rows.
//!
//! Coercion never fails a row: a date or number that does not parse
//! becomes missing, is excluded from numeric aggregates, and the row
//! stays visible in the raw tables.

use crate::storage::Table;
use chrono::{NaiveDate, NaiveDateTime};

/// One weight-stream row after type coercion.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightRow {
    /// Parsed calendar date; `None` when unparseable
    pub date: Option<NaiveDate>,
    /// Coerced weight; `None` when non-numeric
    pub weight_kg: Option<f64>,
    /// Coerced waist; `None` when non-numeric
    pub waist_cm: Option<f64>,
}

/// Parse a calendar date cell. Accepts a plain date or a full
/// second-precision timestamp.
pub fn parse_date(cell: &str) -> Option<NaiveDate> {
    let cell = cell.trim();
    NaiveDate::parse_from_str(cell, "%Y-%m-%d").ok().or_else(|| {
        NaiveDateTime::parse_from_str(cell, "%Y-%m-%dT%H:%M:%S")
            .ok()
            .map(|dt| dt.date())
    })
}

/// Coerce a numeric cell. Empty, non-numeric, and non-finite values are
/// missing.
pub fn parse_number(cell: &str) -> Option<f64> {
    let cell = cell.trim();
    if cell.is_empty() {
        return None;
    }
    cell.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Coerce the weight stream and sort it ascending by date.
///
/// The sort is stable; rows whose date failed to parse sort last and
/// are excluded from trend lines by the caller.
pub fn coerce_and_sort(table: &Table) -> Vec<WeightRow> {
    let mut rows: Vec<WeightRow> = (0..table.len())
        .map(|i| {
            let date_cell = table.cell(i, "date");
            let date = parse_date(date_cell);
            if date.is_none() {
                tracing::warn!("Unparseable date {:?} in weight row {}", date_cell, i);
            }
            WeightRow {
                date,
                weight_kg: parse_number(table.cell(i, "weight_kg")),
                waist_cm: parse_number(table.cell(i, "waist_cm")),
            }
        })
        .collect();

    rows.sort_by_key(|r| (r.date.is_none(), r.date));
    rows
}

/// Trailing rolling mean over an ordered series with gaps.
///
/// The window at index `i` covers positions `[max(0, i+1-window), i]`;
/// the mean is taken over the non-missing values in that window, and is
/// itself missing only when the window holds none.
pub fn rolling_mean(values: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    assert!(window > 0, "window must be non-zero");

    values
        .iter()
        .enumerate()
        .map(|(i, _)| {
            let start = (i + 1).saturating_sub(window);
            let in_window: Vec<f64> = values[start..=i].iter().flatten().copied().collect();
            if in_window.is_empty() {
                None
            } else {
                Some(in_window.iter().sum::<f64>() / in_window.len() as f64)
            }
        })
        .collect()
}
