//! Aggregation pipeline: load the streams and derive the dashboard
//! model (latest values, 7-day rolling mean, trend series, recent
//! tables).

pub mod series;

use crate::records::StreamKind;
use crate::storage::{StorageError, StreamStore, Table};
use chrono::NaiveDate;
use series::{coerce_and_sort, rolling_mean};

/// Trailing window width for the weight rolling mean, in entries.
pub const ROLLING_WINDOW: usize = 7;

/// How many recent meal/workout rows the dashboard shows.
pub const RECENT_ROWS: usize = 10;

/// Aggregation errors.
#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    /// Reading a stream from the backend failed
    #[error("failed to read stream: {0}")]
    Read(#[from] StorageError),
}

/// A dated metric value ("latest weight", "latest waist").
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatestValue {
    /// Date of the row the value came from
    pub date: NaiveDate,
    /// The value itself
    pub value: f64,
}

/// One point of the weight trend chart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendPoint {
    /// Calendar date
    pub date: NaiveDate,
    /// Raw weight; missing when the cell failed coercion
    pub weight_kg: Option<f64>,
    /// 7-entry trailing rolling mean, aligned to this row
    pub rolling_mean: Option<f64>,
}

/// One point of the waist trend chart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaistPoint {
    /// Calendar date
    pub date: NaiveDate,
    /// Raw waist; missing when the cell failed coercion
    pub waist_cm: Option<f64>,
}

/// Derived view of the weight stream.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightSummary {
    /// Last dated row with a weight value
    pub latest_weight: Option<LatestValue>,
    /// Rolling mean aligned to the latest-weight row
    pub latest_rolling: Option<f64>,
    /// Last dated row with a waist value, tracked independently of
    /// weight's presence
    pub latest_waist: Option<LatestValue>,
    /// Full weight series in date order, for charting
    pub weight_series: Vec<TrendPoint>,
    /// Full waist series in date order, for charting
    pub waist_series: Vec<WaistPoint>,
}

/// Everything the dashboard renders. Each section carries its own
/// outcome so one failing stream read does not blank the others.
#[derive(Debug)]
pub struct DashboardModel {
    /// Weight section; `Ok(None)` means the stream has no data yet
    pub weight: Result<Option<WeightSummary>, DashboardError>,
    /// Last 10 meal rows, insertion order
    pub recent_meals: Result<Table, DashboardError>,
    /// Last 10 workout rows, insertion order
    pub recent_workouts: Result<Table, DashboardError>,
}

/// Load all three streams and build the dashboard model.
pub fn summarize(store: &dyn StreamStore) -> DashboardModel {
    DashboardModel {
        weight: weight_summary(store),
        recent_meals: recent(store, StreamKind::Meals),
        recent_workouts: recent(store, StreamKind::Workouts),
    }
}

/// The last `RECENT_ROWS` rows of a stream, insertion order, unmodified.
pub fn recent(store: &dyn StreamStore, kind: StreamKind) -> Result<Table, DashboardError> {
    let table = store.read_all(kind)?;
    Ok(table.tail(RECENT_ROWS))
}

/// Derive the weight section. `Ok(None)` signals "no data" for an empty
/// stream; no derived values are computed in that case.
pub fn weight_summary(store: &dyn StreamStore) -> Result<Option<WeightSummary>, DashboardError> {
    let table = store.read_all(StreamKind::Weight)?;
    if table.is_empty() {
        return Ok(None);
    }

    let rows = coerce_and_sort(&table);

    // Undated rows sorted last; trend lines and latest-value extraction
    // only see the dated prefix. The raw rows remain available through
    // the storage layer.
    let dated: Vec<_> = rows.iter().take_while(|r| r.date.is_some()).collect();

    let weights: Vec<Option<f64>> = dated.iter().map(|r| r.weight_kg).collect();
    let means = rolling_mean(&weights, ROLLING_WINDOW);

    let weight_series: Vec<TrendPoint> = dated
        .iter()
        .zip(&means)
        .map(|(row, mean)| TrendPoint {
            date: row.date.expect("dated prefix"),
            weight_kg: row.weight_kg,
            rolling_mean: *mean,
        })
        .collect();

    let waist_series: Vec<WaistPoint> = dated
        .iter()
        .map(|row| WaistPoint {
            date: row.date.expect("dated prefix"),
            waist_cm: row.waist_cm,
        })
        .collect();

    let latest_idx = weight_series
        .iter()
        .rposition(|p| p.weight_kg.is_some());
    let latest_weight = latest_idx.map(|i| LatestValue {
        date: weight_series[i].date,
        value: weight_series[i].weight_kg.expect("checked above"),
    });
    let latest_rolling = latest_idx.and_then(|i| weight_series[i].rolling_mean);

    let latest_waist = waist_series
        .iter()
        .rev()
        .find_map(|p| p.waist_cm.map(|value| LatestValue { date: p.date, value }));

    Ok(Some(WeightSummary {
        latest_weight,
        latest_rolling,
        latest_waist,
        weight_series,
        waist_series,
    }))
}
