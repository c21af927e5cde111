//! TrimCoach - Personal Health Tracker
//!
//! A self-hosted daily-logging application core: weight/condition, meal,
//! and workout records are appended to one of three streams in a
//! pluggable storage backend (local CSV files or a remote spreadsheet),
//! and a dashboard derives rolling averages, latest values, and recent-
//! record tables from the stored rows.

pub mod config;
pub mod dashboard;
pub mod ingest;
pub mod records;
pub mod storage;

// Re-export commonly used types
pub use config::{AppConfig, BackendKind};
pub use dashboard::{summarize, DashboardModel, WeightSummary};
pub use ingest::{submit_meal, submit_weight, submit_workout, SubmitError};
pub use records::StreamKind;
pub use storage::{open_store, StorageError, StreamStore, Table};
