//! Storage backends for the record streams.
//!
//! Both backends satisfy the same contract: `append` is atomic from the
//! caller's perspective (the row is durably visible to a subsequent
//! `read_all`, or the call fails and nothing was written), `read_all`
//! returns the full stream in insertion order, and `init_stream` is
//! idempotent (a second call never duplicates the header).

pub mod csv_store;
pub mod sheets;

use crate::config::{AppConfig, BackendKind};
use crate::records::StreamKind;
use std::path::PathBuf;

pub use csv_store::CsvStore;
pub use sheets::SheetsStore;

/// Full contents of one stream: header-derived column names plus data
/// rows in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    /// Column names from the header row
    pub columns: Vec<String>,
    /// Data rows, insertion order, positional per `columns`
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Create a table with the given header and no data rows.
    pub fn with_columns(columns: &[&str]) -> Self {
        Self {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    /// True when the stream has no data rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Index of a named column, if present.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Cell value by row index and column name. Missing cells (short
    /// rows, unknown columns) read as the empty string.
    pub fn cell(&self, row: usize, column: &str) -> &str {
        let Some(col) = self.column_index(column) else {
            return "";
        };
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// The last `n` data rows, insertion order preserved.
    pub fn tail(&self, n: usize) -> Table {
        let start = self.rows.len().saturating_sub(n);
        Table {
            columns: self.columns.clone(),
            rows: self.rows[start..].to_vec(),
        }
    }
}

/// A persistent backend for the three record streams.
///
/// Selected once at startup via [`open_store`]; the pipelines only ever
/// see this trait.
pub trait StreamStore {
    /// Create the stream with exactly the schema header if it does not
    /// already exist. Idempotent.
    fn init_stream(&self, kind: StreamKind) -> Result<(), StorageError>;

    /// Append one row, positional per the stream's schema. Atomic: on
    /// error, no partial row is visible.
    fn append(&self, kind: StreamKind, row: &[String]) -> Result<(), StorageError>;

    /// Read the full stream in insertion order. A stream with zero data
    /// rows yields an empty `Table`, not an error.
    fn read_all(&self, kind: StreamKind) -> Result<Table, StorageError>;

    /// Release session resources (remote client). Default no-op.
    fn close(&mut self) -> Result<(), StorageError> {
        Ok(())
    }

    /// Backing file for a stream, when the backend is file-based.
    /// `None` means export is delegated to the remote service.
    fn stream_path(&self, _kind: StreamKind) -> Option<PathBuf> {
        None
    }
}

/// Initialize all three streams on a backend.
pub fn init_streams(store: &dyn StreamStore) -> Result<(), StorageError> {
    for kind in StreamKind::ALL {
        store.init_stream(kind)?;
    }
    Ok(())
}

/// Build the configured backend.
///
/// This is the only place backend selection happens; the ingestion and
/// aggregation pipelines are parameterized solely by the returned trait
/// object.
pub fn open_store(config: &AppConfig) -> Result<Box<dyn StreamStore>, StorageError> {
    match config.backend {
        BackendKind::Local => {
            tracing::info!("Using local CSV store in {}", config.data_dir.display());
            Ok(Box::new(CsvStore::new(config.data_dir.clone())))
        }
        BackendKind::Sheets => {
            let settings = config
                .sheets
                .clone()
                .ok_or_else(|| StorageError::Config("sheets settings missing".to_string()))?;
            tracing::info!("Using remote sheet store ({})", settings.spreadsheet_id);
            Ok(Box::new(SheetsStore::new(settings)))
        }
    }
}

/// Storage backend errors.
///
/// The underlying backend message is preserved so the presentation layer
/// can display it verbatim.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("authentication failed: {0}")]
    Auth(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("API quota exceeded: {0}")]
    Quota(String),

    #[error("backend API error: {0}")]
    Api(String),

    #[error("IO error: {0}")]
    Io(String),

    #[error("encoding error: {0}")]
    Encoding(String),

    #[error("malformed CSV: {0}")]
    Csv(String),

    #[error("stream '{stream}' header does not match schema: found {found:?}")]
    HeaderMismatch {
        stream: &'static str,
        found: Vec<String>,
    },

    #[error("configuration error: {0}")]
    Config(String),
}
