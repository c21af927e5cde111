//! Local flat-file backend: one UTF-8 CSV per stream.
//!
//! Append is read-entire-file, append-in-memory, rewrite-entire-file
//! through a temp file and an atomic rename, so a failed append never
//! leaves a partial row behind.

use super::{StorageError, StreamStore, Table};
use crate::records::StreamKind;
use std::path::{Path, PathBuf};

/// UTF-8 byte order mark. Spreadsheet tools prepend it when re-saving
/// exported files, so reads must tolerate it.
const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Local CSV store rooted at a data directory.
#[derive(Debug, Clone)]
pub struct CsvStore {
    dir: PathBuf,
}

impl CsvStore {
    /// Create a store rooted at `dir`. Files are created lazily, on
    /// first init/append.
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn path_for(&self, kind: StreamKind) -> PathBuf {
        self.dir.join(format!("{}.csv", kind.name()))
    }

    /// Parse one stream file. A missing file reads as an uninitialized
    /// stream: schema header, zero rows.
    fn load(&self, kind: StreamKind) -> Result<Table, StorageError> {
        let path = self.path_for(kind);
        if !path.exists() {
            return Ok(Table::with_columns(kind.columns()));
        }

        let bytes =
            std::fs::read(&path).map_err(|e| StorageError::Io(format!("{}: {}", path.display(), e)))?;
        let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(&bytes);

        let text = std::str::from_utf8(bytes)
            .map_err(|e| StorageError::Encoding(format!("{}: {}", path.display(), e)))?;
        if text.trim().is_empty() {
            return Ok(Table::with_columns(kind.columns()));
        }

        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(text.as_bytes());

        let columns: Vec<String> = reader
            .headers()
            .map_err(|e| StorageError::Csv(e.to_string()))?
            .iter()
            .map(|c| c.to_string())
            .collect();
        if columns != kind.columns() {
            return Err(StorageError::HeaderMismatch {
                stream: kind.name(),
                found: columns,
            });
        }

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|e| StorageError::Csv(e.to_string()))?;
            rows.push(record.iter().map(|c| c.to_string()).collect());
        }

        Ok(Table { columns, rows })
    }

    /// Rewrite one stream file atomically (temp file + rename).
    fn store(&self, kind: StreamKind, table: &Table) -> Result<(), StorageError> {
        std::fs::create_dir_all(&self.dir)
            .map_err(|e| StorageError::Io(format!("{}: {}", self.dir.display(), e)))?;

        let mut writer = csv::Writer::from_writer(Vec::new());
        writer
            .write_record(&table.columns)
            .map_err(|e| StorageError::Csv(e.to_string()))?;
        for row in &table.rows {
            writer
                .write_record(row)
                .map_err(|e| StorageError::Csv(e.to_string()))?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| StorageError::Csv(e.to_string()))?;

        let path = self.path_for(kind);
        let tmp = path.with_extension("csv.tmp");
        std::fs::write(&tmp, &bytes)
            .map_err(|e| StorageError::Io(format!("{}: {}", tmp.display(), e)))?;
        std::fs::rename(&tmp, &path)
            .map_err(|e| StorageError::Io(format!("{}: {}", path.display(), e)))?;

        Ok(())
    }

    /// Root data directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl StreamStore for CsvStore {
    fn init_stream(&self, kind: StreamKind) -> Result<(), StorageError> {
        let path = self.path_for(kind);
        if path.exists() {
            tracing::debug!("Stream '{}' already initialized at {}", kind, path.display());
            return Ok(());
        }

        self.store(kind, &Table::with_columns(kind.columns()))?;
        tracing::info!("Created stream '{}' at {}", kind, path.display());
        Ok(())
    }

    fn append(&self, kind: StreamKind, row: &[String]) -> Result<(), StorageError> {
        let mut table = self.load(kind)?;
        table.rows.push(row.to_vec());
        self.store(kind, &table)?;

        tracing::debug!("Appended 1 row to '{}' ({} total)", kind, table.len());
        Ok(())
    }

    fn read_all(&self, kind: StreamKind) -> Result<Table, StorageError> {
        self.load(kind)
    }

    fn stream_path(&self, kind: StreamKind) -> Option<PathBuf> {
        Some(self.path_for(kind))
    }
}
