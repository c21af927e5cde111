//! Remote spreadsheet backend.
//!
//! Talks to a Google-Sheets-style values API over HTTP, one worksheet
//! per stream. The authenticated client is expensive to build (it reads
//! the credential file), so it is created lazily on first use, reused
//! for the rest of the session, and released by `close`.

use super::{StorageError, StreamStore, Table};
use crate::config::SheetsSettings;
use crate::records::StreamKind;
use serde::Deserialize;
use serde_json::json;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// HTTP timeout for spreadsheet API calls.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// The API's marker for a range referencing a worksheet that does not
/// exist yet.
const MISSING_SHEET_MARKER: &str = "Unable to parse range";

/// Authenticated session state, built once per process.
struct Session {
    http: reqwest::blocking::Client,
    token: String,
}

/// Remote sheet store for a single configured spreadsheet.
pub struct SheetsStore {
    settings: SheetsSettings,
    session: Mutex<Option<Arc<Session>>>,
}

impl SheetsStore {
    /// Create a store for the configured spreadsheet. No network or
    /// credential access happens until the first call.
    pub fn new(settings: SheetsSettings) -> Self {
        Self {
            settings,
            session: Mutex::new(None),
        }
    }

    /// Get the cached session, building it on first use.
    fn session(&self) -> Result<Arc<Session>, StorageError> {
        let mut guard = self.session.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(session) = guard.as_ref() {
            return Ok(Arc::clone(session));
        }

        // Credential is read exactly once per session
        let token = self
            .settings
            .load_token()
            .map_err(|e| StorageError::Auth(e.to_string()))?;
        let http = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| StorageError::Network(e.to_string()))?;

        tracing::info!(
            "Sheets client initialized for spreadsheet {}",
            self.settings.spreadsheet_id
        );

        let session = Arc::new(Session { http, token });
        *guard = Some(Arc::clone(&session));
        Ok(session)
    }

    fn values_url(&self, kind: StreamKind) -> String {
        format!(
            "{}/{}/values/{}",
            self.settings.api_base, self.settings.spreadsheet_id, kind
        )
    }

    /// Fetch the raw value grid for a stream. A missing worksheet or an
    /// entirely empty one reads as `None`.
    fn fetch_values(&self, kind: StreamKind) -> Result<Option<Vec<Vec<String>>>, StorageError> {
        let session = self.session()?;
        let response = session
            .http
            .get(self.values_url(kind))
            .bearer_auth(&session.token)
            .send()
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            if status == reqwest::StatusCode::BAD_REQUEST
                && body.contains(MISSING_SHEET_MARKER)
            {
                return Ok(None);
            }
            return Err(map_api_error(status, &body));
        }

        let parsed: ValuesResponse = response
            .json()
            .map_err(|e| StorageError::Api(format!("malformed values response: {}", e)))?;
        if parsed.values.is_empty() {
            return Ok(None);
        }
        Ok(Some(
            parsed
                .values
                .into_iter()
                .map(|row| row.into_iter().map(cell_to_string).collect())
                .collect(),
        ))
    }

    /// Append raw rows to a stream via the values append endpoint.
    fn push_rows(&self, kind: StreamKind, rows: &[Vec<String>]) -> Result<(), StorageError> {
        let session = self.session()?;
        let url = format!("{}:append", self.values_url(kind));
        let response = session
            .http
            .post(url)
            .query(&[("valueInputOption", "USER_ENTERED")])
            .bearer_auth(&session.token)
            .json(&json!({ "values": rows }))
            .send()
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(map_api_error(status, &body));
        }
        Ok(())
    }

    /// Create the worksheet for a stream.
    fn add_worksheet(&self, kind: StreamKind) -> Result<(), StorageError> {
        let session = self.session()?;
        let url = format!(
            "{}/{}:batchUpdate",
            self.settings.api_base, self.settings.spreadsheet_id
        );
        let body = json!({
            "requests": [
                { "addSheet": { "properties": { "title": kind.name() } } }
            ]
        });
        let response = session
            .http
            .post(url)
            .bearer_auth(&session.token)
            .json(&body)
            .send()
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(map_api_error(status, &body));
        }
        Ok(())
    }
}

impl StreamStore for SheetsStore {
    fn init_stream(&self, kind: StreamKind) -> Result<(), StorageError> {
        match self.fetch_values(kind)? {
            Some(_) => {
                // Header already present; never rewrite it
                tracing::debug!("Stream '{}' already initialized", kind);
                Ok(())
            }
            None => {
                // Worksheet may be missing entirely; creating it twice
                // would error, so only add it when the read said so
                self.add_worksheet(kind).or_else(|e| match &e {
                    // Worksheet exists but is empty: just write the header
                    StorageError::Api(msg) if msg.contains("already exists") => Ok(()),
                    _ => Err(e),
                })?;
                let header: Vec<String> =
                    kind.columns().iter().map(|c| c.to_string()).collect();
                self.push_rows(kind, &[header])?;
                tracing::info!("Created stream '{}' worksheet", kind);
                Ok(())
            }
        }
    }

    fn append(&self, kind: StreamKind, row: &[String]) -> Result<(), StorageError> {
        self.push_rows(kind, &[row.to_vec()])?;
        tracing::debug!("Appended 1 row to remote stream '{}'", kind);
        Ok(())
    }

    fn read_all(&self, kind: StreamKind) -> Result<Table, StorageError> {
        let Some(values) = self.fetch_values(kind)? else {
            return Ok(Table::with_columns(kind.columns()));
        };

        let mut values = values.into_iter();
        let columns: Vec<String> = values.next().unwrap_or_default();
        if columns != kind.columns() {
            return Err(StorageError::HeaderMismatch {
                stream: kind.name(),
                found: columns,
            });
        }

        Ok(Table {
            columns,
            rows: values.collect(),
        })
    }

    fn close(&mut self) -> Result<(), StorageError> {
        let mut guard = self.session.lock().unwrap_or_else(|e| e.into_inner());
        if guard.take().is_some() {
            tracing::debug!("Sheets client released");
        }
        Ok(())
    }
}

/// Shape of the values read endpoint's response. Cells arrive as JSON
/// scalars; formatted reads are strings, but numbers are tolerated.
#[derive(Debug, Deserialize)]
struct ValuesResponse {
    #[serde(default)]
    values: Vec<Vec<serde_json::Value>>,
}

fn cell_to_string(value: serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s,
        other => other.to_string(),
    }
}

/// Map connection-level failures onto the error taxonomy.
fn map_transport_error(err: reqwest::Error) -> StorageError {
    StorageError::Network(err.to_string())
}

/// Map a non-2xx API response onto the error taxonomy, preserving the
/// server's message for display.
fn map_api_error(status: reqwest::StatusCode, body: &str) -> StorageError {
    let message = extract_api_message(body).unwrap_or_else(|| {
        if body.is_empty() {
            status.to_string()
        } else {
            body.to_string()
        }
    });

    match status.as_u16() {
        401 | 403 => StorageError::Auth(message),
        429 => StorageError::Quota(message),
        _ => StorageError::Api(message),
    }
}

/// Pull `error.message` out of an API error body, if it is JSON.
fn extract_api_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("error")?
        .get("message")?
        .as_str()
        .map(|s| s.to_string())
}
