//! Application configuration: backend selection and remote credentials.
//!
//! Loaded once at startup from `config.toml` in the platform data
//! directory. The remote credential itself lives outside the config file
//! and is read once, on first use, from the file the config points at.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Which storage backend persists the record streams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// One CSV file per stream in the local data directory
    #[default]
    Local,
    /// A remote spreadsheet, one worksheet per stream
    Sheets,
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendKind::Local => write!(f, "local"),
            BackendKind::Sheets => write!(f, "sheets"),
        }
    }
}

/// Remote spreadsheet settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetsSettings {
    /// Identifier of the target spreadsheet
    pub spreadsheet_id: String,
    /// File holding the bearer token for the spreadsheet API
    pub token_file: PathBuf,
    /// API base URL (override for self-hosted gateways and tests)
    #[serde(default = "default_api_base")]
    pub api_base: String,
}

fn default_api_base() -> String {
    "https://sheets.googleapis.com/v4/spreadsheets".to_string()
}

impl SheetsSettings {
    /// Read the bearer token from `token_file`.
    ///
    /// Called once per session, when the remote client is first built.
    pub fn load_token(&self) -> Result<String, ConfigError> {
        let raw = std::fs::read_to_string(&self.token_file)
            .map_err(|e| ConfigError::IoError(format!("{}: {}", self.token_file.display(), e)))?;
        let token = raw.trim();
        if token.is_empty() {
            return Err(ConfigError::MissingCredential(
                self.token_file.display().to_string(),
            ));
        }
        Ok(token.to_string())
    }
}

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Selected storage backend
    pub backend: BackendKind,
    /// Data directory (derived at load time, not persisted)
    #[serde(skip)]
    pub data_dir: PathBuf,
    /// Remote spreadsheet settings; required when `backend = "sheets"`
    pub sheets: Option<SheetsSettings>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::Local,
            data_dir: PathBuf::new(),
            sheets: None,
        }
    }
}

/// Get the application data directory.
pub fn get_data_dir() -> PathBuf {
    directories::ProjectDirs::from("io", "trimcoach", "TrimCoach")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Get the configuration file path.
pub fn get_config_path() -> PathBuf {
    get_data_dir().join("config.toml")
}

/// Load application configuration from file.
///
/// A missing config file is not an error; it yields the default (local
/// backend in the platform data directory).
pub fn load_config() -> Result<AppConfig, ConfigError> {
    let path = get_config_path();

    if !path.exists() {
        let config = AppConfig {
            data_dir: get_data_dir(),
            ..Default::default()
        };
        return Ok(config);
    }

    let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::IoError(e.to_string()))?;

    let mut config: AppConfig =
        toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))?;

    config.data_dir = get_data_dir();

    if config.backend == BackendKind::Sheets && config.sheets.is_none() {
        return Err(ConfigError::MissingSection("sheets".to_string()));
    }

    Ok(config)
}

/// Save application configuration to file.
pub fn save_config(config: &AppConfig) -> Result<(), ConfigError> {
    let path = get_config_path();

    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| ConfigError::IoError(e.to_string()))?;
    }

    let content =
        toml::to_string_pretty(config).map_err(|e| ConfigError::SerializeError(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| ConfigError::IoError(e.to_string()))?;

    Ok(())
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Serialize error: {0}")]
    SerializeError(String),

    #[error("backend = \"sheets\" requires a [{0}] section")]
    MissingSection(String),

    #[error("credential file {0} is empty")]
    MissingCredential(String),
}
