//! Error types for schemata
//!
//! Centralized error handling using thiserror.

use thiserror::Error;

/// Main error type for schemata services
#[derive(Error, Debug)]
pub enum SchemataError {
    #[error("{}", friendly_network_error(.0))]
    Network(#[from] reqwest::Error),

    #[error("Request failed: HTTP {status} from {url}")]
    Status { status: u16, url: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Clipboard error: {0}")]
    Clipboard(String),

    #[error("Could not open browser: {0}")]
    Browser(String),
}

impl SchemataError {
    /// Short heading used when the error is shown as a notice
    pub fn title(&self) -> &'static str {
        match self {
            SchemataError::Network(_) | SchemataError::Status { .. } => "Network error",
            SchemataError::Io(_) | SchemataError::Storage(_) => "Storage error",
            SchemataError::Parse(_) => "Invalid catalog",
            SchemataError::Config(_) => "Configuration error",
            SchemataError::NotFound(_) => "Not found",
            SchemataError::Clipboard(_) => "Clipboard unavailable",
            SchemataError::Browser(_) => "Browser unavailable",
        }
    }
}

/// Result type alias for schemata
pub type Result<T> = std::result::Result<T, SchemataError>;

fn friendly_network_error(e: &reqwest::Error) -> String {
    if e.is_builder() {
        if let Some(url) = e.url() {
            return format!("Invalid URL: {url}");
        }
        return "Invalid URL".to_string();
    }
    if e.is_connect() {
        if let Some(url) = e.url() {
            return format!("Could not connect to {}", url.host_str().unwrap_or("server"));
        }
        return "Could not connect to server".to_string();
    }
    if e.is_timeout() {
        return "Connection timed out".to_string();
    }
    if e.is_decode() {
        return "Invalid response from server".to_string();
    }
    format!("Network error: {e}")
}
