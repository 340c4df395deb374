//! EXANI - exam simulator
//!
//! A terminal exam simulator: multiple-choice questions drawn from a
//! question bank, a timed session state machine, scoring, review and
//! result export.

use std::fmt;

pub mod app;
pub mod config;
pub mod exam;
pub mod models;
pub mod util;

// Common error types
#[derive(Debug)]
pub enum ExaniError {
    /// I/O operation failed
    IoError(std::io::Error),
    /// Configuration is invalid or cannot start an exam
    ConfigError(String),
    /// Operation not valid for the current session state
    InvalidState(String),
    /// Question bank could not be parsed or failed validation
    BankError(String),
    /// Results export failed
    ExportError(String),
    /// TUI rendering or interaction error
    TuiError(String),
}

impl fmt::Display for ExaniError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExaniError::IoError(err) => write!(f, "I/O error: {}", err),
            ExaniError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            ExaniError::InvalidState(msg) => write!(f, "Invalid state: {}", msg),
            ExaniError::BankError(msg) => write!(f, "Question bank error: {}", msg),
            ExaniError::ExportError(msg) => write!(f, "Export error: {}", msg),
            ExaniError::TuiError(msg) => write!(f, "TUI error: {}", msg),
        }
    }
}

impl std::error::Error for ExaniError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExaniError::IoError(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ExaniError {
    fn from(err: std::io::Error) -> Self {
        ExaniError::IoError(err)
    }
}

impl From<serde_json::Error> for ExaniError {
    fn from(err: serde_json::Error) -> Self {
        ExaniError::ExportError(format!("JSON serialization error: {}", err))
    }
}

impl From<toml::de::Error> for ExaniError {
    fn from(err: toml::de::Error) -> Self {
        ExaniError::ConfigError(format!("TOML parsing error: {}", err))
    }
}

impl From<toml::ser::Error> for ExaniError {
    fn from(err: toml::ser::Error) -> Self {
        ExaniError::ConfigError(format!("TOML serialization error: {}", err))
    }
}

/// Result type alias for EXANI operations
pub type Result<T> = std::result::Result<T, ExaniError>;

/// Error handling utilities
pub mod error {
    use super::ExaniError;

    /// Whether the error is a business error the user can fix from the dashboard
    pub fn is_recoverable(error: &ExaniError) -> bool {
        matches!(error, ExaniError::ConfigError(_) | ExaniError::ExportError(_))
    }

    /// Convert error to a short message suitable for the status line
    pub fn user_friendly_message(error: &ExaniError) -> String {
        match error {
            ExaniError::ConfigError(msg) => msg.clone(),
            ExaniError::ExportError(_) => {
                "Failed to export results. Check disk space and permissions.".to_string()
            }
            ExaniError::BankError(msg) => {
                format!("Question bank could not be loaded: {}", msg)
            }
            ExaniError::IoError(err) if err.kind() == std::io::ErrorKind::PermissionDenied => {
                "Permission denied. Check file permissions.".to_string()
            }
            _ => error.to_string(),
        }
    }
}

// Common types and constants
pub const APP_NAME: &str = "exani";
pub const CONFIG_FILE: &str = "exani.toml";
pub const LOG_FILE: &str = "exani.log";
pub const EXPORT_DIR: &str = "exports";
/// Remaining time at or below which the timer is shown as a warning
pub const TIME_WARNING_SECONDS: u64 = 300;
