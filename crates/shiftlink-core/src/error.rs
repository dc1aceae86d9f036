//! Error types module
//!
//! All failures of the upload flow are unified under `UploadError`. Negotiation
//! failures carry the server's message verbatim; transfer failures collapse to a
//! generic retry prompt. Nothing is retried automatically. Each variant
//! self-describes through `ErrorMetadata`.

use std::io;

use crate::constants::TRANSFER_FAILED_MESSAGE;
use crate::models::SessionState;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like rejected user input
    Debug,
    /// Warning level - for failures the user can recover from
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata describing how an error should be presented to the user.
pub trait ErrorMetadata {
    /// Machine-readable error code (e.g., "NEGOTIATION_FAILED")
    fn error_code(&self) -> &'static str;

    /// Whether the user can re-attempt the same action from the current screen
    fn is_user_retryable(&self) -> bool;

    /// Message shown to the user
    fn client_message(&self) -> String;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    /// The server declined to issue an upload URL.
    #[error("{0}")]
    Negotiation(String),

    #[error("Event channel error: {0}")]
    Channel(String),

    #[error("Transfer failed{}: {detail}", format_status(.status))]
    Transfer { status: Option<u16>, detail: String },

    #[error("Failed to read file: {0}")]
    FileRead(String),

    #[error("Incomplete transfer: {transferred} of {expected} bytes acknowledged")]
    IncompleteTransfer { expected: u64, transferred: u64 },

    #[error("Invalid session transition from {from:?} to {to:?}")]
    InvalidTransition { from: SessionState, to: SessionState },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type UploadResult<T> = Result<T, UploadError>;

fn format_status(status: &Option<u16>) -> String {
    status
        .map(|s| format!(" with status {}", s))
        .unwrap_or_default()
}

impl From<io::Error> for UploadError {
    fn from(err: io::Error) -> Self {
        UploadError::FileRead(err.to_string())
    }
}

impl From<serde_json::Error> for UploadError {
    fn from(err: serde_json::Error) -> Self {
        UploadError::Channel(format!("Malformed reply: {}", err))
    }
}

/// Static metadata per variant: (error_code, user_retryable, log_level).
fn upload_error_static_metadata(err: &UploadError) -> (&'static str, bool, LogLevel) {
    match err {
        UploadError::Negotiation(_) => ("NEGOTIATION_FAILED", true, LogLevel::Warn),
        UploadError::Channel(_) => ("CHANNEL_ERROR", true, LogLevel::Error),
        UploadError::Transfer { .. } => ("TRANSFER_FAILED", true, LogLevel::Warn),
        UploadError::FileRead(_) => ("FILE_READ_ERROR", true, LogLevel::Warn),
        UploadError::IncompleteTransfer { .. } => ("INCOMPLETE_TRANSFER", true, LogLevel::Error),
        UploadError::InvalidTransition { .. } => ("INVALID_TRANSITION", false, LogLevel::Error),
        UploadError::InvalidInput(_) => ("INVALID_INPUT", false, LogLevel::Debug),
        UploadError::Config(_) => ("CONFIG_ERROR", false, LogLevel::Error),
    }
}

impl UploadError {
    /// Get the error type name
    pub fn error_type(&self) -> &str {
        match self {
            UploadError::Negotiation(_) => "Negotiation",
            UploadError::Channel(_) => "Channel",
            UploadError::Transfer { .. } => "Transfer",
            UploadError::FileRead(_) => "FileRead",
            UploadError::IncompleteTransfer { .. } => "IncompleteTransfer",
            UploadError::InvalidTransition { .. } => "InvalidTransition",
            UploadError::InvalidInput(_) => "InvalidInput",
            UploadError::Config(_) => "Config",
        }
    }
}

impl ErrorMetadata for UploadError {
    fn error_code(&self) -> &'static str {
        upload_error_static_metadata(self).0
    }

    fn is_user_retryable(&self) -> bool {
        upload_error_static_metadata(self).1
    }

    fn log_level(&self) -> LogLevel {
        upload_error_static_metadata(self).2
    }

    fn client_message(&self) -> String {
        match self {
            UploadError::Negotiation(ref msg) => msg.clone(),
            UploadError::Transfer { .. }
            | UploadError::FileRead(_)
            | UploadError::IncompleteTransfer { .. }
            | UploadError::Channel(_) => TRANSFER_FAILED_MESSAGE.to_string(),
            UploadError::InvalidInput(ref msg) => msg.clone(),
            UploadError::InvalidTransition { .. } | UploadError::Config(_) => {
                "Upload unavailable".to_string()
            }
        }
    }
}
