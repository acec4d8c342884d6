//! Core error types for Shiftbook.
//!
//! This module defines transport-agnostic error types. Client-specific errors
//! (HTTP, envelope decoding, etc.) are converted to these types by the
//! repository implementation.

use thiserror::Error;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the shift store.
///
/// Only configuration, network and application-level failures ever reach the
/// user. Malformed record fields are recovered by the normalizer and never
/// become an `Error`.
#[derive(Error, Debug)]
pub enum Error {
    /// The backing store endpoint was never configured (placeholder or invalid URL).
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Transport failure or non-2xx response after retries were exhausted.
    #[error("Network error: {0}")]
    Network(String),

    /// Well-formed response whose envelope status was not `success`.
    #[error("{0}")]
    Api(String),

    /// The store answered with something that is not a response envelope.
    #[error("Invalid response from backing store: {0}")]
    InvalidResponse(String),

    /// The configured endpoint flavour does not support the operation.
    #[error("Operation not supported: {0}")]
    Unsupported(String),

    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Shift not found: {0}")]
    NotFound(String),

    /// No PDF exporter was injected.
    #[error("PDF export is not available")]
    ExportUnavailable,

    #[error("PDF export failed: {0}")]
    Export(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl Error {
    /// Single display string for the dashboard's error banner.
    pub fn user_message(&self) -> String {
        match self {
            Error::Configuration(msg) => format!("API Error: {}", msg),
            Error::Api(msg) => msg.clone(),
            other => other.to_string(),
        }
    }

    /// True for failures caused by setup rather than by the remote store.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Error::Configuration(_))
    }
}

/// Validation errors for user input.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Required field '{0}' is missing")]
    MissingField(String),
}
