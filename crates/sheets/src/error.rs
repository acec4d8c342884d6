//! Error types for the sheets client crate.

use thiserror::Error;

/// Result type alias for sheets client operations.
pub type Result<T> = std::result::Result<T, SheetsError>;

/// Errors that can occur talking to the spreadsheet script endpoint.
#[derive(Debug, Error)]
pub enum SheetsError {
    /// Endpoint missing, still the placeholder, or not a usable URL
    #[error("{0}")]
    Configuration(String),

    /// HTTP client error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Transport failure reported by a non-reqwest transport
    #[error("Transport error: {0}")]
    Transport(String),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Non-2xx HTTP response
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// Envelope whose status was not `success`
    #[error("{message}")]
    Api { message: String },

    /// Body that is not a response envelope
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Operation the configured endpoint flavour cannot perform
    #[error("{0} is not supported by the legacy endpoint")]
    Unsupported(String),

    /// Every attempt failed
    #[error("API request {method} {endpoint} failed after {attempts} attempts: {message}")]
    RetriesExhausted {
        method: String,
        endpoint: String,
        attempts: u32,
        message: String,
    },
}

impl SheetsError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    pub fn api(message: impl Into<String>) -> Self {
        Self::Api {
            message: message.into(),
        }
    }

    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::InvalidResponse(message.into())
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }
}

impl From<SheetsError> for shiftbook_core::Error {
    fn from(err: SheetsError) -> Self {
        use shiftbook_core::Error;
        match err {
            SheetsError::Configuration(msg) => Error::Configuration(msg),
            SheetsError::Api { message } => Error::Api(message),
            SheetsError::Unsupported(op) => Error::Unsupported(op),
            SheetsError::Json(e) => Error::InvalidResponse(e.to_string()),
            SheetsError::InvalidResponse(msg) => Error::InvalidResponse(msg),
            other @ (SheetsError::Http(_)
            | SheetsError::Transport(_)
            | SheetsError::Status { .. }
            | SheetsError::RetriesExhausted { .. }) => Error::Network(other.to_string()),
        }
    }
}
