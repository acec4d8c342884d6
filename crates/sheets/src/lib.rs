//! Shiftbook Sheets - client for the spreadsheet script that stores shifts.
//!
//! This crate provides the retrying HTTP client, its configuration and wire
//! types, and the [`SheetsShiftRepository`] used by the core shift store.
//!
//! # Usage
//!
//! ```rust,ignore
//! use shiftbook_sheets::{SheetsClient, SheetsConfig, SheetsShiftRepository};
//!
//! let config = SheetsConfig::new("https://script.google.com/macros/s/.../exec")?;
//! let repository = SheetsShiftRepository::new(SheetsClient::new(config)?);
//! let rows = repository.load_shifts().await?;
//! ```

mod client;
mod config;
mod error;
mod repository;
mod retry;
mod transport;
mod types;

pub use client::SheetsClient;
pub use config::{ApiFlavor, SheetsConfig, BUILD_TIME_URL, PLACEHOLDER_URL};
pub use error::{Result, SheetsError};
pub use repository::SheetsShiftRepository;
pub use retry::{RetryPolicy, DEFAULT_MAX_ATTEMPTS};
pub use transport::{ApiRequest, HttpMethod, HttpResponse, ReqwestTransport, Transport, TEXT_PLAIN_UTF8};
pub use types::{ResponseEnvelope, ShiftPayload};
