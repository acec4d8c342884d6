//! Shiftbook Core - Domain entities, services, and traits.
//!
//! This crate contains the shift tracking logic: normalizing rows from the
//! backing spreadsheet, deriving dashboard figures, drafting invoices and
//! owning the in-memory shift collection. It is transport-agnostic and
//! defines the repository trait implemented by the `sheets` crate.

pub mod constants;
pub mod errors;
pub mod invoices;
pub mod metrics;
pub mod shifts;
pub mod utils;

pub use shifts::*;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
