//! Endpoint configuration for the spreadsheet script.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Result, SheetsError};
use crate::retry::RetryPolicy;

/// Value shipped in fresh checkouts until a real deployment URL is set.
pub const PLACEHOLDER_URL: &str = "PASTE_YOUR_APPS_SCRIPT_URL_HERE";

/// Endpoint baked in at build time, if any.
pub const BUILD_TIME_URL: Option<&str> = option_env!("SHIFTBOOK_SHEETS_URL");

/// Default timeout for API requests.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Which routing convention the deployed script speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiFlavor {
    /// `?action=getShifts|addShift|updateShift|deleteShift`
    #[default]
    Actions,
    /// Plain `GET` lists and `POST` appends; no update or delete.
    Legacy,
}

impl FromStr for ApiFlavor {
    type Err = SheetsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "actions" | "" => Ok(ApiFlavor::Actions),
            "legacy" => Ok(ApiFlavor::Legacy),
            other => Err(SheetsError::configuration(format!(
                "Unknown API flavor '{}', expected 'actions' or 'legacy'",
                other
            ))),
        }
    }
}

impl fmt::Display for ApiFlavor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiFlavor::Actions => f.write_str("actions"),
            ApiFlavor::Legacy => f.write_str("legacy"),
        }
    }
}

/// Validated client configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetsConfig {
    endpoint: Url,
    pub flavor: ApiFlavor,
    pub timeout: Duration,
    pub retry: RetryPolicy,
}

impl SheetsConfig {
    /// Validates `raw_url` before any request is made.
    pub fn new(raw_url: &str) -> Result<Self> {
        let trimmed = raw_url.trim();
        if trimmed.is_empty() || trimmed == PLACEHOLDER_URL {
            return Err(SheetsError::configuration(
                "The spreadsheet endpoint URL is not configured. Set SHIFTBOOK_SHEETS_URL to your deployed script URL.",
            ));
        }

        let endpoint = Url::parse(trimmed).map_err(|e| {
            SheetsError::configuration(format!("Invalid spreadsheet endpoint URL '{}': {}", trimmed, e))
        })?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(SheetsError::configuration(format!(
                "Spreadsheet endpoint must be http(s), got '{}'",
                endpoint.scheme()
            )));
        }

        Ok(SheetsConfig {
            endpoint,
            flavor: ApiFlavor::default(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            retry: RetryPolicy::default(),
        })
    }

    /// Configuration from the endpoint compiled into the binary.
    pub fn from_build_env() -> Result<Self> {
        Self::new(BUILD_TIME_URL.unwrap_or(PLACEHOLDER_URL))
    }

    pub fn with_flavor(mut self, flavor: ApiFlavor) -> Self {
        self.flavor = flavor;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Endpoint with `action=<action>` appended to the query.
    pub fn action_url(&self, action: &str) -> String {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut().append_pair("action", action);
        url.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCRIPT_URL: &str = "https://script.google.com/macros/s/abc/exec";

    #[test]
    fn test_rejects_placeholder() {
        let err = SheetsConfig::new(PLACEHOLDER_URL).unwrap_err();
        assert!(matches!(err, SheetsError::Configuration(_)));
    }

    #[test]
    fn test_rejects_empty() {
        assert!(SheetsConfig::new("   ").is_err());
    }

    #[test]
    fn test_rejects_garbage_and_other_schemes() {
        assert!(SheetsConfig::new("not a url").is_err());
        assert!(SheetsConfig::new("ftp://script.example/exec").is_err());
    }

    #[test]
    fn test_accepts_script_url() {
        let config = SheetsConfig::new(SCRIPT_URL).unwrap();
        assert_eq!(config.flavor, ApiFlavor::Actions);
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.endpoint().as_str(), SCRIPT_URL);
    }

    #[test]
    fn test_action_url() {
        let config = SheetsConfig::new(SCRIPT_URL).unwrap();
        assert_eq!(
            config.action_url("getShifts"),
            format!("{}?action=getShifts", SCRIPT_URL)
        );
    }

    #[test]
    fn test_flavor_from_str() {
        assert_eq!("Legacy".parse::<ApiFlavor>().unwrap(), ApiFlavor::Legacy);
        assert_eq!("actions".parse::<ApiFlavor>().unwrap(), ApiFlavor::Actions);
        assert!("rest".parse::<ApiFlavor>().is_err());
    }
}
