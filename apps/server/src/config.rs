use std::{net::SocketAddr, str::FromStr, time::Duration};

use anyhow::Context;
use shiftbook_sheets::{
    ApiFlavor, RetryPolicy, SheetsConfig, SheetsError, BUILD_TIME_URL, DEFAULT_MAX_ATTEMPTS,
    PLACEHOLDER_URL,
};

/// Shape of the log lines written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(raw: &str) -> anyhow::Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "" | "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => anyhow::bail!("unknown log format '{}'", other),
        }
    }
}

pub struct Config {
    pub listen_addr: SocketAddr,
    /// Runtime endpoint; falls back to the one compiled into the binary.
    pub sheets_url: Option<String>,
    pub api_flavor: ApiFlavor,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
    pub max_attempts: u32,
    pub static_dir: String,
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            sheets_url: None,
            api_flavor: ApiFlavor::default(),
            cors_allow: vec!["*".to_string()],
            request_timeout: Duration::from_millis(30000),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            static_dir: "dist".to_string(),
            log_format: LogFormat::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let defaults = Self::default();

        let listen_addr: SocketAddr = match std::env::var("SHIFTBOOK_LISTEN_ADDR") {
            Ok(raw) => raw.parse().context("Invalid SHIFTBOOK_LISTEN_ADDR")?,
            Err(_) => defaults.listen_addr,
        };
        let sheets_url = std::env::var("SHIFTBOOK_SHEETS_URL")
            .ok()
            .filter(|s| !s.trim().is_empty());
        let api_flavor = match std::env::var("SHIFTBOOK_API_FLAVOR") {
            Ok(raw) => raw.parse().context("Invalid SHIFTBOOK_API_FLAVOR")?,
            Err(_) => defaults.api_flavor,
        };
        let cors_allow = std::env::var("SHIFTBOOK_CORS_ALLOW_ORIGINS")
            .unwrap_or_else(|_| "*".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let timeout_ms: u64 = std::env::var("SHIFTBOOK_REQUEST_TIMEOUT_MS")
            .unwrap_or_else(|_| "30000".into())
            .parse()
            .unwrap_or(30000);
        let max_attempts: u32 = std::env::var("SHIFTBOOK_MAX_ATTEMPTS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_MAX_ATTEMPTS);
        let static_dir = std::env::var("SHIFTBOOK_STATIC_DIR").unwrap_or_else(|_| "dist".into());
        let log_format = match std::env::var("SHIFTBOOK_LOG_FORMAT") {
            Ok(raw) => raw.parse().context("Invalid SHIFTBOOK_LOG_FORMAT")?,
            Err(_) => defaults.log_format,
        };

        Ok(Self {
            listen_addr,
            sheets_url,
            api_flavor,
            cors_allow,
            request_timeout: Duration::from_millis(timeout_ms),
            max_attempts: max_attempts.max(1),
            static_dir,
            log_format,
        })
    }

    /// Client configuration for the sheet, or the reason it is unusable.
    pub fn sheets_config(&self) -> Result<SheetsConfig, SheetsError> {
        let url = self
            .sheets_url
            .as_deref()
            .or(BUILD_TIME_URL)
            .unwrap_or(PLACEHOLDER_URL);
        Ok(SheetsConfig::new(url)?
            .with_flavor(self.api_flavor)
            .with_timeout(self.request_timeout)
            .with_retry(RetryPolicy::default().with_max_attempts(self.max_attempts)))
    }
}
