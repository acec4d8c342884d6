//! `ShiftRepositoryTrait` over the spreadsheet script.

use async_trait::async_trait;
use log::error;
use serde_json::Value;
use shiftbook_core::{Error, Result, Shift, ShiftRepositoryTrait};

use crate::client::SheetsClient;
use crate::config::SheetsConfig;
use crate::error::SheetsError;

/// Shift repository backed by the sheet.
///
/// A repository built from an invalid configuration still exists; every
/// operation reports the configuration error without touching the network.
#[derive(Clone)]
pub struct SheetsShiftRepository {
    client: std::result::Result<SheetsClient, String>,
}

impl SheetsShiftRepository {
    pub fn new(client: SheetsClient) -> Self {
        Self { client: Ok(client) }
    }

    pub fn unconfigured(message: impl Into<String>) -> Self {
        Self {
            client: Err(message.into()),
        }
    }

    /// Builds the reqwest-backed client, or an unconfigured repository when
    /// the configuration or the HTTP client cannot be set up.
    pub fn from_config(config: std::result::Result<SheetsConfig, SheetsError>) -> Self {
        match config.and_then(SheetsClient::new) {
            Ok(client) => Self::new(client),
            Err(e) => {
                error!("Shift store is not configured: {}", e);
                Self::unconfigured(e.to_string())
            }
        }
    }

    pub fn is_configured(&self) -> bool {
        self.client.is_ok()
    }

    fn client(&self) -> Result<&SheetsClient> {
        self.client
            .as_ref()
            .map_err(|message| Error::Configuration(message.clone()))
    }
}

#[async_trait]
impl ShiftRepositoryTrait for SheetsShiftRepository {
    async fn load_shifts(&self) -> Result<Vec<Value>> {
        Ok(self.client()?.get_shifts().await?)
    }

    async fn add_shift(&self, shift: &Shift) -> Result<()> {
        Ok(self.client()?.add_shift(shift).await?)
    }

    async fn update_shift(&self, shift: &Shift) -> Result<()> {
        Ok(self.client()?.update_shift(shift).await?)
    }

    async fn delete_shift(&self, shift_id: &str) -> Result<()> {
        Ok(self.client()?.delete_shift(shift_id).await?)
    }
}
