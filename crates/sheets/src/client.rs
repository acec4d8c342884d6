//! API client for the spreadsheet script endpoint.
//!
//! Every call goes through [`SheetsClient::request`], which retries transport
//! failures and non-2xx responses with exponential backoff.

use std::sync::Arc;

use log::{debug, warn};
use serde_json::Value;
use shiftbook_core::Shift;

use crate::config::{ApiFlavor, SheetsConfig};
use crate::error::{Result, SheetsError};
use crate::retry::RetryPolicy;
use crate::transport::{ApiRequest, HttpResponse, ReqwestTransport, Transport};
use crate::types::{DeleteShiftRequest, ResponseEnvelope, ShiftPayload};

const LOAD_FAILED: &str = "Failed to load shifts.";
const SAVE_FAILED: &str = "Failed to save shift.";
const DELETE_FAILED: &str = "Failed to delete shift.";

/// Client for the spreadsheet script API.
///
/// Holds only immutable configuration and a shared transport, so clones are
/// cheap and can be used concurrently.
#[derive(Clone)]
pub struct SheetsClient {
    config: SheetsConfig,
    transport: Arc<dyn Transport>,
}

impl SheetsClient {
    /// Create a client using the reqwest transport.
    pub fn new(config: SheetsConfig) -> Result<Self> {
        let transport = ReqwestTransport::new(config.timeout)?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    pub fn with_transport(config: SheetsConfig, transport: Arc<dyn Transport>) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &SheetsConfig {
        &self.config
    }

    fn retry(&self) -> &RetryPolicy {
        &self.config.retry
    }

    /// Sends `request`, retrying up to `max_attempts` attempts in total.
    pub async fn request(&self, request: ApiRequest, max_attempts: u32) -> Result<HttpResponse> {
        let attempts = max_attempts.max(1);
        let mut last_failure = String::new();

        for attempt in 0..attempts {
            match self.transport.send(&request).await {
                Ok(response) if response.is_success() => return Ok(response),
                Ok(response) => {
                    last_failure = SheetsError::Status {
                        status: response.status,
                        body: response.body,
                    }
                    .to_string();
                }
                Err(e) => last_failure = e.to_string(),
            }

            warn!(
                "{} {} attempt {}/{} failed: {}",
                request.method,
                request.url,
                attempt + 1,
                attempts,
                last_failure
            );
            if attempt + 1 < attempts {
                let delay = self.retry().delay_for(attempt);
                debug!("Retrying in {:?}", delay);
                tokio::time::sleep(delay).await;
            }
        }

        Err(SheetsError::RetriesExhausted {
            method: request.method.to_string(),
            endpoint: request.url,
            attempts,
            message: last_failure,
        })
    }

    async fn send(&self, request: ApiRequest) -> Result<HttpResponse> {
        self.request(request, self.retry().max_attempts).await
    }

    /// Decodes an envelope, turning a non-success status into an API error
    /// carrying the server's message or `fallback`.
    fn parse_envelope(body: &str, fallback: &str) -> Result<ResponseEnvelope> {
        let envelope: ResponseEnvelope = serde_json::from_str(body).map_err(|e| {
            log::error!("Failed to decode response envelope. Body: {}, Error: {}", body, e);
            SheetsError::invalid_response(format!("{} ({})", fallback, e))
        })?;
        if envelope.is_success() {
            return Ok(envelope);
        }
        let message = envelope
            .message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| fallback.to_string());
        Err(SheetsError::api(message))
    }

    fn rows_from(data: Option<Value>) -> Result<Vec<Value>> {
        match data {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(Value::Array(rows)) => Ok(rows),
            Some(other) => Err(SheetsError::invalid_response(format!(
                "Expected a list of shifts, got {}",
                other
            ))),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Shift operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Raw rows as stored in the sheet.
    ///
    /// GET {base}?action=getShifts
    pub async fn get_shifts(&self) -> Result<Vec<Value>> {
        let url = match self.config.flavor {
            ApiFlavor::Actions => self.config.action_url("getShifts"),
            ApiFlavor::Legacy => self.config.endpoint().to_string(),
        };
        let response = self.send(ApiRequest::get(url)).await?;

        // Older deployments answer with a bare array.
        if self.config.flavor == ApiFlavor::Legacy {
            if let Ok(Value::Array(rows)) = serde_json::from_str::<Value>(&response.body) {
                return Ok(rows);
            }
        }

        let envelope = Self::parse_envelope(&response.body, LOAD_FAILED)?;
        let rows = Self::rows_from(envelope.data)?;
        debug!("Fetched {} shift rows", rows.len());
        Ok(rows)
    }

    /// POST {base}?action=addShift
    pub async fn add_shift(&self, shift: &Shift) -> Result<()> {
        let url = match self.config.flavor {
            ApiFlavor::Actions => self.config.action_url("addShift"),
            ApiFlavor::Legacy => self.config.endpoint().to_string(),
        };
        self.write(url, &ShiftPayload::from(shift), SAVE_FAILED).await
    }

    /// POST {base}?action=updateShift
    pub async fn update_shift(&self, shift: &Shift) -> Result<()> {
        if self.config.flavor == ApiFlavor::Legacy {
            return Err(SheetsError::Unsupported("updateShift".to_string()));
        }
        let url = self.config.action_url("updateShift");
        self.write(url, &ShiftPayload::from(shift), SAVE_FAILED).await
    }

    /// POST {base}?action=deleteShift
    pub async fn delete_shift(&self, shift_id: &str) -> Result<()> {
        if self.config.flavor == ApiFlavor::Legacy {
            return Err(SheetsError::Unsupported("deleteShift".to_string()));
        }
        let url = self.config.action_url("deleteShift");
        self.write(url, &DeleteShiftRequest { id: shift_id }, DELETE_FAILED)
            .await
    }

    async fn write<T: serde::Serialize + Sync>(
        &self,
        url: String,
        body: &T,
        fallback: &str,
    ) -> Result<()> {
        let body = serde_json::to_string(body)?;
        let response = self.send(ApiRequest::post_text(url, body)).await?;
        Self::parse_envelope(&response.body, fallback)?;
        Ok(())
    }
}
