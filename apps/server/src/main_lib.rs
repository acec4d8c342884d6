use std::sync::Arc;

use shiftbook_core::{
    invoices::{InvoiceService, InvoiceServiceTrait, PdfExport},
    ShiftRepositoryTrait, ShiftService, ShiftServiceTrait,
};
use shiftbook_sheets::SheetsShiftRepository;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::{Config, LogFormat};

pub struct AppState {
    pub shift_service: Arc<dyn ShiftServiceTrait>,
    pub invoice_service: Arc<dyn InvoiceServiceTrait>,
}

impl AppState {
    pub fn new(repository: Arc<dyn ShiftRepositoryTrait>, pdf_export: PdfExport) -> Arc<Self> {
        Arc::new(Self {
            shift_service: Arc::new(ShiftService::new(repository)),
            invoice_service: Arc::new(InvoiceService::new(pdf_export)),
        })
    }
}

const DEFAULT_LOG_FILTER: &str = "info";

/// Installs the global subscriber. `RUST_LOG` overrides the default filter;
/// `log` records from the library crates are bridged in.
pub fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry
            .with(fmt::layer().json().flatten_event(true).with_current_span(false))
            .init(),
        LogFormat::Text => registry.with(fmt::layer().with_target(true)).init(),
    }
}

/// Wires the sheet-backed store and loads the collection once.
///
/// An unusable sheets configuration does not stop the server: the store
/// records the configuration error and reports it on every operation.
pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let repository = SheetsShiftRepository::from_config(config.sheets_config());
    if !repository.is_configured() {
        tracing::warn!("Starting without a usable spreadsheet endpoint");
    }

    let state = AppState::new(Arc::new(repository), PdfExport::Unavailable);
    match state.shift_service.fetch_all().await {
        Ok(()) => tracing::info!(
            "Loaded {} shifts",
            state.shift_service.get_state().shift_count
        ),
        Err(e) => tracing::warn!("Initial shift load failed: {}", e),
    }
    Ok(state)
}
