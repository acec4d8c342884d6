use std::sync::Arc;

use async_trait::async_trait;

use crate::errors::Result;
use crate::invoices::invoices_model::Invoice;

/// Renders an invoice to PDF bytes.
#[async_trait]
pub trait PdfExporter: Send + Sync {
    async fn render(&self, invoice: &Invoice) -> Result<Vec<u8>>;
}

/// Whether PDF export can be offered at all.
#[derive(Clone, Default)]
pub enum PdfExport {
    Available(Arc<dyn PdfExporter>),
    #[default]
    Unavailable,
}

impl PdfExport {
    pub fn is_available(&self) -> bool {
        matches!(self, PdfExport::Available(_))
    }
}

impl std::fmt::Debug for PdfExport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PdfExport::Available(_) => f.write_str("PdfExport::Available"),
            PdfExport::Unavailable => f.write_str("PdfExport::Unavailable"),
        }
    }
}
