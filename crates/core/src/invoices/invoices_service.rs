use std::collections::HashSet;

use async_trait::async_trait;
use log::{debug, error};
use rust_decimal::Decimal;

use crate::errors::{Error, Result, ValidationError};
use crate::metrics::add_capped;
use crate::shifts::{PaymentStatus, Shift, TaxStatus};

use super::invoices_model::{Invoice, InvoiceDraft, InvoiceLine, PdfDocument};
use super::invoices_traits::PdfExport;

/// Shifts that can go on an invoice: self-employed work not yet paid.
pub fn invoiceable_shifts(shifts: &[Shift]) -> Vec<Shift> {
    shifts
        .iter()
        .filter(|shift| {
            shift.payment_status == PaymentStatus::Unpaid
                && shift.tax_status == TaxStatus::SelfEmployed
        })
        .cloned()
        .collect()
}

#[async_trait]
pub trait InvoiceServiceTrait: Send + Sync {
    fn export_available(&self) -> bool;
    fn build_invoice(&self, draft: &InvoiceDraft, shifts: &[Shift]) -> Result<Invoice>;
    async fn export_pdf(&self, invoice: &Invoice) -> Result<PdfDocument>;
}

pub struct InvoiceService {
    exporter: PdfExport,
}

impl InvoiceService {
    pub fn new(exporter: PdfExport) -> Self {
        InvoiceService { exporter }
    }
}

#[async_trait]
impl InvoiceServiceTrait for InvoiceService {
    fn export_available(&self) -> bool {
        self.exporter.is_available()
    }

    /// Selected invoiceable shifts, in collection order. Selected ids that
    /// are not invoiceable are ignored.
    fn build_invoice(&self, draft: &InvoiceDraft, shifts: &[Shift]) -> Result<Invoice> {
        let selected: HashSet<&str> = draft.shift_ids.iter().map(String::as_str).collect();
        let lines: Vec<InvoiceLine> = invoiceable_shifts(shifts)
            .iter()
            .filter(|shift| selected.contains(shift.id.as_str()))
            .map(InvoiceLine::from)
            .collect();

        if lines.is_empty() {
            return Err(ValidationError::MissingField("shiftIds".to_string()).into());
        }
        if draft.invoice_number.trim().is_empty() {
            return Err(ValidationError::MissingField("invoiceNumber".to_string()).into());
        }

        let total = lines
            .iter()
            .fold(Decimal::ZERO, |acc, line| add_capped(acc, line.amount));
        debug!(
            "Invoice {}: {} lines, total {}",
            draft.invoice_number,
            lines.len(),
            total
        );

        Ok(Invoice {
            invoice_number: draft.invoice_number.trim().to_string(),
            client_name: draft.client_name.clone(),
            due_date: draft.due_date,
            lines,
            total,
        })
    }

    async fn export_pdf(&self, invoice: &Invoice) -> Result<PdfDocument> {
        let PdfExport::Available(exporter) = &self.exporter else {
            return Err(Error::ExportUnavailable);
        };
        let bytes = exporter.render(invoice).await.map_err(|e| {
            error!("Rendering invoice {} failed: {}", invoice.invoice_number, e);
            match e {
                Error::Export(_) => e,
                other => Error::Export(other.to_string()),
            }
        })?;
        Ok(PdfDocument {
            file_name: invoice.file_name(),
            bytes,
        })
    }
}
