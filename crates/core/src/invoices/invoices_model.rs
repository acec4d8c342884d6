//! Invoice domain models.

use chrono::{Datelike, Duration, NaiveDate};
use rand::Rng;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::shifts::Shift;

/// Days between drafting an invoice and its default due date.
const DEFAULT_PAYMENT_TERMS_DAYS: i64 = 7;

/// What the user filled in on the invoice form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceDraft {
    pub invoice_number: String,
    pub client_name: String,
    pub due_date: NaiveDate,
    #[serde(default)]
    pub shift_ids: Vec<String>,
}

impl InvoiceDraft {
    /// Draft with a random invoice number and a due date a week after `today`.
    pub fn new(today: NaiveDate) -> Self {
        let sequence: u32 = rand::thread_rng().gen_range(0..1000);
        InvoiceDraft {
            invoice_number: format!("INV-{}-{}", today.year(), sequence),
            client_name: "NHS Trust / Agency Name".to_string(),
            due_date: today + Duration::days(DEFAULT_PAYMENT_TERMS_DAYS),
            shift_ids: Vec::new(),
        }
    }

    /// Selects or deselects a shift.
    pub fn toggle_shift(&mut self, shift_id: &str) {
        if let Some(pos) = self.shift_ids.iter().position(|id| id == shift_id) {
            self.shift_ids.remove(pos);
        } else {
            self.shift_ids.push(shift_id.to_string());
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceLine {
    pub shift_id: String,
    pub display_date: String,
    pub description: String,
    pub hours: Decimal,
    pub rate: Decimal,
    pub amount: Decimal,
}

impl From<&Shift> for InvoiceLine {
    fn from(shift: &Shift) -> Self {
        InvoiceLine {
            shift_id: shift.id.clone(),
            display_date: shift.display_date(),
            description: format!("{} - {}", shift.agency, shift.location),
            hours: shift.hours,
            rate: shift.rate,
            amount: shift.day_salary,
        }
    }
}

/// An invoice ready to be rendered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub invoice_number: String,
    pub client_name: String,
    pub due_date: NaiveDate,
    pub lines: Vec<InvoiceLine>,
    pub total: Decimal,
}

impl Invoice {
    /// Name of the exported PDF. Anything outside `[A-Za-z0-9._-]` in the
    /// invoice number becomes `_`, so the name is safe inside a quoted
    /// `Content-Disposition` value.
    pub fn file_name(&self) -> String {
        let stem: String = self
            .invoice_number
            .trim()
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        let stem = stem.trim_matches('.');
        if stem.is_empty() {
            "invoice.pdf".to_string()
        } else {
            format!("{}.pdf", stem)
        }
    }
}

/// Rendered PDF document.
#[derive(Debug, Clone, PartialEq)]
pub struct PdfDocument {
    pub file_name: String,
    pub bytes: Vec<u8>,
}
