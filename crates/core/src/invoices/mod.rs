//! Invoices module - drafting invoices from unpaid shifts and exporting them.

mod invoices_model;
mod invoices_service;
mod invoices_traits;

pub use invoices_model::{Invoice, InvoiceDraft, InvoiceLine, PdfDocument};
pub use invoices_service::{invoiceable_shifts, InvoiceService, InvoiceServiceTrait};
pub use invoices_traits::{PdfExport, PdfExporter};
