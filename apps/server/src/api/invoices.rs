use std::sync::Arc;

use crate::{
    error::ApiResult,
    main_lib::AppState,
    models::{shift_views, ShiftView},
};
use axum::{
    extract::State,
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use shiftbook_core::{
    invoices::{invoiceable_shifts, Invoice, InvoiceDraft},
    utils::time_utils::shift_date_today,
};

async fn list_invoiceable_shifts(State(state): State<Arc<AppState>>) -> Json<Vec<ShiftView>> {
    let shifts = invoiceable_shifts(&state.shift_service.get_shifts());
    Json(shift_views(&shifts))
}

/// Fresh form defaults.
async fn new_draft() -> Json<InvoiceDraft> {
    Json(InvoiceDraft::new(shift_date_today()))
}

async fn preview_invoice(
    State(state): State<Arc<AppState>>,
    Json(draft): Json<InvoiceDraft>,
) -> ApiResult<Json<Invoice>> {
    let invoice = state
        .invoice_service
        .build_invoice(&draft, &state.shift_service.get_shifts())?;
    Ok(Json(invoice))
}

async fn export_invoice(
    State(state): State<Arc<AppState>>,
    Json(draft): Json<InvoiceDraft>,
) -> ApiResult<Response> {
    let invoice = state
        .invoice_service
        .build_invoice(&draft, &state.shift_service.get_shifts())?;
    let pdf = state.invoice_service.export_pdf(&invoice).await?;
    let headers = [
        (CONTENT_TYPE, "application/pdf".to_string()),
        (
            CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", pdf.file_name),
        ),
    ];
    Ok((headers, pdf.bytes).into_response())
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/invoices/shifts", get(list_invoiceable_shifts))
        .route("/invoices/draft", get(new_draft))
        .route("/invoices/preview", post(preview_invoice))
        .route("/invoices/export", post(export_invoice))
}
