use std::sync::Arc;

use crate::{main_lib::AppState, models::TrendResponse};
use axum::{extract::State, routing::get, Json, Router};
use shiftbook_core::metrics::{ChartLayout, DashboardMetrics};

async fn get_dashboard(State(state): State<Arc<AppState>>) -> Json<DashboardMetrics> {
    Json(state.shift_service.get_metrics())
}

/// Monthly received totals with the chart laid out on the default canvas.
async fn get_trend(State(state): State<Arc<AppState>>) -> Json<TrendResponse> {
    let months = state.shift_service.get_monthly_trend();
    let chart = ChartLayout::default().plot(&months);
    Json(TrendResponse { months, chart })
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/dashboard", get(get_dashboard))
        .route("/dashboard/trend", get(get_trend))
}
