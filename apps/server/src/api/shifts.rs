use std::sync::Arc;

use crate::{
    error::ApiResult,
    main_lib::AppState,
    models::{shift_views, DeleteQuery, DeleteResponse, SaveResponse, ShiftView},
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use shiftbook_core::{ShiftInput, StoreState};

async fn list_shifts(State(state): State<Arc<AppState>>) -> Json<Vec<ShiftView>> {
    Json(shift_views(&state.shift_service.get_shifts()))
}

/// Reload from the sheet and return the fresh collection.
async fn refresh_shifts(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<ShiftView>>> {
    state.shift_service.fetch_all().await?;
    Ok(Json(shift_views(&state.shift_service.get_shifts())))
}

async fn save_shift(
    State(state): State<Arc<AppState>>,
    Json(input): Json<ShiftInput>,
) -> ApiResult<Json<SaveResponse>> {
    let outcome = state.shift_service.save(input).await?;
    Ok(Json(SaveResponse { outcome }))
}

/// Deletes only with `?confirm=true`; anything else is a cancelled delete.
async fn delete_shift(
    Path(id): Path<String>,
    Query(query): Query<DeleteQuery>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<DeleteResponse>> {
    let confirmed = query.confirm;
    let outcome = state.shift_service.delete(&id, &confirmed).await?;
    Ok(Json(DeleteResponse { outcome }))
}

async fn get_store_state(State(state): State<Arc<AppState>>) -> Json<StoreState> {
    Json(state.shift_service.get_state())
}

async fn clear_store_error(State(state): State<Arc<AppState>>) -> StatusCode {
    state.shift_service.clear_error();
    StatusCode::NO_CONTENT
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/shifts", get(list_shifts).post(save_shift))
        .route("/shifts/refresh", post(refresh_shifts))
        .route("/shifts/{id}", delete(delete_shift))
        .route("/store", get(get_store_state))
        .route("/store/error", delete(clear_store_error))
}
