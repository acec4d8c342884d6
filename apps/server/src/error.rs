use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use shiftbook_core::errors::Error as CoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Core(#[from] CoreError),
}

#[derive(Serialize)]
struct ErrorBody {
    code: u16,
    message: String,
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Core(e) => match e {
                CoreError::Configuration(_)
                | CoreError::Export(_)
                | CoreError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
                CoreError::Network(_) | CoreError::Api(_) | CoreError::InvalidResponse(_) => {
                    StatusCode::BAD_GATEWAY
                }
                CoreError::Unsupported(_) => StatusCode::NOT_IMPLEMENTED,
                CoreError::Validation(_) => StatusCode::BAD_REQUEST,
                CoreError::NotFound(_) => StatusCode::NOT_FOUND,
                CoreError::ExportUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            ApiError::Core(e) => e.user_message(),
        };
        if status.is_server_error() {
            tracing::error!("{} {}", status, message);
        }
        let body = Json(ErrorBody {
            code: status.as_u16(),
            message,
        });
        (status, body).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
