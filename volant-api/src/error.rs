use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use volant_booking::ScheduleError;
use volant_core::StoreError;

#[derive(Debug)]
pub enum AppError {
    Authentication(String),
    Authorization(String),
    Validation(String),
    NotFound(String),
    Conflict(String),
    Unavailable(String),
    Internal(anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Authentication(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::Authorization(msg) => (StatusCode::FORBIDDEN, msg),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            AppError::Unavailable(msg) => {
                tracing::error!("Service unavailable: {}", msg);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "Service temporarily unavailable".to_string(),
                )
            }
            AppError::Internal(err) => {
                tracing::error!("Internal Server Error: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        let msg = err.to_string();
        match err {
            StoreError::Validation(_) | StoreError::EmailTaken | StoreError::PlateTaken => {
                AppError::Validation(msg)
            }
            StoreError::NotFound { .. } => AppError::NotFound(msg),
            StoreError::Conflict(_) => AppError::Conflict(msg),
            StoreError::Unavailable(_) => AppError::Unavailable(msg),
        }
    }
}

impl From<ScheduleError> for AppError {
    fn from(err: ScheduleError) -> Self {
        let msg = err.to_string();
        match err {
            ScheduleError::InvalidInterval | ScheduleError::InvalidTransition { .. } => {
                AppError::Validation(msg)
            }
            ScheduleError::Conflict { .. } => AppError::Conflict(msg),
            ScheduleError::NotFound(_) => AppError::NotFound(msg),
            ScheduleError::LockTimeout { .. } => AppError::Unavailable(msg),
            ScheduleError::Store(inner) => inner.into(),
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err)
    }
}
