//! Application error types.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

use crate::models::Envelope;

/// Convenience alias for handler return types.
pub type AppResult<T> = Result<T, AppError>;

/// Application-level errors with HTTP status mapping.
///
/// Callers only ever see the envelope with a generic message; the underlying
/// detail is logged server-side and never serialized into the body.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Upstream failure: {0}")]
    Upstream(String),

    #[error("Internal server error")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Validation(m) => (StatusCode::BAD_REQUEST, m.as_str()),
            AppError::NotFound(m) => (StatusCode::NOT_FOUND, m.as_str()),
            AppError::Upstream(m) => {
                error!("upstream failure: {m}");
                (StatusCode::BAD_GATEWAY, "Recommendation service unavailable.")
            }
            AppError::Internal(m) => {
                error!("internal error: {m}");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error.")
            }
        };
        let body = Json(Envelope::error(status.as_u16(), message));
        (status, body).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::RowNotFound => AppError::NotFound("row not found".into()),
            _ => AppError::Internal(e.to_string()),
        }
    }
}

impl From<platter_core::restaurants::RestaurantError> for AppError {
    fn from(e: platter_core::restaurants::RestaurantError) -> Self {
        match e {
            platter_core::restaurants::RestaurantError::Db(e) => AppError::from(e),
            platter_core::restaurants::RestaurantError::Menu { .. } => {
                AppError::Internal(e.to_string())
            }
        }
    }
}

impl From<platter_core::recommend::RecommendError> for AppError {
    fn from(e: platter_core::recommend::RecommendError) -> Self {
        AppError::Upstream(e.to_string())
    }
}
