use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use flacon_core::error::CatalogError;
use thiserror::Error;
use tracing::error;

use crate::model::MessageResponse;

pub type Result<T> = std::result::Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("invalid auth key")]
    Unauthorized,

    #[error("{0}")]
    NotFound(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::NotFound(what) => Self::NotFound(format!("no record matches {what}")),
            other => Self::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal(message) => {
                error!(error = %message, "request failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(MessageResponse {
            message: self.to_string(),
        });

        (status, body).into_response()
    }
}
