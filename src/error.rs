// src/error.rs
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::message::ErrorBody;
use crate::services::generator::BackendError;

/// Every way a chat turn can fail, with its HTTP mapping.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("API key not configured")]
    Configuration,

    #[error("Failed to generate response")]
    Backend(#[from] BackendError),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::Configuration | AppError::Backend(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Only backend failures echo their detail back to the caller.
    pub fn details(&self) -> Option<String> {
        match self {
            AppError::Backend(e) => Some(e.to_string()),
            _ => None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::BadRequest(reason) => tracing::warn!(%reason, "rejected chat request"),
            AppError::MethodNotAllowed => tracing::warn!("method not allowed"),
            AppError::Configuration => tracing::error!("GEMINI_API_KEY is not set"),
            AppError::Backend(e) => tracing::error!(error = %e, "backend call failed"),
        }

        let body = ErrorBody {
            error: self.to_string(),
            details: self.details(),
        };
        (self.status(), Json(body)).into_response()
    }
}
