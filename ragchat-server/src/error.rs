//! Maps pipeline failures to classified HTTP errors.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use ragchat_rag::RagError;
use thiserror::Error;
use tracing::error;

use crate::protocol::{ErrorBody, ErrorResponse};

/// An error returned from a handler.
#[derive(Debug, Error)]
#[error(transparent)]
pub struct ApiError(#[from] RagError);

impl ApiError {
    /// HTTP status and stable error code for this failure.
    pub fn classify(&self) -> (StatusCode, &'static str) {
        match &self.0 {
            err if err.is_retrieval() => (StatusCode::BAD_GATEWAY, "retrieval_failed"),
            RagError::ContextualizeError(_) => (StatusCode::BAD_GATEWAY, "contextualize_failed"),
            RagError::GenerationError(_) => (StatusCode::BAD_GATEWAY, "generation_failed"),
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.classify();
        error!(%status, code, error = %self.0, "chat request failed");

        let body = ErrorResponse {
            error: ErrorBody { code: code.to_string(), message: self.0.to_string() },
        };
        (status, Json(body)).into_response()
    }
}
