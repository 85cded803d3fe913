//! Mapping from [`BiosearchError`] to HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use biosearch_shared::BiosearchError;

/// Handler error wrapper; renders as `{"detail": ..., "kind": ...}`.
#[derive(Debug)]
pub struct ApiError(pub BiosearchError);

#[derive(Serialize)]
struct ErrorBody {
    detail: String,
    kind: &'static str,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            BiosearchError::NotFound { .. } => StatusCode::NOT_FOUND,
            BiosearchError::Fetch(_)
            | BiosearchError::Extraction { .. }
            | BiosearchError::Summarizer(_)
            | BiosearchError::InvalidResponseFormat { .. } => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<BiosearchError> for ApiError {
    fn from(err: BiosearchError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(kind = self.0.kind(), error = %self.0, "request failed");
        }
        let body = ErrorBody {
            detail: self.0.to_string(),
            kind: self.0.kind(),
        };
        (status, Json(body)).into_response()
    }
}
