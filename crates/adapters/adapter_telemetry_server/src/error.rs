//! Collector error type and its HTTP mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::store::StoreError;

/// Failure while handling a collector request.
#[derive(Debug, thiserror::Error)]
pub enum IngressError {
    /// The request body is malformed or fails validation (HTTP 422).
    #[error("{0}")]
    Validation(String),
    /// Persisting accepted samples failed (HTTP 500).
    #[error(transparent)]
    Storage(#[from] StoreError),
}

impl IngressError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}

impl IntoResponse for IngressError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::Validation(message) => (StatusCode::UNPROCESSABLE_ENTITY, message),
            Self::Storage(err) => {
                // Storage details stay in the logs, not in the response.
                tracing::error!(error = %err, "sample persistence failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Something went wrong".to_string(),
                )
            }
        };
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}
