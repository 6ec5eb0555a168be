use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::pipeline::PipelineError;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// A dependency failed after exhausting its retry budget; the caller
    /// may retry the whole request.
    #[error("upstream dependency failed: {0}")]
    Upstream(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<PipelineError> for GatewayError {
    fn from(err: PipelineError) -> Self {
        match &err {
            PipelineError::InvalidRequest { .. }
            | PipelineError::Chunking(_)
            | PipelineError::Verification(_) => GatewayError::InvalidRequest(err.to_string()),
            _ if err.is_transient() => GatewayError::Upstream(err.to_string()),
            _ => GatewayError::Internal(err.to_string()),
        }
    }
}

#[derive(serde::Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
    /// `true` when retrying the same request may succeed. Distinguishes
    /// "could not process" from definitive outcomes.
    pub retryable: bool,
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let (status, retryable) = match &self {
            GatewayError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, false),
            GatewayError::Upstream(_) => (StatusCode::BAD_GATEWAY, true),
            GatewayError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, false),
        };

        let body = Json(ErrorResponse {
            error: self.to_string(),
            code: status.as_u16(),
            retryable,
        });

        (status, body).into_response()
    }
}
