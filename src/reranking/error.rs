use thiserror::Error;

#[derive(Debug, Error)]
/// Errors from the cross-encoder collaborator.
///
/// A rerank failure fails the whole retrieval as a transient error; it is
/// never silently downgraded to similarity-only ordering.
pub enum RerankError {
    /// The remote call failed or timed out.
    #[error("rerank request failed: {message}")]
    RequestFailed {
        /// Error message.
        message: String,
    },

    /// The service answered with an unusable body.
    #[error("rerank response malformed: {message}")]
    MalformedResponse {
        /// Error message.
        message: String,
    },

    /// Invalid reranker configuration.
    #[error("invalid reranker configuration: {reason}")]
    InvalidConfig {
        /// Reason.
        reason: String,
    },
}

impl RerankError {
    /// Returns `true` when a retry with backoff may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            RerankError::RequestFailed { .. } | RerankError::MalformedResponse { .. }
        )
    }
}
