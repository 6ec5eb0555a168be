use thiserror::Error;

#[derive(Debug, Error)]
/// Errors from the LLM generation collaborator.
pub enum GenerationError {
    /// The remote call failed or timed out.
    #[error("generation request failed: {message}")]
    RequestFailed {
        /// Error message.
        message: String,
    },

    /// The service answered without any completion text.
    #[error("generation response contained no answer")]
    EmptyResponse,
}

impl GenerationError {
    /// Returns `true` when a retry with backoff may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            GenerationError::RequestFailed { .. } | GenerationError::EmptyResponse
        )
    }
}
