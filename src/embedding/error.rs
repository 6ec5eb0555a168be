use thiserror::Error;

#[derive(Debug, Error)]
/// Errors from the embedding collaborator. All variants except
/// [`EmbeddingError::EmptyInput`] and [`EmbeddingError::DimensionMismatch`]
/// are transient: the request that hit them may be retried.
pub enum EmbeddingError {
    /// Nothing to embed.
    #[error("cannot embed empty text")]
    EmptyInput,

    /// The remote call failed or timed out.
    #[error("embedding request failed: {message}")]
    RequestFailed {
        /// Error message.
        message: String,
    },

    /// The service answered without a usable vector.
    #[error("embedding response contained no vector")]
    EmptyResponse,

    /// The service returned a vector of the wrong width. Indexing and
    /// querying must use the same model/version or similarity scores are
    /// meaningless, so this is surfaced instead of papered over.
    #[error("embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Configured dimension.
        expected: usize,
        /// Returned dimension.
        actual: usize,
    },
}

impl EmbeddingError {
    /// Returns `true` when a retry with backoff may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            EmbeddingError::RequestFailed { .. } | EmbeddingError::EmptyResponse
        )
    }
}
