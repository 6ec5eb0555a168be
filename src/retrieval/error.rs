use thiserror::Error;

use crate::embedding::EmbeddingError;
use crate::reranking::RerankError;
use crate::vectordb::VectorDbError;

#[derive(Debug, Error)]
pub enum RetrievalError {
    /// The query was empty after trimming.
    #[error("query cannot be empty")]
    EmptyQuery,

    /// Invalid retrieval parameters, caught at construction.
    #[error("invalid retrieval configuration: {reason}")]
    InvalidConfig { reason: String },

    /// Query embedding failed; there is no fallback embedding.
    #[error("query embedding failed: {0}")]
    Embedding(#[from] EmbeddingError),

    /// Similarity search failed.
    #[error("vector search failed: {0}")]
    Store(#[from] VectorDbError),

    /// Cross-encoder scoring failed.
    #[error("rerank failed: {0}")]
    Rerank(#[from] RerankError),
}

impl RetrievalError {
    /// Dependency failures are retryable; bad input and bad config are not.
    pub fn is_transient(&self) -> bool {
        match self {
            RetrievalError::EmptyQuery | RetrievalError::InvalidConfig { .. } => false,
            RetrievalError::Embedding(e) => e.is_transient(),
            RetrievalError::Store(_) => true,
            RetrievalError::Rerank(e) => e.is_transient(),
        }
    }
}
