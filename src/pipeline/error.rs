use thiserror::Error;

use crate::chunking::ChunkingError;
use crate::embedding::EmbeddingError;
use crate::generation::GenerationError;
use crate::retrieval::RetrievalError;
use crate::vectordb::VectorDbError;
use crate::verification::VerifyError;

#[derive(Debug, Error)]
/// Pipeline-level failures.
///
/// Transient variants have already exhausted their retry budget by the
/// time they surface; the caller-facing layer maps them to 5xx. Everything
/// else is an input or configuration problem. "No supporting evidence" is
/// never an error; it travels as a normal response.
pub enum PipelineError {
    #[error("chunking failed: {0}")]
    Chunking(#[from] ChunkingError),

    #[error("embedding failed: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("vector store failed: {0}")]
    Store(#[from] VectorDbError),

    #[error("retrieval failed: {0}")]
    Retrieval(#[from] RetrievalError),

    #[error("generation failed: {0}")]
    Generation(#[from] GenerationError),

    #[error("verification failed: {0}")]
    Verification(#[from] VerifyError),

    #[error("invalid request: {reason}")]
    InvalidRequest {
        /// Reason.
        reason: String,
    },
}

impl PipelineError {
    /// Distinguishes "the system could not process the request" (retry-
    /// worthy, 5xx) from "the request itself is unprocessable" (4xx).
    pub fn is_transient(&self) -> bool {
        match self {
            PipelineError::Chunking(_)
            | PipelineError::Verification(_)
            | PipelineError::InvalidRequest { .. } => false,
            PipelineError::Embedding(e) => e.is_transient(),
            PipelineError::Store(_) => true,
            PipelineError::Retrieval(e) => e.is_transient(),
            PipelineError::Generation(e) => e.is_transient(),
        }
    }
}
