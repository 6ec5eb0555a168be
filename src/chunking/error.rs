use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Configuration failures caught before any page is processed.
pub enum ChunkingError {
    /// Chunk size must be at least one character.
    #[error("chunk size must be greater than zero, got {size}")]
    InvalidChunkSize {
        /// Rejected size.
        size: usize,
    },

    /// Overlap must leave a positive window stride.
    #[error("chunk overlap ({overlap}) must be smaller than chunk size ({size})")]
    InvalidOverlap {
        /// Rejected overlap.
        overlap: usize,
        /// Configured size.
        size: usize,
    },
}
