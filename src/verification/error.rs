use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Verifier failures. An unsupported answer is NOT an error: it comes back
/// as a normal report with `meets_threshold = false`. Only malformed input
/// and malformed configuration fail.
pub enum VerifyError {
    /// The query was empty after trimming.
    #[error("invalid verification input: {reason}")]
    InvalidInput {
        /// Reason.
        reason: String,
    },

    /// Weights or thresholds out of range, caught at construction.
    #[error("invalid verifier configuration: {reason}")]
    InvalidConfig {
        /// Reason.
        reason: String,
    },
}
