use thiserror::Error;

#[derive(Debug, Error)]
/// Errors from the moderation collaborator.
///
/// These never abort a request: the gate fails open on service errors and
/// logs the skipped check. An actual violation verdict is not an error.
pub enum ModerationError {
    /// The remote call failed or timed out.
    #[error("moderation request failed: {message}")]
    RequestFailed {
        /// Error message.
        message: String,
    },

    /// The service answered without a verdict.
    #[error("moderation response contained no result")]
    EmptyResponse,
}
