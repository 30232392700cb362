//! Common result and error types for the basalt crates.

/// The standard result type for fallible internal operations.
pub type BasaltResult<T> = Result<T, InternalError>;

/// An internal error indicating a bug in basalt, not a user input problem.
///
/// These should never occur during normal operation; recoverable legality
/// rejections in the placer-facing API are expressed as `bool`/`Option`
/// returns instead and never allocate an error.
#[derive(Debug, thiserror::Error)]
#[error("internal error: {message}")]
pub struct InternalError {
    /// Description of the internal error.
    pub message: String,
}

impl InternalError {
    /// Creates a new internal error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<String> for InternalError {
    fn from(message: String) -> Self {
        Self { message }
    }
}
