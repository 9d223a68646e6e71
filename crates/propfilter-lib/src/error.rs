use thiserror::Error;

/// Convenient result alias for the property filter library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Raised when the filtering step decides not to produce a result.
    #[error("Something went wrong!")]
    StepFailed,
}
