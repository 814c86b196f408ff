use thiserror::Error;

/// Everything that can stop a turn. Nothing here is retried; every case
/// is surfaced to the caller immediately.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum TurnError {
    /// Missing credential or an unreadable template file. Raised before
    /// any network call is attempted.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A request that cannot be turned into a user message, e.g. an empty
    /// question. History is left untouched.
    #[error("Invalid input: {0}")]
    Input(String),

    /// The completion request itself failed (network, non-success status,
    /// malformed payload). The user message appended for this turn stays
    /// in history.
    #[error("Completion request failed: {0}")]
    Completion(anyhow::Error),
}

pub type TurnResult<T> = Result<T, TurnError>;
