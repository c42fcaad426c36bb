//! Error types for expedicao-rateio.

use thiserror::Error;

/// Result type for rateio operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while splitting expenses.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The same participant was listed twice.
    #[error("duplicate participant: {0}")]
    DuplicateParticipant(String),

    /// A monetary amount could not be parsed.
    #[error("invalid amount: {0:?}")]
    InvalidAmount(String),
}
