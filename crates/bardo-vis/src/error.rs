//! Error types for the terminal front-end.

use thiserror::Error;

/// Result type for front-end operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// A positional argument is not a number
    #[error("invalid {name}: {value:?}")]
    InvalidArgument { name: &'static str, value: String },

    /// A flag nobody understands
    #[error("unknown flag {0}")]
    UnknownFlag(String),

    /// More positional arguments than `width height seconds`
    #[error("unexpected argument {0:?}")]
    UnexpectedArgument(String),

    #[error("failed to serialize stats: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
