//! Error types for the simulation.

use thiserror::Error;

/// Result type for simulation operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while setting up a simulation.
///
/// Running the simulation never fails; only configuration and world
/// construction can.
#[derive(Debug, Error)]
pub enum Error {
    /// A configuration value could not be parsed or is out of range
    #[error("invalid config value for {key}: {value:?} ({reason})")]
    InvalidConfig {
        key: &'static str,
        value: String,
        reason: &'static str,
    },

    /// The drawing surface or cell size yields an empty grid
    #[error("invalid surface: {0}")]
    InvalidSurface(String),

    /// An explicit cell layout does not fill the grid
    #[error("layout has {actual} cells, grid needs {expected}")]
    LayoutMismatch { expected: usize, actual: usize },

    /// A cell pattern contains a character that names no state
    #[error("unknown cell glyph {0:?}")]
    InvalidPattern(char),
}
