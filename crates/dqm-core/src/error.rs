//! Error types for AutoDQM

use thiserror::Error;

/// AutoDQM error type
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed histogram, or a data/reference pair whose shapes disagree
    #[error("Invalid histogram: {0}")]
    InvalidHistogram(String),

    /// Comparator options outside their valid range
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// Registry lookup miss
    #[error("Unknown comparator: {0}")]
    UnknownComparator(String),

    /// Validation error for arguments of numeric helpers
    #[error("Validation error: {0}")]
    Validation(String),

    /// Computation error
    #[error("Computation error: {0}")]
    Computation(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
