//! Spatial-subsystem error type.

use thiserror::Error;

use pd_core::LocationId;

/// Errors produced by `pd-spatial`.
#[derive(Debug, Error)]
pub enum SpatialError {
    #[error("address {0:?} is not in the location index")]
    LocationNotFound(String),

    #[error("address {address:?} on line {line} was already registered")]
    DuplicateAddress { address: String, line: usize },

    #[error("distance row {row} has {len} cells but the matrix is {size}×{size}")]
    DimensionMismatch { row: usize, len: usize, size: usize },

    #[error("invalid distance {value} between {from} and {to}")]
    InvalidDistance { from: LocationId, to: LocationId, value: f64 },

    #[error("no known distance between {from} and {to}")]
    MatrixGap { from: LocationId, to: LocationId },

    #[error("spatial input parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type SpatialResult<T> = Result<T, SpatialError>;
