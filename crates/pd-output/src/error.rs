//! Error types for pd-output.

use thiserror::Error;

use pd_core::PackageId;

/// Errors that can occur when querying or writing output.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("package data not found for {0}")]
    NotFound(PackageId),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),
}

/// Alias for `Result<T, OutputError>`.
pub type OutputResult<T> = Result<T, OutputError>;
