use chrono::NaiveDateTime;
use thiserror::Error;

use pd_core::{CoreError, PackageId};

use crate::PackageStatus;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("package {0} not found")]
    PackageNotFound(PackageId),

    #[error("package {0} appears more than once in the input")]
    DuplicatePackage(PackageId),

    #[error("package {package}: cannot move from {from} to {to}")]
    InvalidTransition {
        package: PackageId,
        from:    PackageStatus,
        to:      PackageStatus,
    },

    #[error("package {package}: event at {at} precedes last event at {last}")]
    OutOfOrderEvent {
        package: PackageId,
        last:    NaiveDateTime,
        at:      NaiveDateTime,
    },

    #[error("package {0} has an address correction but no wrong-address note")]
    UnflaggedCorrection(PackageId),

    #[error("package {package}: {reason}")]
    Note { package: PackageId, reason: String },

    #[error("package input parse error: {0}")]
    Parse(String),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;
