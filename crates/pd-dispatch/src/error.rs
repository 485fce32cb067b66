use thiserror::Error;

use pd_core::{PackageId, TruckId};
use pd_store::StoreError;

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("truck {truck} is full ({capacity} packages)")]
    CapacityExceeded { truck: TruckId, capacity: usize },

    #[error("truck {0} is not part of the fleet")]
    UnknownTruck(TruckId),

    #[error("package {package} placed on {truck} without group member {missing}")]
    SplitGroup {
        package: PackageId,
        truck:   TruckId,
        missing: PackageId,
    },

    #[error("package {package} is pinned to {required} but was placed on {truck}")]
    WrongTruck {
        package:  PackageId,
        truck:    TruckId,
        required: TruckId,
    },

    #[error("package {0} is not waiting at the hub")]
    AlreadyAssigned(PackageId),

    #[error("wave {0:?} loads no trucks")]
    EmptyWave(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type DispatchResult<T> = Result<T, DispatchError>;
