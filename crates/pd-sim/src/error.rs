use thiserror::Error;

use pd_core::{CoreError, PackageId, TruckId};
use pd_dispatch::DispatchError;
use pd_spatial::SpatialError;
use pd_store::StoreError;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error("{} package(s) never left the hub: {0:?}", .0.len())]
    UnassignedAtEndOfDay(Vec<PackageId>),

    #[error("{truck} finished its route still carrying {packages:?}")]
    Stranded { truck: TruckId, packages: Vec<PackageId> },

    #[error("the day has already been simulated")]
    AlreadyRun,

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Spatial(#[from] SpatialError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}

pub type SimResult<T> = Result<T, SimError>;
