//! Plain data row types written by output backends.

use chrono::NaiveDateTime;

use pd_sim::TruckRun;
use pd_store::{Package, PackageStatus};

/// One package's state, either final or as of a query time.
#[derive(Debug, Clone, PartialEq)]
pub struct PackageSnapshotRow {
    pub package_id:  u32,
    pub address:     String,
    pub city:        String,
    pub zip:         String,
    /// `10:30 AM` or `EOD`.
    pub deadline:    String,
    pub truck:       Option<u32>,
    /// `At Hub`, `In Route`, `Delivered`; empty when not available.
    pub status:      String,
    pub status_time: Option<NaiveDateTime>,
    /// Truck odometer reading at delivery; `0.0` until delivered.
    pub distance:    f64,
    pub on_time:     Option<bool>,
}

impl PackageSnapshotRow {
    /// Row for the package's current (final) state.
    pub fn from_package(p: &Package) -> Self {
        Self::as_of(p, p.timestamp())
    }

    /// Row for the package as it stood at `at`.
    pub fn as_of(p: &Package, at: NaiveDateTime) -> Self {
        let event = p.status_as_of(at).event();
        let delivered = event.is_some_and(|e| e.status == PackageStatus::Delivered);
        let loaded = event.is_some_and(|e| e.status != PackageStatus::AtHub);
        Self {
            package_id:  p.id.0,
            address:     p.address.clone(),
            city:        p.city.clone(),
            zip:         p.zip.clone(),
            deadline:    p.deadline.to_string(),
            truck:       p.truck().filter(|_| loaded).map(|t| t.0),
            status:      event.map(|e| e.status.to_string()).unwrap_or_default(),
            status_time: event.map(|e| e.at),
            distance:    if delivered { p.distance() } else { 0.0 },
            on_time:     if delivered { p.on_time() } else { None },
        }
    }
}

/// Summary of one truck run.
#[derive(Debug, Clone, PartialEq)]
pub struct TruckRunRow {
    pub truck:     u32,
    pub wave:      String,
    pub departed:  NaiveDateTime,
    pub finished:  NaiveDateTime,
    pub stops:     usize,
    pub delivered: usize,
    pub distance:  f64,
    pub gaps:      usize,
}

impl From<&TruckRun> for TruckRunRow {
    fn from(run: &TruckRun) -> Self {
        Self {
            truck:     run.truck.0,
            wave:      run.wave.clone(),
            departed:  run.departed,
            finished:  run.finished,
            stops:     run.stops,
            delivered: run.delivered.len(),
            distance:  run.distance,
            gaps:      run.gaps,
        }
    }
}
