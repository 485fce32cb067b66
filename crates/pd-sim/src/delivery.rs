//! Walking a planned route and handing packages over.

use std::collections::BTreeSet;

use chrono::NaiveDateTime;
use tracing::debug;

use pd_core::{LocationId, PackageId, SimClock, TruckId};
use pd_dispatch::Truck;
use pd_spatial::{LocationIndex, Route};
use pd_store::PackageStore;

use crate::{SimError, SimResult};

/// Summary of one truck run: hub, stops, back to the hub.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TruckRun {
    pub truck:     TruckId,
    /// Label of the wave that loaded the truck.
    pub wave:      String,
    pub departed:  NaiveDateTime,
    /// Time of the last delivery; equals `departed` if nothing was handed
    /// over.
    pub finished:  NaiveDateTime,
    /// Stops visited, hub excluded.
    pub stops:     usize,
    /// Packages handed over, in delivery order.
    pub delivered: Vec<PackageId>,
    /// Outbound legs plus the return leg.
    pub distance:  f64,
    /// Legs whose distance was unknown.
    pub gaps:      usize,
}

/// Locations the packages aboard `truck` are addressed to.
pub fn route_targets(
    truck: &Truck,
    store: &PackageStore,
    locations: &LocationIndex,
) -> SimResult<BTreeSet<LocationId>> {
    let mut targets = BTreeSet::new();
    for &id in truck.queue() {
        let package = store.lookup(id)?;
        targets.insert(locations.lookup(&package.address)?);
    }
    Ok(targets)
}

/// Drive `route` with `truck`, leaving at `start`.
///
/// At every stop each package aboard that is addressed there is delivered
/// with the running distance and the matching clock time.  Unknown legs add
/// no distance.  Afterwards the truck's distance grows by the whole route
/// including the return leg, and its `available_at` moves to the last
/// delivery time (or stays at `start`).
///
/// # Errors
///
/// [`SimError::Stranded`] if packages are still aboard after the last stop,
/// plus any lookup or status-transition error.
pub fn execute_route(
    route: &Route,
    truck: &mut Truck,
    store: &mut PackageStore,
    locations: &LocationIndex,
    clock: &SimClock,
    start: NaiveDateTime,
) -> SimResult<(f64, NaiveDateTime, Vec<PackageId>)> {
    let mut available_at = start;
    let mut delivered = Vec::new();

    for (&stop, &running) in route.stops().iter().zip(route.cumulative().iter()) {
        let at = clock.arrival(start, running)?;
        for id in truck.queue().to_vec() {
            let package = store.lookup_mut(id)?;
            if locations.lookup(&package.address)? != stop {
                continue;
            }
            package.deliver(at, running)?;
            truck.unload(id);
            delivered.push(id);
            available_at = at;
            debug!(package = %id, truck = %truck.id(), stop = stop.0, distance = running, %at, "delivered");
        }
    }

    if !truck.is_empty() {
        return Err(SimError::Stranded { truck: truck.id(), packages: truck.queue().to_vec() });
    }

    let total = route.total_distance();
    truck.add_distance(total);
    truck.set_available_at(available_at);
    truck.finish_run();
    Ok((total, available_at, delivered))
}
