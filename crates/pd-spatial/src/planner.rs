//! Route planning trait and the default nearest-neighbor planner.
//!
//! # Pluggability
//!
//! `pd-sim` calls planning via the [`RoutePlanner`] trait, so applications
//! can swap in a different ordering heuristic without touching the
//! simulator.  The default [`NearestNeighborPlanner`] is the greedy
//! heuristic: from the current stop, always drive to the closest remaining
//! target.
//!
//! # Matrix gaps
//!
//! When no remaining target has a known distance from the current stop the
//! planner does not fail; it moves to the lowest-index remaining target,
//! records the leg as unknown, and counts a gap.  The route is degraded but
//! still visits every target.

use std::collections::BTreeSet;

use pd_core::LocationId;
use tracing::warn;

use crate::DistanceMatrix;

// ── Route ─────────────────────────────────────────────────────────────────────

/// An ordered visiting sequence that starts at the depot.
///
/// `stops[0]` is the start location; every other location appears once.
/// The drive back to the start after the last stop is not a stop but is
/// accounted for in [`return_leg`](Self::return_leg).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Route {
    stops: Vec<LocationId>,
    /// `legs[i]` is the distance from `stops[i]` to `stops[i + 1]`.
    legs: Vec<Option<f64>>,
    return_leg: Option<f64>,
    gaps: usize,
}

impl Route {
    /// A route that never leaves `start`.
    pub fn trivial(start: LocationId) -> Self {
        Self {
            stops:      vec![start],
            legs:       Vec::new(),
            return_leg: Some(0.0),
            gaps:       0,
        }
    }

    /// Visiting order, start location first.
    pub fn stops(&self) -> &[LocationId] {
        &self.stops
    }

    /// Per-leg distances; `None` where the matrix had a gap.
    pub fn legs(&self) -> &[Option<f64>] {
        &self.legs
    }

    /// Distance from the last stop back to the start.
    pub fn return_leg(&self) -> Option<f64> {
        self.return_leg
    }

    /// Number of stops including the start.
    pub fn len(&self) -> usize {
        self.stops.len()
    }

    /// `true` if the route has no stop besides the start.
    pub fn is_trivial(&self) -> bool {
        self.stops.len() <= 1
    }

    /// Number of legs chosen by the lowest-index fallback.
    pub fn gaps(&self) -> usize {
        self.gaps
    }

    /// Cumulative distance at each stop (`0.0` at the start).  Unknown legs
    /// contribute nothing.
    pub fn cumulative(&self) -> Vec<f64> {
        let mut acc = 0.0;
        let mut out = Vec::with_capacity(self.stops.len());
        out.push(0.0);
        for leg in &self.legs {
            acc += leg.unwrap_or(0.0);
            out.push(acc);
        }
        out
    }

    /// Sum of the known outbound legs (excludes the return leg).
    pub fn outbound_distance(&self) -> f64 {
        self.legs.iter().flatten().sum()
    }

    /// Outbound legs plus the return leg.
    pub fn total_distance(&self) -> f64 {
        self.outbound_distance() + self.return_leg.unwrap_or(0.0)
    }
}

// ── RoutePlanner trait ────────────────────────────────────────────────────────

/// Pluggable route ordering.
///
/// # Thread safety
///
/// Implementations must be `Send + Sync` so that routes for several trucks
/// can be planned concurrently under `pd-sim`'s `parallel` feature.
pub trait RoutePlanner: Send + Sync {
    /// Order `targets` into a route starting at `start`.
    ///
    /// `start` is never repeated even if it appears in `targets`.
    fn plan(
        &self,
        matrix: &DistanceMatrix,
        start: LocationId,
        targets: &BTreeSet<LocationId>,
    ) -> Route;
}

// ── NearestNeighborPlanner ────────────────────────────────────────────────────

/// Greedy nearest-neighbor ordering.  O(k²) for k targets.
pub struct NearestNeighborPlanner;

impl RoutePlanner for NearestNeighborPlanner {
    fn plan(
        &self,
        matrix: &DistanceMatrix,
        start: LocationId,
        targets: &BTreeSet<LocationId>,
    ) -> Route {
        plan_route(matrix, start, targets)
    }
}

/// Build a nearest-neighbor route from `start` over `targets`.
///
/// At each step the remaining target with the smallest known distance from
/// the current stop is chosen; ties go to the lowest index.  If no remaining
/// target has a known distance, the lowest-index one is taken instead.
///
/// # Examples
///
/// ```
/// use std::collections::BTreeSet;
/// use pd_core::LocationId;
/// use pd_spatial::{DistanceMatrix, plan_route};
///
/// let dm = DistanceMatrix::from_rows(vec![
///     vec![Some(0.0)],
///     vec![Some(9.0), Some(0.0)],
///     vec![Some(1.0), Some(8.0), Some(0.0)],
/// ])
/// .unwrap();
/// let targets: BTreeSet<_> = [LocationId(1), LocationId(2)].into();
/// let route = plan_route(&dm, LocationId(0), &targets);
/// assert_eq!(route.stops(), &[LocationId(0), LocationId(2), LocationId(1)]);
/// ```
pub fn plan_route(
    matrix: &DistanceMatrix,
    start: LocationId,
    targets: &BTreeSet<LocationId>,
) -> Route {
    let mut remaining: BTreeSet<LocationId> = targets.clone();
    remaining.remove(&start);
    if remaining.is_empty() {
        return Route::trivial(start);
    }

    let mut stops = Vec::with_capacity(remaining.len() + 1);
    let mut legs  = Vec::with_capacity(remaining.len());
    let mut gaps  = 0;
    stops.push(start);
    let mut current = start;

    while let Some(&lowest) = remaining.first() {
        let (next, leg) = match matrix.nearest(current, remaining.iter().copied()) {
            Some((next, d)) => (next, Some(d)),
            None => {
                warn!(from = current.0, to = lowest.0, "no known distance; visiting lowest index");
                gaps += 1;
                (lowest, None)
            }
        };
        remaining.remove(&next);
        stops.push(next);
        legs.push(leg);
        current = next;
    }

    let return_leg = matrix.get(current, start);
    Route { stops, legs, return_leg, gaps }
}
