//! Wave plans: what a policy decided, and the step that carries it out.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use chrono::NaiveDateTime;
use tracing::debug;

use pd_core::{PackageId, TruckId};
use pd_store::PackageStore;

use crate::{DispatchError, DispatchResult, Fleet, ShipGroups};

// ── Plan data ─────────────────────────────────────────────────────────────────

/// Put `package` on `truck`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Assignment {
    pub package: PackageId,
    pub truck:   TruckId,
}

/// Why a package was left at the hub this wave.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Deferral {
    /// Delayed, or its wrong address is not corrected yet.
    Held,
    /// Another member of its ship-with group is held.
    GroupHeld,
    /// Pinned to a truck that does not load in this wave.
    TruckNotLoading(TruckId),
    /// No truck in the wave has room (for the whole group, if grouped).
    NoCapacity,
    /// Members of its group are pinned to different trucks.
    ConflictingPins,
    /// Part of its group already left on a truck it can no longer join.
    GroupSplit,
    /// The wave loads constrained packages only.
    NotFilled,
}

impl fmt::Display for Deferral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Deferral::Held               => f.write_str("held at hub"),
            Deferral::GroupHeld          => f.write_str("group member held at hub"),
            Deferral::TruckNotLoading(t) => write!(f, "{t} not loading"),
            Deferral::NoCapacity         => f.write_str("no capacity"),
            Deferral::ConflictingPins    => f.write_str("group pinned to different trucks"),
            Deferral::GroupSplit         => f.write_str("group already split"),
            Deferral::NotFilled          => f.write_str("wave does not fill"),
        }
    }
}

/// Output of one policy evaluation.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WavePlan {
    /// Nominal wave time; every assignment is stamped with it.
    pub at:          NaiveDateTime,
    pub assignments: Vec<Assignment>,
    pub deferred:    Vec<(PackageId, Deferral)>,
}

impl WavePlan {
    pub fn new(at: NaiveDateTime) -> Self {
        Self { at, assignments: Vec::new(), deferred: Vec::new() }
    }

    pub fn assign(&mut self, package: PackageId, truck: TruckId) {
        self.assignments.push(Assignment { package, truck });
    }

    pub fn defer(&mut self, package: PackageId, reason: Deferral) {
        self.deferred.push((package, reason));
    }

    /// Planned truck for `package`.
    pub fn truck_for(&self, package: PackageId) -> Option<TruckId> {
        self.assignments.iter().find(|a| a.package == package).map(|a| a.truck)
    }

    pub fn deferral_of(&self, package: PackageId) -> Option<Deferral> {
        self.deferred.iter().find(|(p, _)| *p == package).map(|&(_, d)| d)
    }

    /// Packages planned onto `truck`, in plan order.
    pub fn assigned_to(&self, truck: TruckId) -> impl Iterator<Item = PackageId> + '_ {
        self.assignments.iter().filter(move |a| a.truck == truck).map(|a| a.package)
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty() && self.deferred.is_empty()
    }
}

// ── Validation ────────────────────────────────────────────────────────────────

/// Reject placements that break a truck pin or split a ship-with group.
///
/// A grouped package is accepted on truck `t` only if every other member is
/// already aboard `t` or is placed on `t` by the same batch.
pub fn check_placement(
    store: &PackageStore,
    fleet: &Fleet,
    groups: &ShipGroups,
    assignments: &[Assignment],
) -> DispatchResult<()> {
    for a in assignments {
        let package = store.lookup(a.package)?;
        fleet.truck(a.truck)?;

        if let Some(required) = package.required_truck() {
            if required != a.truck {
                return Err(DispatchError::WrongTruck {
                    package: a.package,
                    truck: a.truck,
                    required,
                });
            }
        }

        let Some(members) = groups.group_of(a.package) else { continue };
        for &member in members.iter().filter(|&&m| m != a.package) {
            let aboard = fleet.get(a.truck).is_some_and(|t| t.carries(member));
            let alongside = assignments.iter().any(|b| b.package == member && b.truck == a.truck);
            if !(aboard || alongside) {
                return Err(DispatchError::SplitGroup {
                    package: a.package,
                    truck:   a.truck,
                    missing: member,
                });
            }
        }
    }
    Ok(())
}

// ── Apply ─────────────────────────────────────────────────────────────────────

/// Load every planned package and move it `AtHub → InRoute` at `plan.at`.
///
/// The plan is validated with [`check_placement`] and against truck
/// capacity before anything is mutated, so a rejected plan leaves the store
/// and fleet untouched.
pub fn apply_plan(
    plan: &WavePlan,
    store: &mut PackageStore,
    fleet: &mut Fleet,
    groups: &ShipGroups,
) -> DispatchResult<()> {
    check_placement(store, fleet, groups, &plan.assignments)?;

    let mut seen = BTreeSet::new();
    let mut per_truck: BTreeMap<TruckId, usize> = BTreeMap::new();
    for a in &plan.assignments {
        if !seen.insert(a.package) || !store.lookup(a.package)?.is_unassigned() {
            return Err(DispatchError::AlreadyAssigned(a.package));
        }
        *per_truck.entry(a.truck).or_default() += 1;
    }
    for (&id, &n) in &per_truck {
        let truck = fleet.truck(id)?;
        if truck.free() < n {
            return Err(DispatchError::CapacityExceeded { truck: id, capacity: truck.capacity() });
        }
    }

    for a in &plan.assignments {
        store.lookup_mut(a.package)?.assign(a.truck, plan.at)?;
        fleet.truck_mut(a.truck)?.load(a.package)?;
        debug!(package = %a.package, truck = %a.truck, at = %plan.at, "loaded");
    }
    Ok(())
}
