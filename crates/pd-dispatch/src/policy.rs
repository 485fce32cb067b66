//! Assignment policies.
//!
//! A policy looks at the store and the trucks loading in a wave and returns a
//! [`WavePlan`].  It never mutates anything; [`apply_plan`](crate::apply_plan)
//! does that.
//!
//! # Rule order of [`RulePolicy`]
//!
//! 1. Ship-with groups go to one truck together, or all wait.
//! 2. Pinned packages go to their truck, or wait for a wave that loads it.
//! 3. Packages due before the cutoff go to the earliest-departing truck with
//!    room, earliest deadline first.
//! 4. Held packages (delayed, or wrong address not yet corrected) wait.
//! 5. Everything else fills the remaining room in id order, if the wave
//!    fills.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{NaiveDateTime, NaiveTime};

use pd_core::{DayConfig, PackageId, TruckId};
use pd_store::{Package, PackageStore};

use crate::{Deferral, Fleet, ShipGroups, Wave, WavePlan};

// ── Context ───────────────────────────────────────────────────────────────────

/// Everything a policy may read while planning one wave.
#[derive(Clone, Copy)]
pub struct WaveContext<'a> {
    pub store:  &'a PackageStore,
    pub fleet:  &'a Fleet,
    pub groups: &'a ShipGroups,
    pub wave:   &'a Wave,
    /// Nominal wave time.
    pub at:     NaiveDateTime,
}

// ── Trait ─────────────────────────────────────────────────────────────────────

/// Decides which waiting packages ride on which truck in a wave.
///
/// # Contract
///
/// - Must be deterministic for the same context.
/// - Must only place packages that are unassigned and at the hub.
/// - Must respect the free capacity of every truck.
pub trait AssignmentPolicy: Send + Sync {
    fn plan(&self, ctx: &WaveContext<'_>) -> WavePlan;
}

// ── RulePolicy ────────────────────────────────────────────────────────────────

/// The fixed-priority policy described in the module docs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RulePolicy {
    /// Packages due strictly before this time get rule 3.  `None` skips it.
    pub deadline_cutoff: Option<NaiveTime>,
}

impl RulePolicy {
    pub fn new(deadline_cutoff: Option<NaiveTime>) -> Self {
        Self { deadline_cutoff }
    }

    pub fn from_config(config: &DayConfig) -> Self {
        Self::new(config.deadline_cutoff)
    }

    fn is_urgent(&self, package: &Package) -> bool {
        match (self.deadline_cutoff, package.deadline.time()) {
            (Some(cutoff), Some(due)) => due < cutoff,
            _ => false,
        }
    }

    /// Truck for a whole group, or why the group waits.
    fn place_group(
        &self,
        ctx: &WaveContext<'_>,
        members: &[PackageId],
        pending: &[&Package],
        slots: &Slots,
    ) -> Result<TruckId, Deferral> {
        if pending.iter().any(|p| p.is_held(ctx.at)) {
            return Err(Deferral::GroupHeld);
        }

        // Members that already have a truck fix the group's truck, but only
        // while they are still aboard and that truck is loading now.
        let mut onboard = BTreeSet::new();
        for &id in members {
            let Some(p) = ctx.store.get(id) else { continue };
            if let Some(t) = p.truck() {
                let aboard = ctx.fleet.get(t).is_some_and(|truck| truck.carries(id));
                if !aboard || !ctx.wave.loads(t) {
                    return Err(Deferral::GroupSplit);
                }
                onboard.insert(t);
            }
        }
        if onboard.len() > 1 {
            return Err(Deferral::GroupSplit);
        }

        let pins: BTreeSet<TruckId> =
            members.iter().filter_map(|&id| ctx.store.get(id)?.required_truck()).collect();
        if pins.len() > 1 || (!onboard.is_empty() && !pins.is_empty() && onboard != pins) {
            return Err(Deferral::ConflictingPins);
        }

        let fixed = onboard.first().or(pins.first()).copied();
        let need = pending.len();
        match fixed {
            Some(t) if !slots.loads(t) => Err(Deferral::TruckNotLoading(t)),
            Some(t) if slots.free(t) < need => Err(Deferral::NoCapacity),
            Some(t) => Ok(t),
            None => slots.first_with_room(need).ok_or(Deferral::NoCapacity),
        }
    }
}

impl Default for RulePolicy {
    fn default() -> Self {
        Self::from_config(&DayConfig::default())
    }
}

impl AssignmentPolicy for RulePolicy {
    fn plan(&self, ctx: &WaveContext<'_>) -> WavePlan {
        let mut plan = WavePlan::new(ctx.at);
        let mut slots = Slots::for_wave(ctx);
        let mut decided: BTreeSet<PackageId> = BTreeSet::new();

        // 1. Groups.
        for members in ctx.groups.iter() {
            let pending: Vec<&Package> = members
                .iter()
                .filter_map(|&id| ctx.store.get(id))
                .filter(|p| p.is_unassigned())
                .collect();
            if pending.is_empty() {
                continue;
            }
            decided.extend(pending.iter().map(|p| p.id));
            match self.place_group(ctx, members, &pending, &slots) {
                Ok(truck) => {
                    slots.take(truck, pending.len());
                    for p in &pending {
                        plan.assign(p.id, truck);
                    }
                }
                Err(reason) => {
                    for p in &pending {
                        plan.defer(p.id, reason);
                    }
                }
            }
        }

        let waiting: Vec<&Package> =
            ctx.store.unassigned().filter(|p| !decided.contains(&p.id)).collect();

        // 2. Pinned.  4. Held packages are skipped here and deferred below.
        for p in waiting.iter().filter(|p| !p.is_held(ctx.at)) {
            let Some(t) = p.required_truck() else { continue };
            decided.insert(p.id);
            if !slots.loads(t) {
                plan.defer(p.id, Deferral::TruckNotLoading(t));
            } else if slots.free(t) == 0 {
                plan.defer(p.id, Deferral::NoCapacity);
            } else {
                slots.take(t, 1);
                plan.assign(p.id, t);
            }
        }

        // 3. Early deadlines.
        let mut urgent: Vec<&Package> = waiting
            .iter()
            .copied()
            .filter(|p| !decided.contains(&p.id) && !p.is_held(ctx.at) && self.is_urgent(p))
            .collect();
        urgent.sort_by_key(|p| (p.deadline, p.id));
        for p in urgent {
            decided.insert(p.id);
            Self::place_one(&mut plan, &mut slots, p.id);
        }

        // 4. Held.  5. Fill.
        for p in waiting.iter().filter(|p| !decided.contains(&p.id)) {
            if p.is_held(ctx.at) {
                plan.defer(p.id, Deferral::Held);
            } else if ctx.wave.fill {
                Self::place_one(&mut plan, &mut slots, p.id);
            } else {
                plan.defer(p.id, Deferral::NotFilled);
            }
        }

        plan
    }
}

impl RulePolicy {
    fn place_one(plan: &mut WavePlan, slots: &mut Slots, package: PackageId) {
        match slots.first_with_room(1) {
            Some(t) => {
                slots.take(t, 1);
                plan.assign(package, t);
            }
            None => plan.defer(package, Deferral::NoCapacity),
        }
    }
}

// ── Slots ─────────────────────────────────────────────────────────────────────

/// Free capacity of the wave's trucks, in departure order.
struct Slots {
    order: Vec<TruckId>,
    free:  BTreeMap<TruckId, usize>,
}

impl Slots {
    /// Earliest `available_at` first; ties keep the wave's listed order.
    fn for_wave(ctx: &WaveContext<'_>) -> Self {
        let mut trucks: Vec<_> =
            ctx.wave.trucks.iter().filter_map(|&id| ctx.fleet.get(id)).collect();
        trucks.sort_by_key(|t| t.available_at());
        let mut order = Vec::with_capacity(trucks.len());
        let mut free = BTreeMap::new();
        for t in trucks {
            if free.insert(t.id(), t.free()).is_none() {
                order.push(t.id());
            }
        }
        Self { order, free }
    }

    fn loads(&self, truck: TruckId) -> bool {
        self.free.contains_key(&truck)
    }

    fn free(&self, truck: TruckId) -> usize {
        self.free.get(&truck).copied().unwrap_or(0)
    }

    fn take(&mut self, truck: TruckId, n: usize) {
        if let Some(f) = self.free.get_mut(&truck) {
            *f = f.saturating_sub(n);
        }
    }

    fn first_with_room(&self, n: usize) -> Option<TruckId> {
        self.order.iter().copied().find(|&t| self.free(t) >= n)
    }
}
