//! The `Sim` struct and its day loop.

use chrono::NaiveDateTime;
use tracing::{debug, info, warn};

use pd_core::{DayConfig, LocationId, PackageId, SimClock, TruckId};
use pd_dispatch::{
    AssignmentPolicy, Fleet, RulePolicy, ShipGroups, Wave, WaveContext, WaveSchedule, apply_plan,
};
use pd_spatial::{DistanceMatrix, LocationIndex, NearestNeighborPlanner, Route, RoutePlanner};
use pd_store::{AddressCorrection, PackageRecord, PackageStatus, PackageStore};

use crate::{
    NoopObserver, SimBuilder, SimError, SimObserver, SimResult, TruckRun, execute_route,
    route_targets,
};

// ── DayOutcome ────────────────────────────────────────────────────────────────

/// Everything the day produced.
#[derive(Clone, Debug)]
pub struct DayOutcome {
    /// Sum of all truck runs, return legs included.
    pub total_distance: f64,
    /// Final state of every package, with full status histories.
    pub packages: PackageStore,
    /// Packages that never left the hub.
    pub unresolved: Vec<PackageId>,
    /// Every truck run in the order it happened.
    pub truck_runs: Vec<TruckRun>,
}

impl DayOutcome {
    /// `Err(UnassignedAtEndOfDay)` unless every package left the hub.
    pub fn ensure_complete(&self) -> SimResult<()> {
        if self.unresolved.is_empty() {
            Ok(())
        } else {
            Err(SimError::UnassignedAtEndOfDay(self.unresolved.clone()))
        }
    }

    /// Delivered packages that missed their deadline.
    pub fn late(&self) -> Vec<PackageId> {
        self.packages.iter().filter(|p| p.on_time() == Some(false)).map(|p| p.id).collect()
    }

    /// Time of the day's last delivery, if anything was delivered.
    pub fn last_delivery(&self) -> Option<NaiveDateTime> {
        self.truck_runs.iter().filter(|r| !r.delivered.is_empty()).map(|r| r.finished).max()
    }

    /// Distance driven by `truck` over all its runs.
    pub fn truck_distance(&self, truck: TruckId) -> f64 {
        self.truck_runs.iter().filter(|r| r.truck == truck).map(|r| r.distance).sum()
    }
}

// ── Sim ───────────────────────────────────────────────────────────────────────

/// The delivery-day runner.
///
/// `Sim<P, R>` owns all state of the day and drives the wave loop described
/// in the crate docs.  Create via [`SimBuilder`].
pub struct Sim<P: AssignmentPolicy = RulePolicy, R: RoutePlanner = NearestNeighborPlanner> {
    pub config: DayConfig,

    /// Distance ↔ time conversion for the day.
    pub clock: SimClock,

    /// Every package, keyed by id.
    pub store: PackageStore,

    /// Address → matrix index.
    pub locations: LocationIndex,

    pub distances: DistanceMatrix,

    pub fleet: Fleet,

    pub schedule: WaveSchedule,

    /// Pending and applied address corrections.
    pub corrections: Vec<AddressCorrection>,

    /// Ship-with groups, computed once from the manifest.
    pub groups: ShipGroups,

    pub policy: P,

    pub planner: R,

    pub(crate) runs: Vec<TruckRun>,
    pub(crate) finished: bool,
}

impl<P: AssignmentPolicy, R: RoutePlanner> Sim<P, R> {
    // ── Public API ────────────────────────────────────────────────────────

    /// Run every wave of the schedule and return the day's outcome.
    ///
    /// Packages still at the hub afterwards are listed in
    /// [`DayOutcome::unresolved`]; call [`DayOutcome::ensure_complete`] to
    /// turn that into an error.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<DayOutcome> {
        if self.finished {
            return Err(SimError::AlreadyRun);
        }
        info!(clock = %self.clock, packages = self.store.len(), waves = self.schedule.len(), "day start");

        let waves: Vec<Wave> = self.schedule.iter().cloned().collect();
        for wave in &waves {
            self.run_wave(wave, observer)?;
        }
        self.finished = true;

        let outcome = self.outcome();
        for id in &outcome.unresolved {
            warn!(package = %id, "still at the hub at end of day");
        }
        info!(
            total_distance = outcome.total_distance,
            delivered = outcome.packages.iter().filter(|p| p.status() == PackageStatus::Delivered).count(),
            unresolved = outcome.unresolved.len(),
            "day end"
        );
        observer.on_day_end(&outcome);
        Ok(outcome)
    }

    /// Truck runs completed so far.
    pub fn runs(&self) -> &[TruckRun] {
        &self.runs
    }

    /// Snapshot of the current state as a [`DayOutcome`].
    pub fn outcome(&self) -> DayOutcome {
        DayOutcome {
            total_distance: self.fleet.total_distance(),
            packages:       self.store.clone(),
            unresolved:     self.store.unassigned().map(|p| p.id).collect(),
            truck_runs:     self.runs.clone(),
        }
    }

    // ── Wave processing ───────────────────────────────────────────────────

    fn run_wave<O: SimObserver>(&mut self, wave: &Wave, observer: &mut O) -> SimResult<()> {
        let at = wave.nominal_time(self.clock.date(), &self.fleet)?;
        observer.on_wave_start(wave, at);

        // ── Corrections unlocked by now ───────────────────────────────────
        let applied = self.store.apply_corrections(&self.corrections, at)?;
        for id in &applied {
            info!(package = %id, %at, "address corrected");
        }
        if !applied.is_empty() {
            observer.on_corrections(&applied, at);
        }

        // ── Assignment ────────────────────────────────────────────────────
        let plan = {
            let ctx = WaveContext {
                store:  &self.store,
                fleet:  &self.fleet,
                groups: &self.groups,
                wave,
                at,
            };
            self.policy.plan(&ctx)
        };
        apply_plan(&plan, &mut self.store, &mut self.fleet, &self.groups)?;
        for (id, why) in &plan.deferred {
            debug!(wave = %wave.label, package = %id, reason = %why, "deferred");
        }
        info!(
            wave = %wave.label,
            %at,
            loaded = plan.assignments.len(),
            deferred = plan.deferred.len(),
            "wave planned"
        );
        observer.on_plan(wave, &plan);

        // ── Routes, then deliveries in ascending truck order ──────────────
        let mut trucks = wave.trucks.clone();
        trucks.sort_unstable();
        trucks.dedup();
        let routes = self.plan_routes(&trucks)?;

        for (id, route) in routes {
            let truck = self.fleet.truck_mut(id)?;
            let (distance, finished, delivered) =
                execute_route(&route, truck, &mut self.store, &self.locations, &self.clock, at)?;
            let run = TruckRun {
                truck: id,
                wave: wave.label.clone(),
                departed: at,
                finished,
                stops: route.len() - 1,
                delivered,
                distance,
                gaps: route.gaps(),
            };
            info!(
                truck = %id,
                stops = run.stops,
                delivered = run.delivered.len(),
                distance = run.distance,
                %finished,
                "run complete"
            );
            observer.on_truck_run(&run);
            self.runs.push(run);
        }
        Ok(())
    }

    /// One route per truck that has packages aboard, in the given order.
    fn plan_routes(&self, trucks: &[TruckId]) -> SimResult<Vec<(TruckId, Route)>> {
        let mut jobs = Vec::with_capacity(trucks.len());
        for &id in trucks {
            let truck = self.fleet.truck(id)?;
            if !truck.is_empty() {
                jobs.push((id, route_targets(truck, &self.store, &self.locations)?));
            }
        }

        let planner = &self.planner;
        let distances = &self.distances;

        #[cfg(not(feature = "parallel"))]
        let routes: Vec<(TruckId, Route)> = jobs
            .into_iter()
            .map(|(id, targets)| (id, planner.plan(distances, LocationId::HUB, &targets)))
            .collect();

        #[cfg(feature = "parallel")]
        let routes: Vec<(TruckId, Route)> = {
            use rayon::prelude::*;
            jobs.into_par_iter()
                .map(|(id, targets)| (id, planner.plan(distances, LocationId::HUB, &targets)))
                .collect()
        };

        Ok(routes)
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

/// Build and run a day with the default policy and planner.
///
/// `schedule: None` uses [`WaveSchedule::default_for`].  The returned outcome
/// may still list unresolved packages; see [`DayOutcome::ensure_complete`].
pub fn run_daily_simulation(
    config: DayConfig,
    packages: Vec<PackageRecord>,
    locations: LocationIndex,
    distances: DistanceMatrix,
    schedule: Option<WaveSchedule>,
    corrections: Vec<AddressCorrection>,
) -> SimResult<DayOutcome> {
    let mut builder = SimBuilder::new(config, packages, locations, distances).corrections(corrections);
    if let Some(s) = schedule {
        builder = builder.schedule(s);
    }
    builder.build()?.run(&mut NoopObserver)
}
