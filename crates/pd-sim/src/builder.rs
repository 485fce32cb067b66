//! Fluent builder for constructing a [`Sim`].

use pd_core::{DayConfig, LocationId};
use pd_dispatch::{AssignmentPolicy, DispatchError, Fleet, RulePolicy, ShipGroups, WaveSchedule};
use pd_spatial::{DistanceMatrix, LocationIndex, NearestNeighborPlanner, RoutePlanner, SpatialError};
use pd_store::{AddressCorrection, PackageRecord, PackageStore, StoreError};

use crate::{Sim, SimError, SimResult};

/// Fluent builder for [`Sim<P, R>`].
///
/// # Required inputs
///
/// - [`DayConfig`]
/// - manifest rows ([`PackageRecord`])
/// - [`LocationIndex`] and [`DistanceMatrix`] in the same index order
///
/// # Optional inputs (have defaults)
///
/// | Method              | Default                                  |
/// |---------------------|------------------------------------------|
/// | `.schedule(s)`      | `WaveSchedule::default_for(&config)`     |
/// | `.corrections(v)`   | none                                     |
/// | `.policy(p)`        | `RulePolicy::from_config(&config)`       |
/// | `.planner(r)`       | `NearestNeighborPlanner`                 |
///
/// # Example
///
/// ```rust,ignore
/// let mut sim = SimBuilder::new(config, records, locations, distances)
///     .schedule(schedule)
///     .corrections(corrections)
///     .build()?;
/// let outcome = sim.run(&mut NoopObserver)?;
/// ```
pub struct SimBuilder<P: AssignmentPolicy = RulePolicy, R: RoutePlanner = NearestNeighborPlanner> {
    config:      DayConfig,
    records:     Vec<PackageRecord>,
    locations:   LocationIndex,
    distances:   DistanceMatrix,
    schedule:    Option<WaveSchedule>,
    corrections: Vec<AddressCorrection>,
    policy:      P,
    planner:     R,
}

impl SimBuilder {
    /// Create a builder with all required inputs.
    pub fn new(
        config:    DayConfig,
        records:   Vec<PackageRecord>,
        locations: LocationIndex,
        distances: DistanceMatrix,
    ) -> Self {
        Self {
            policy:      RulePolicy::from_config(&config),
            config,
            records,
            locations,
            distances,
            schedule:    None,
            corrections: Vec::new(),
            planner:     NearestNeighborPlanner,
        }
    }
}

impl<P: AssignmentPolicy, R: RoutePlanner> SimBuilder<P, R> {
    /// Replace the default wave schedule.
    pub fn schedule(mut self, schedule: WaveSchedule) -> Self {
        self.schedule = Some(schedule);
        self
    }

    /// Address corrections; each must target a package whose note flags a
    /// wrong address.
    pub fn corrections(mut self, corrections: Vec<AddressCorrection>) -> Self {
        self.corrections = corrections;
        self
    }

    /// Swap in a different assignment policy.
    pub fn policy<Q: AssignmentPolicy>(self, policy: Q) -> SimBuilder<Q, R> {
        SimBuilder {
            config:      self.config,
            records:     self.records,
            locations:   self.locations,
            distances:   self.distances,
            schedule:    self.schedule,
            corrections: self.corrections,
            policy,
            planner:     self.planner,
        }
    }

    /// Swap in a different route planner.
    pub fn planner<S: RoutePlanner>(self, planner: S) -> SimBuilder<P, S> {
        SimBuilder {
            config:      self.config,
            records:     self.records,
            locations:   self.locations,
            distances:   self.distances,
            schedule:    self.schedule,
            corrections: self.corrections,
            policy:      self.policy,
            planner,
        }
    }

    /// Validate inputs, build the store, fleet and groups, and return a
    /// ready-to-run [`Sim`].
    ///
    /// # Errors
    ///
    /// - invalid config, or a matrix smaller than the location index;
    /// - a package address (or, for wrong-address packages, the corrected
    ///   address) missing from the location index;
    /// - a location with no known distance to the hub (return legs need it);
    /// - a correction for an unknown or unflagged package;
    /// - a note pinning a package to a truck outside the fleet;
    /// - a wave that loads no trucks or an unknown truck.
    pub fn build(self) -> SimResult<Sim<P, R>> {
        self.config.validate()?;

        // ── Spatial inputs ────────────────────────────────────────────────
        if self.distances.size() < self.locations.len() {
            return Err(SimError::Config(format!(
                "distance matrix covers {} locations but {} addresses are indexed",
                self.distances.size(),
                self.locations.len()
            )));
        }
        if let Some(&to) = self.distances.hub_gaps(self.locations.len()).first() {
            return Err(SpatialError::MatrixGap { from: LocationId::HUB, to }.into());
        }

        // ── Packages ──────────────────────────────────────────────────────
        let store = PackageStore::from_records(self.records, self.config.day_start)?;
        let fleet = Fleet::new(self.config.truck_count, self.config.truck_capacity, self.config.day_start);
        for package in store.iter() {
            // A flagged address is replaced before loading; its correction
            // is checked below instead.
            if package.wrong_address().is_none() {
                self.locations.lookup(&package.address)?;
            }
            if let Some(t) = package.required_truck() {
                fleet.get(t).ok_or(DispatchError::UnknownTruck(t))?;
            }
        }

        for c in &self.corrections {
            let package = store.lookup(c.package)?;
            if package.wrong_address().is_none() {
                return Err(StoreError::UnflaggedCorrection(c.package).into());
            }
            self.locations.lookup(&c.address)?;
        }

        // ── Schedule ──────────────────────────────────────────────────────
        let schedule = self.schedule.unwrap_or_else(|| WaveSchedule::default_for(&self.config));
        schedule.validate(&fleet)?;

        let groups = ShipGroups::build(&store);

        Ok(Sim {
            clock:       self.config.make_clock(),
            config:      self.config,
            store,
            locations:   self.locations,
            distances:   self.distances,
            fleet,
            schedule,
            corrections: self.corrections,
            groups,
            policy:      self.policy,
            planner:     self.planner,
            runs:        Vec::new(),
            finished:    false,
        })
    }
}
