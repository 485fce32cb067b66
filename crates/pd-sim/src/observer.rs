//! Simulation observer trait for progress reporting and data collection.

use chrono::NaiveDateTime;

use pd_core::PackageId;
use pd_dispatch::{Wave, WavePlan};

use crate::{DayOutcome, TruckRun};

/// Callbacks invoked by [`Sim::run`][crate::Sim::run] at key points of the
/// day.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
///
/// # Example: deferral printer
///
/// ```rust,ignore
/// struct Deferrals;
///
/// impl SimObserver for Deferrals {
///     fn on_plan(&mut self, wave: &Wave, plan: &WavePlan) {
///         for (id, why) in &plan.deferred {
///             println!("{}: {id} waits ({why})", wave.label);
///         }
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called when a wave starts, with its nominal time.
    fn on_wave_start(&mut self, _wave: &Wave, _at: NaiveDateTime) {}

    /// Called after address corrections were applied at `at`.  Not called
    /// when nothing changed.
    fn on_corrections(&mut self, _applied: &[PackageId], _at: NaiveDateTime) {}

    /// Called with the policy's plan, after it was applied.
    fn on_plan(&mut self, _wave: &Wave, _plan: &WavePlan) {}

    /// Called after each truck finishes a run.
    fn on_truck_run(&mut self, _run: &TruckRun) {}

    /// Called once after the final wave.
    fn on_day_end(&mut self, _outcome: &DayOutcome) {}
}

/// A [`SimObserver`] that does nothing.  Use when you need to call `run` but
/// don't want callbacks.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
