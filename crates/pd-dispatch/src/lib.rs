//! `pd-dispatch` — trucks, load waves, and package assignment.
//!
//! # Crate layout
//!
//! | Module     | Contents                                                    |
//! |------------|-------------------------------------------------------------|
//! | [`truck`]  | `Truck`, `Fleet`                                            |
//! | [`wave`]   | `Wave`, `WaveSchedule`                                      |
//! | [`groups`] | `ShipGroups` (transitive ship-with closure)                 |
//! | [`plan`]   | `WavePlan`, `Assignment`, `Deferral`, `check_placement`, `apply_plan` |
//! | [`policy`] | `AssignmentPolicy` trait, `WaveContext`, `RulePolicy`       |
//! | [`error`]  | `DispatchError`, `DispatchResult<T>`                        |
//!
//! # Wave model (summary)
//!
//! The day is a fixed sequence of waves.  Each wave names the trucks that
//! load in it; its nominal time is
//!
//! ```text
//! wave_time = max(wave.not_before, available_at of every truck in the wave)
//! ```
//!
//! Planning is pure (`policy.plan(&ctx) -> WavePlan`).  Applying the plan is
//! the only step that touches the store and the truck queues.  Packages the
//! plan could not place are returned as data (`WavePlan::deferred`) and are
//! seen again by the next wave.

pub mod error;
pub mod groups;
pub mod plan;
pub mod policy;
pub mod truck;
pub mod wave;

#[cfg(test)]
mod tests;

pub use error::{DispatchError, DispatchResult};
pub use groups::ShipGroups;
pub use plan::{Assignment, Deferral, WavePlan, apply_plan, check_placement};
pub use policy::{AssignmentPolicy, RulePolicy, WaveContext};
pub use truck::{Fleet, Truck};
pub use wave::{Wave, WaveSchedule};
