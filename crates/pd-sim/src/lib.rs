//! `pd-sim` — day loop orchestrator for the parcel_dt engine.
//!
//! # Day loop
//!
//! ```text
//! for wave in schedule:
//!   ① Time        — wave_time = max(wave.not_before, trucks' available_at)
//!   ② Corrections — apply every address correction unlocked by wave_time.
//!   ③ Assign      — policy.plan(ctx) → WavePlan; apply_plan loads trucks
//!                   and moves packages AtHub → InRoute at wave_time.
//!   ④ Routes      — plan one route per loaded truck
//!                   (parallel with the `parallel` feature).
//!   ⑤ Deliver     — in ascending truck order, walk each route, mark
//!                   packages Delivered, add the return leg, and move the
//!                   truck's available_at to its last delivery.
//! end of day: packages still at the hub are reported, never dropped.
//! ```
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                 |
//! |------------|--------------------------------------------------------|
//! | `parallel` | Runs route planning (④) on Rayon's thread pool.        |
//! | `serde`    | Derives `Serialize`/`Deserialize` on run summaries.    |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use pd_core::DayConfig;
//! use pd_sim::{NoopObserver, SimBuilder};
//!
//! let mut sim = SimBuilder::new(DayConfig::default(), records, locations, distances)
//!     .corrections(corrections)
//!     .build()?;
//! let outcome = sim.run(&mut NoopObserver)?;
//! println!("{:.1} miles", outcome.total_distance);
//! ```

pub mod builder;
pub mod delivery;
pub mod error;
pub mod observer;
pub mod sim;


pub use builder::SimBuilder;
pub use delivery::{TruckRun, execute_route, route_targets};
pub use error::{SimError, SimResult};
pub use observer::{NoopObserver, SimObserver};
pub use sim::{DayOutcome, Sim, run_daily_simulation};
