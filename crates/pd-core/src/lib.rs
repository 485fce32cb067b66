//! `pd-core` — foundational types for the `parcel_dt` delivery engine.
//!
//! This crate is a dependency of every other `pd-*` crate.  It intentionally
//! has no `pd-*` dependencies and minimal external ones (only `chrono` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `PackageId`, `LocationId`, `TruckId`                  |
//! | [`time`]        | `SimClock`, time-of-day parsing                       |
//! | [`config`]      | `DayConfig`                                           |
//! | [`error`]       | `CoreError`, `CoreResult`                             |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod config;
pub mod error;
pub mod ids;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::DayConfig;
pub use error::{CoreError, CoreResult};
pub use ids::{LocationId, PackageId, TruckId};
pub use time::{SimClock, TIMESTAMP_FORMAT, parse_time_of_day};

/// Timestamp type used throughout the workspace.
pub type Timestamp = chrono::NaiveDateTime;
