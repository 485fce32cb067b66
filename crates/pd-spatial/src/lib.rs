//! `pd-spatial` — addresses, distances, and route planning.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                   |
//! |--------------|------------------------------------------------------------|
//! | [`location`] | `LocationIndex` (address ↔ dense `LocationId`)             |
//! | [`matrix`]   | `DistanceMatrix` (symmetric by convention, gaps allowed)   |
//! | [`planner`]  | `RoutePlanner` trait, `Route`, `NearestNeighborPlanner`    |
//! | [`loader`]   | `load_addresses_reader`, `load_distances_reader`           |
//! | [`error`]    | `SpatialError`, `SpatialResult<T>`                         |
//!
//! # Feature flags
//!
//! | Flag      | Effect                                                     |
//! |-----------|------------------------------------------------------------|
//! | `fx-hash` | FxHash for the address map instead of SipHash.             |
//! | `serde`   | Derives `Serialize`/`Deserialize` on public types.         |

pub mod error;
pub mod loader;
pub mod location;
pub mod matrix;
pub mod planner;


pub use error::{SpatialError, SpatialResult};
pub use loader::{load_addresses_csv, load_addresses_reader, load_distances_csv, load_distances_reader};
pub use location::LocationIndex;
pub use matrix::DistanceMatrix;
pub use planner::{NearestNeighborPlanner, Route, RoutePlanner, plan_route};
