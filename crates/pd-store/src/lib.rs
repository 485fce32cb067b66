//! `pd-store` — package records, status history, and CSV loading.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                  |
//! |----------------|-----------------------------------------------------------|
//! | [`package`]    | `Package`, `PackageRecord`, `Deadline`                    |
//! | [`history`]    | `PackageStatus`, `StatusEvent`, `StatusHistory`, `StatusAt` |
//! | [`note`]       | `Constraint`, `parse_note`                                |
//! | [`correction`] | `AddressCorrection`, `CorrectionRecord`                   |
//! | [`store`]      | `PackageStore` (`BTreeMap<PackageId, Package>`)           |
//! | [`loader`]     | package and correction CSV loaders                        |
//! | [`error`]      | `StoreError`, `StoreResult<T>`                            |
//!
//! # History model (summary)
//!
//! Every package carries an append-only log of `(status, timestamp)` events
//! seeded with `(AtHub, day_start)`.  The package's current status is always
//! the last event, and a point-in-time query is answered by scanning the log
//! backwards:
//!
//! ```text
//! status_as_of(t) = newest event with event.at ≤ t, else "not available at t"
//! ```

pub mod correction;
pub mod error;
pub mod history;
pub mod loader;
pub mod note;
pub mod package;
pub mod store;


pub use correction::{AddressCorrection, CorrectionRecord};
pub use error::{StoreError, StoreResult};
pub use history::{PackageStatus, StatusAt, StatusEvent, StatusHistory};
pub use loader::{
    load_corrections_csv, load_corrections_reader, load_packages_csv, load_packages_reader,
};
pub use note::{Constraint, parse_note};
pub use package::{Deadline, Package, PackageRecord};
pub use store::PackageStore;
