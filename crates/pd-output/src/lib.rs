//! `pd-output` — status queries and output writers for the parcel_dt engine.
//!
//! | Module       | Contents                                                  |
//! |--------------|-----------------------------------------------------------|
//! | [`query`]    | `status_as_of`, `list_all`, `StatusReport`, `PackageDetail` |
//! | [`row`]      | `PackageSnapshotRow`, `TruckRunRow`                       |
//! | [`writer`]   | `OutputWriter` trait                                      |
//! | [`csv`]      | `CsvWriter` (`package_status.csv`, `truck_runs.csv`)      |
//! | [`observer`] | `SimOutputObserver` (implements `pd_sim::SimObserver`)    |
//! | [`error`]    | `OutputError`, `OutputResult<T>`                          |
//!
//! # Usage
//!
//! ```rust,ignore
//! use pd_output::{CsvWriter, SimOutputObserver, list_all};
//!
//! let writer = CsvWriter::new(Path::new("./output"))?;
//! let mut obs = SimOutputObserver::new(writer);
//! let outcome = sim.run(&mut obs)?;
//! obs.take_error().map(|e| eprintln!("output error: {e}"));
//!
//! for report in list_all(&outcome.packages, at) {
//!     println!("{report}");
//! }
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod query;
pub mod row;
pub mod writer;

#[cfg(test)]
mod tests;

pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use observer::SimOutputObserver;
pub use query::{PackageDetail, STATUS_HEADER, StatusReport, list_all, status_as_of};
pub use row::{PackageSnapshotRow, TruckRunRow};
pub use writer::OutputWriter;
