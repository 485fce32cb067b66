//! CSV package-manifest loader.
//!
//! # CSV format
//!
//! Headerless, one package per row:
//!
//! ```csv
//! 1,195 W Oakland Ave,Salt Lake City,UT,84115,10:30 AM,21,
//! 6,3060 Lester St,West Valley City,UT,84119,10:30 AM,88,Delayed on flight---will not arrive to depot until 9:05 am
//! 14,4300 S 1300 E,Millcreek,UT,84117,10:30 AM,88,"Must be delivered with 15, 19"
//! ```
//!
//! Columns: `id, address, city, state, zip, deadline, weight, note`.  The
//! note column may be omitted.
//!
//! Address corrections use the same conventions:
//!
//! ```csv
//! 9,410 S State St,Salt Lake City,UT,84111,10:20 AM
//! ```
//!
//! Columns: `package, address, city, state, zip, effective_at`, the last one
//! optional.

use std::io::Read;
use std::path::Path;

use csv::ReaderBuilder;

use crate::{AddressCorrection, CorrectionRecord, PackageRecord, StoreError, StoreResult};

/// Load manifest rows from a CSV file.
pub fn load_packages_csv(path: &Path) -> StoreResult<Vec<PackageRecord>> {
    let file = std::fs::File::open(path)?;
    load_packages_reader(file)
}

/// Like [`load_packages_csv`] but accepts any `Read` source.
///
/// Useful for testing (pass a `std::io::Cursor`) or for embedded data.
pub fn load_packages_reader<R: Read>(reader: R) -> StoreResult<Vec<PackageRecord>> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    csv_reader
        .deserialize::<PackageRecord>()
        .map(|row| row.map_err(|e| StoreError::Parse(e.to_string())))
        .collect()
}

/// Load address corrections from a CSV file.
pub fn load_corrections_csv(path: &Path) -> StoreResult<Vec<AddressCorrection>> {
    let file = std::fs::File::open(path)?;
    load_corrections_reader(file)
}

/// Like [`load_corrections_csv`] but accepts any `Read` source.
pub fn load_corrections_reader<R: Read>(reader: R) -> StoreResult<Vec<AddressCorrection>> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    csv_reader
        .deserialize::<CorrectionRecord>()
        .map(|row| {
            row.map_err(|e| StoreError::Parse(e.to_string()))
                .and_then(CorrectionRecord::into_correction)
        })
        .collect()
}
