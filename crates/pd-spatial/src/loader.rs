//! CSV loaders for the address table and the distance table.
//!
//! # Address CSV
//!
//! Headerless; one address per row in the first column.  Row order defines
//! the `LocationId`s, so the first row must be the hub.
//!
//! ```csv
//! 4001 South 700 East
//! 1060 Dalton Ave S
//! 1330 2100 S
//! ```
//!
//! # Distance CSV
//!
//! Headerless, lower-triangular, one row per address in the same order.
//! Blank cells mean "unknown distance".
//!
//! ```csv
//! 0.0,,
//! 7.2,0.0,
//! 3.8,7.1,0.0
//! ```

use std::io::Read;
use std::path::Path;

use csv::ReaderBuilder;

use crate::{DistanceMatrix, LocationIndex, SpatialError, SpatialResult};

// ── Public API ────────────────────────────────────────────────────────────────

/// Load the address table from a CSV file.
pub fn load_addresses_csv(path: &Path) -> SpatialResult<LocationIndex> {
    let file = std::fs::File::open(path)?;
    load_addresses_reader(file)
}

/// Like [`load_addresses_csv`] but accepts any `Read` source.
///
/// # Errors
///
/// [`SpatialError::DuplicateAddress`] if an address appears twice, since a
/// repeated row would shift every later index out of step with the distance
/// table.
pub fn load_addresses_reader<R: Read>(reader: R) -> SpatialResult<LocationIndex> {
    let mut csv_reader = headerless(reader);
    let mut index = LocationIndex::new();

    for (line, result) in csv_reader.records().enumerate() {
        let record = result.map_err(|e| SpatialError::Parse(e.to_string()))?;
        let Some(address) = record.get(0).map(str::trim).filter(|a| !a.is_empty()) else {
            continue;
        };
        if index.contains(address) {
            return Err(SpatialError::DuplicateAddress {
                address: address.to_string(),
                line:    line + 1,
            });
        }
        index.register(address);
    }

    Ok(index)
}

/// Load the distance table from a CSV file.
pub fn load_distances_csv(path: &Path) -> SpatialResult<DistanceMatrix> {
    let file = std::fs::File::open(path)?;
    load_distances_reader(file)
}

/// Like [`load_distances_csv`] but accepts any `Read` source.
pub fn load_distances_reader<R: Read>(reader: R) -> SpatialResult<DistanceMatrix> {
    let mut csv_reader = headerless(reader);
    let mut rows: Vec<Vec<Option<f64>>> = Vec::new();

    for (line, result) in csv_reader.records().enumerate() {
        let record = result.map_err(|e| SpatialError::Parse(e.to_string()))?;
        let row = record
            .iter()
            .map(|cell| parse_cell(cell, line + 1))
            .collect::<SpatialResult<Vec<_>>>()?;
        rows.push(row);
    }

    DistanceMatrix::from_rows(rows)
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn headerless<R: Read>(reader: R) -> csv::Reader<R> {
    ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader)
}

fn parse_cell(cell: &str, line: usize) -> SpatialResult<Option<f64>> {
    let cell = cell.trim();
    if cell.is_empty() {
        return Ok(None);
    }
    cell.parse::<f64>().map(Some).map_err(|_| {
        SpatialError::Parse(format!("line {line}: invalid distance {cell:?}"))
    })
}
