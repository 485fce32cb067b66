//! Point-in-time status queries and their printable records.

use std::fmt;

use chrono::NaiveDateTime;

use pd_core::{PackageId, TIMESTAMP_FORMAT, TruckId};
use pd_store::{Deadline, Package, PackageStatus, PackageStore, StatusAt};

use crate::{OutputError, OutputResult};

/// Column header matching [`StatusReport`]'s `Display`.
pub const STATUS_HEADER: &str =
    "ID | Delivery Address | Delivery Deadline | City | Zip Code | Truck Number | Status Change Time | Status";

// ── StatusReport ──────────────────────────────────────────────────────────────

/// One package as it stood at a query time.
///
/// Only the status and truck are point-in-time; address fields are always
/// the package's final ones, after any correction.
#[derive(Clone, Debug, PartialEq)]
pub struct StatusReport {
    pub package:  PackageId,
    pub address:  String,
    pub deadline: Deadline,
    pub city:     String,
    pub zip:      String,
    /// The package's truck, once it had been loaded by the query time.
    pub truck:    Option<TruckId>,
    pub status:   StatusAt,
}

impl StatusReport {
    pub fn new(package: &Package, at: NaiveDateTime) -> Self {
        let status = package.status_as_of(at);
        let loaded = status.status().is_some_and(|s| s != PackageStatus::AtHub);
        Self {
            package:  package.id,
            address:  package.address.clone(),
            deadline: package.deadline,
            city:     package.city.clone(),
            zip:      package.zip.clone(),
            truck:    package.truck().filter(|_| loaded),
            status,
        }
    }
}

impl fmt::Display for StatusReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let StatusAt::Known(event) = self.status else {
            return write!(f, "{}", self.status);
        };
        write!(
            f,
            " {} | {} | {} | {} | {} | ",
            self.package.0, self.address, self.deadline, self.city, self.zip
        )?;
        match self.truck {
            Some(t) => write!(f, "{}", t.0)?,
            None => f.write_str("Not Assigned")?,
        }
        write!(f, " | {} | {} |", event.at.format(TIMESTAMP_FORMAT), event.status)
    }
}

/// Status of package `id` as of `at`.
///
/// # Errors
///
/// [`OutputError::NotFound`] if the store has no such package.
pub fn status_as_of(
    store: &PackageStore,
    id: PackageId,
    at: NaiveDateTime,
) -> OutputResult<StatusReport> {
    let package = store.get(id).ok_or(OutputError::NotFound(id))?;
    Ok(StatusReport::new(package, at))
}

/// Every package as of `at`, in ascending id order.
pub fn list_all(store: &PackageStore, at: NaiveDateTime) -> Vec<StatusReport> {
    store.iter().map(|p| StatusReport::new(p, at)).collect()
}

// ── PackageDetail ─────────────────────────────────────────────────────────────

/// Multi-line description of a package's current state.
pub struct PackageDetail<'a>(pub &'a Package);

impl fmt::Display for PackageDetail<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let p = self.0;
        writeln!(f, "Package ID: {}", p.id.0)?;
        writeln!(f, "Address: {}", p.address)?;
        writeln!(f, "City: {}", p.city)?;
        writeln!(f, "State: {}", p.state)?;
        writeln!(f, "ZIP Code: {}", p.zip)?;
        writeln!(f, "Delivery Deadline: {}", p.deadline)?;
        writeln!(f, "Weight in Kilos: {}", p.weight)?;
        writeln!(f, "Special Notes: {}", p.note)?;
        writeln!(f, "Timestamp: {}", p.timestamp().format(TIMESTAMP_FORMAT))?;
        writeln!(f, "Distance: {:.1}", p.distance())?;
        writeln!(f, "Status: {}", p.status())?;
        match p.truck() {
            Some(t) => write!(f, "Truck Number: {}", t.0),
            None => f.write_str("Truck Number: Not Assigned"),
        }
    }
}
