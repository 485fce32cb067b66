//! The `OutputWriter` trait implemented by backend writers.

use crate::{OutputResult, PackageSnapshotRow, TruckRunRow};

/// Trait implemented by output backends.
///
/// All methods are infallible from the observer's perspective: errors are
/// stored internally and retrieved with
/// [`SimOutputObserver::take_error`](crate::SimOutputObserver::take_error).
pub trait OutputWriter {
    /// Write a batch of package rows.
    fn write_packages(&mut self, rows: &[PackageSnapshotRow]) -> OutputResult<()>;

    /// Write one truck-run row.
    fn write_truck_run(&mut self, row: &TruckRunRow) -> OutputResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}
