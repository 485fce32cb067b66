//! `SimOutputObserver<W>` — bridges `SimObserver` to an `OutputWriter`.

use pd_sim::{DayOutcome, SimObserver, TruckRun};

use crate::row::{PackageSnapshotRow, TruckRunRow};
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// A [`SimObserver`] that writes truck runs as they finish and every
/// package's final state at day end to any [`OutputWriter`] backend.
///
/// Errors from the writer are stored internally because `SimObserver` methods
/// have no return value.  After `sim.run()` returns, check for errors with
/// [`take_error`][Self::take_error].
pub struct SimOutputObserver<W: OutputWriter> {
    writer:     W,
    last_error: Option<OutputError>,
}

impl<W: OutputWriter> SimOutputObserver<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, last_error: None }
    }

    /// Take the stored write error (if any) after `sim.run()` returns.
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Unwrap the inner writer (e.g. to inspect files after the sim).
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: OutputWriter> SimObserver for SimOutputObserver<W> {
    fn on_truck_run(&mut self, run: &TruckRun) {
        let result = self.writer.write_truck_run(&TruckRunRow::from(run));
        self.store_err(result);
    }

    fn on_day_end(&mut self, outcome: &DayOutcome) {
        let rows: Vec<PackageSnapshotRow> =
            outcome.packages.iter().map(PackageSnapshotRow::from_package).collect();
        if !rows.is_empty() {
            let result = self.writer.write_packages(&rows);
            self.store_err(result);
        }
        let result = self.writer.finish();
        self.store_err(result);
    }
}
