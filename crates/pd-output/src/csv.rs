//! CSV output backend.
//!
//! Creates two files in the configured output directory:
//! - `package_status.csv`
//! - `truck_runs.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use pd_core::TIMESTAMP_FORMAT;

use crate::writer::OutputWriter;
use crate::{OutputResult, PackageSnapshotRow, TruckRunRow};

/// Writes simulation output to two CSV files.
pub struct CsvWriter {
    packages: Writer<File>,
    runs:     Writer<File>,
    finished: bool,
}

impl CsvWriter {
    /// Open (or create) the two CSV files in `dir` and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut packages = Writer::from_path(dir.join("package_status.csv"))?;
        packages.write_record([
            "package_id", "address", "city", "zip", "deadline", "truck", "status", "status_time",
            "distance", "on_time",
        ])?;

        let mut runs = Writer::from_path(dir.join("truck_runs.csv"))?;
        runs.write_record([
            "truck", "wave", "departed", "finished", "stops", "delivered", "distance", "gaps",
        ])?;

        Ok(Self { packages, runs, finished: false })
    }
}

fn opt<T: ToString>(v: Option<T>) -> String {
    v.map(|v| v.to_string()).unwrap_or_default()
}

impl OutputWriter for CsvWriter {
    fn write_packages(&mut self, rows: &[PackageSnapshotRow]) -> OutputResult<()> {
        for row in rows {
            self.packages.write_record(&[
                row.package_id.to_string(),
                row.address.clone(),
                row.city.clone(),
                row.zip.clone(),
                row.deadline.clone(),
                opt(row.truck),
                row.status.clone(),
                opt(row.status_time.map(|t| t.format(TIMESTAMP_FORMAT))),
                format!("{:.1}", row.distance),
                opt(row.on_time.map(u8::from)),
            ])?;
        }
        Ok(())
    }

    fn write_truck_run(&mut self, row: &TruckRunRow) -> OutputResult<()> {
        self.runs.write_record(&[
            row.truck.to_string(),
            row.wave.clone(),
            row.departed.format(TIMESTAMP_FORMAT).to_string(),
            row.finished.format(TIMESTAMP_FORMAT).to_string(),
            row.stops.to_string(),
            row.delivered.to_string(),
            format!("{:.1}", row.distance),
            row.gaps.to_string(),
        ])?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.packages.flush()?;
        self.runs.flush()?;
        Ok(())
    }
}
