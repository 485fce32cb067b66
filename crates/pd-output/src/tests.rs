//! Unit and integration tests for pd-output.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use pd_core::{PackageId, TruckId};
use pd_store::{PackageRecord, PackageStore};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2023, 10, 24).unwrap().and_hms_opt(h, m, s).unwrap()
}

fn rec(id: u32, address: &str, deadline: &str) -> PackageRecord {
    PackageRecord {
        id,
        address:  address.into(),
        city:     "Salt Lake City".into(),
        state:    "UT".into(),
        zip:      "84115".into(),
        deadline: deadline.into(),
        weight:   21.0,
        note:     String::new(),
    }
}

/// Package 1 loaded at 08:00 on truck 1 and delivered at 08:06:40 after
/// 2.0 units; package 2 still at the hub.
fn store() -> PackageStore {
    let mut store = PackageStore::from_records(
        vec![rec(2, "2 B St", "EOD"), rec(1, "1 A St", "10:30 AM")],
        at(8, 0, 0),
    )
    .unwrap();
    let p1 = store.lookup_mut(PackageId(1)).unwrap();
    p1.assign(TruckId(1), at(8, 0, 0)).unwrap();
    p1.deliver(at(8, 6, 40), 2.0).unwrap();
    store
}

// ── Queries ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod query_tests {
    use pd_core::PackageId;

    use super::{at, store};
    use crate::{OutputError, PackageDetail, list_all, status_as_of};

    #[test]
    fn formatted_record_for_delivered_package() {
        let report = status_as_of(&store(), PackageId(1), at(9, 0, 0)).unwrap();
        assert_eq!(
            report.to_string(),
            " 1 | 1 A St | 10:30 AM | Salt Lake City | 84115 | 1 | 2023-10-24 08:06:40 | Delivered |"
        );
    }

    #[test]
    fn truck_hidden_before_loading() {
        let report = status_as_of(&store(), PackageId(2), at(9, 0, 0)).unwrap();
        assert_eq!(
            report.to_string(),
            " 2 | 2 B St | EOD | Salt Lake City | 84115 | Not Assigned | 2023-10-24 08:00:00 | At Hub |"
        );
    }

    #[test]
    fn before_day_start_is_sentinel() {
        let report = status_as_of(&store(), PackageId(1), at(7, 0, 0)).unwrap();
        assert_eq!(report.to_string(), "Status not available at 2023-10-24 07:00:00");
    }

    #[test]
    fn repeated_queries_give_same_record_and_keep_store() {
        let s = store();
        let before = s.clone();
        for t in [at(7, 0, 0), at(8, 0, 0), at(8, 6, 40), at(12, 0, 0)] {
            for id in [PackageId(1), PackageId(2)] {
                let first = status_as_of(&s, id, t).unwrap();
                let second = status_as_of(&s, id, t).unwrap();
                assert_eq!(first, second);
                assert_eq!(first.to_string(), second.to_string());
            }
        }
        for (now, then) in s.iter().zip(before.iter()) {
            assert_eq!(now.history(), then.history());
            assert_eq!(now.status(), then.status());
            assert_eq!(now.timestamp(), then.timestamp());
        }
        assert_eq!(s.get(PackageId(1)).unwrap().history().len(), 3);
    }

    #[test]
    fn missing_package_is_not_found() {
        let err = status_as_of(&store(), PackageId(99), at(9, 0, 0)).unwrap_err();
        assert!(matches!(err, OutputError::NotFound(PackageId(99))));
    }

    #[test]
    fn list_all_is_sorted_by_id() {
        let ids: Vec<u32> = list_all(&store(), at(12, 0, 0)).iter().map(|r| r.package.0).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn detail_lists_every_field() {
        let s = store();
        let text = PackageDetail(s.get(PackageId(2)).unwrap()).to_string();
        assert!(text.starts_with("Package ID: 2\nAddress: 2 B St\n"));
        assert!(text.contains("Weight in Kilos: 21\n"));
        assert!(text.ends_with("Status: At Hub\nTruck Number: Not Assigned"));
    }
}

// ── Rows ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod row_tests {
    use pd_core::PackageId;

    use super::{at, store};
    use crate::PackageSnapshotRow;

    #[test]
    fn final_row_carries_distance_and_deadline_flag() {
        let s = store();
        let row = PackageSnapshotRow::from_package(s.get(PackageId(1)).unwrap());
        assert_eq!(row.status, "Delivered");
        assert_eq!(row.truck, Some(1));
        assert_eq!(row.distance, 2.0);
        assert_eq!(row.on_time, Some(true));
        assert_eq!(row.status_time, Some(at(8, 6, 40)));
    }

    #[test]
    fn row_as_of_earlier_time_hides_later_events() {
        let s = store();
        let row = PackageSnapshotRow::as_of(s.get(PackageId(1)).unwrap(), at(8, 3, 0));
        assert_eq!(row.status, "In Route");
        assert_eq!(row.distance, 0.0);
        assert_eq!(row.on_time, None);
        let before = PackageSnapshotRow::as_of(s.get(PackageId(1)).unwrap(), at(7, 0, 0));
        assert_eq!(before.status, "");
        assert_eq!(before.truck, None);
    }
}

// ── CSV backend ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod csv_tests {
    use tempfile::TempDir;

    use super::{at, store};
    use crate::csv::CsvWriter;
    use crate::row::{PackageSnapshotRow, TruckRunRow};
    use crate::writer::OutputWriter;

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    fn headers(path: std::path::PathBuf) -> Vec<String> {
        let mut rdr = csv::Reader::from_path(path).unwrap();
        rdr.headers().unwrap().iter().map(str::to_owned).collect()
    }

    #[test]
    fn csv_files_created_with_headers() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();
        assert_eq!(
            headers(dir.path().join("package_status.csv")),
            ["package_id", "address", "city", "zip", "deadline", "truck", "status", "status_time", "distance", "on_time"]
        );
        assert_eq!(
            headers(dir.path().join("truck_runs.csv")),
            ["truck", "wave", "departed", "finished", "stops", "delivered", "distance", "gaps"]
        );
    }

    #[test]
    fn package_rows_written() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        let rows: Vec<_> = store().iter().map(PackageSnapshotRow::from_package).collect();
        w.write_packages(&rows).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("package_status.csv")).unwrap();
        let read: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(read.len(), 2);
        assert_eq!(&read[0][0], "1");
        assert_eq!(&read[0][5], "1");                   // truck
        assert_eq!(&read[0][7], "2023-10-24 08:06:40"); // status_time
        assert_eq!(&read[0][8], "2.0");
        assert_eq!(&read[0][9], "1");                   // on time
        assert_eq!(&read[1][5], "");                    // not loaded
        assert_eq!(&read[1][9], "");
    }

    #[test]
    fn truck_run_row_written() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        let row = TruckRunRow {
            truck:     2,
            wave:      "morning".into(),
            departed:  at(8, 0, 0),
            finished:  at(9, 12, 30),
            stops:     7,
            delivered: 9,
            distance:  31.4,
            gaps:      0,
        };
        w.write_truck_run(&row).unwrap();
        w.finish().unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("truck_runs.csv")).unwrap();
        let read: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(read.len(), 1);
        assert_eq!(&read[0][1], "morning");
        assert_eq!(&read[0][3], "2023-10-24 09:12:30");
        assert_eq!(&read[0][6], "31.4");
    }
}

// ── Observer ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod observer_tests {
    use pd_core::{DayConfig, TruckId};
    use pd_dispatch::{Wave, WaveSchedule};
    use pd_sim::SimBuilder;
    use pd_spatial::{DistanceMatrix, LocationIndex};

    use super::{NaiveTime, rec};
    use crate::{OutputResult, OutputWriter, PackageSnapshotRow, SimOutputObserver, TruckRunRow};

    #[derive(Default)]
    struct Memory {
        packages: Vec<PackageSnapshotRow>,
        runs:     Vec<TruckRunRow>,
        finishes: usize,
    }

    impl OutputWriter for Memory {
        fn write_packages(&mut self, rows: &[PackageSnapshotRow]) -> OutputResult<()> {
            self.packages.extend_from_slice(rows);
            Ok(())
        }
        fn write_truck_run(&mut self, row: &TruckRunRow) -> OutputResult<()> {
            self.runs.push(row.clone());
            Ok(())
        }
        fn finish(&mut self) -> OutputResult<()> {
            self.finishes += 1;
            Ok(())
        }
    }

    #[test]
    fn observer_writes_runs_and_final_states() {
        let locations = LocationIndex::from_addresses(["Hub", "1 A St", "2 B St"]);
        let distances = DistanceMatrix::from_rows(vec![
            vec![Some(0.0)],
            vec![Some(2.0), Some(0.0)],
            vec![Some(5.0), Some(4.0), Some(0.0)],
        ])
        .unwrap();
        let schedule = WaveSchedule::new(vec![Wave::new(
            "morning",
            NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
            vec![TruckId(1)],
        )]);
        let mut sim = SimBuilder::new(
            DayConfig { truck_count: 1, ..DayConfig::default() },
            vec![rec(1, "1 A St", "EOD"), rec(2, "2 B St", "9:00 AM")],
            locations,
            distances,
        )
        .schedule(schedule)
        .build()
        .unwrap();

        let mut obs = SimOutputObserver::new(Memory::default());
        sim.run(&mut obs).unwrap();
        assert!(obs.take_error().is_none());

        let mem = obs.into_writer();
        assert_eq!(mem.finishes, 1);
        assert_eq!(mem.runs.len(), 1);
        // 0→1 (2) →2 (4) →0 (5)
        assert_eq!(mem.runs[0].distance, 11.0);
        assert_eq!(mem.runs[0].delivered, 2);
        assert_eq!(mem.packages.len(), 2);
        assert!(mem.packages.iter().all(|r| r.status == "Delivered"));
        assert!(mem.packages.iter().all(|r| r.on_time == Some(true)));
    }
}
