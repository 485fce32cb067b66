//! daily — simulate one delivery day and answer status queries.
//!
//! With no arguments the bundled sample day (`apps/daily/data/`) is run and
//! every package's status at the last delivery is printed.  `--data DIR`
//! points at another day laid out the same way:
//!
//! | File              | Contents                                  |
//! |-------------------|-------------------------------------------|
//! | `addresses.csv`   | one address per row, hub first            |
//! | `distances.csv`   | lower-triangular distance table           |
//! | `packages.csv`    | the manifest                              |
//! | `corrections.csv` | optional address corrections              |
//!
//! Logging goes through `tracing`; set `RUST_LOG=debug` to see every
//! assignment and delivery.

use std::fs::File;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result, bail};
use chrono::NaiveDateTime;
use clap::{ArgMatches, Command, arg, value_parser};
use tracing::warn;
use tracing_subscriber::EnvFilter;

use pd_core::{DayConfig, PackageId, SimClock, TIMESTAMP_FORMAT};
use pd_dispatch::{Deferral, Wave, WavePlan, WaveSchedule};
use pd_output::{
    CsvWriter, OutputWriter, PackageDetail, STATUS_HEADER, SimOutputObserver, list_all,
    status_as_of,
};
use pd_sim::{DayOutcome, SimBuilder, SimObserver, TruckRun};
use pd_spatial::{
    DistanceMatrix, LocationIndex, load_addresses_csv, load_addresses_reader, load_distances_csv,
    load_distances_reader,
};
use pd_store::{
    AddressCorrection, PackageRecord, load_corrections_csv, load_corrections_reader,
    load_packages_csv, load_packages_reader,
};

// ── Bundled sample day ────────────────────────────────────────────────────────

const ADDRESSES_CSV:   &str = include_str!("../data/addresses.csv");
const DISTANCES_CSV:   &str = include_str!("../data/distances.csv");
const PACKAGES_CSV:    &str = include_str!("../data/packages.csv");
const CORRECTIONS_CSV: &str = include_str!("../data/corrections.csv");

struct DayInputs {
    locations:   LocationIndex,
    distances:   DistanceMatrix,
    packages:    Vec<PackageRecord>,
    corrections: Vec<AddressCorrection>,
}

fn load_sample() -> Result<DayInputs> {
    Ok(DayInputs {
        locations:   load_addresses_reader(Cursor::new(ADDRESSES_CSV))?,
        distances:   load_distances_reader(Cursor::new(DISTANCES_CSV))?,
        packages:    load_packages_reader(Cursor::new(PACKAGES_CSV))?,
        corrections: load_corrections_reader(Cursor::new(CORRECTIONS_CSV))?,
    })
}

fn load_dir(dir: &Path) -> Result<DayInputs> {
    let path = |name: &str| dir.join(name);
    let corrections_path = path("corrections.csv");
    let corrections = if corrections_path.exists() {
        load_corrections_csv(&corrections_path)
            .with_context(|| format!("reading {}", corrections_path.display()))?
    } else {
        Vec::new()
    };
    Ok(DayInputs {
        locations: load_addresses_csv(&path("addresses.csv"))
            .with_context(|| format!("reading {}", path("addresses.csv").display()))?,
        distances: load_distances_csv(&path("distances.csv"))
            .with_context(|| format!("reading {}", path("distances.csv").display()))?,
        packages: load_packages_csv(&path("packages.csv"))
            .with_context(|| format!("reading {}", path("packages.csv").display()))?,
        corrections,
    })
}

fn load_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    serde_json::from_reader(file).with_context(|| format!("parsing {}", path.display()))
}

// ── CLI ───────────────────────────────────────────────────────────────────────

fn cli() -> Command {
    Command::new("daily")
        .about("Simulate a package delivery day and report package status")
        .arg(
            arg!(--data <DIR> "Directory holding addresses.csv, distances.csv, packages.csv")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            arg!(--config <FILE> "Day configuration as JSON")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            arg!(--waves <FILE> "Wave schedule as JSON")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(arg!(--at <TIME> "Report status as of a time of day or a full timestamp"))
        .arg(
            arg!(--package <ID> "Report a single package")
                .value_parser(value_parser!(u32)),
        )
        .arg(
            arg!(--output <DIR> "Write package_status.csv and truck_runs.csv here")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(arg!(--strict "Fail if any package is still at the hub at end of day"))
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();
}

// ── Observer wrapper ──────────────────────────────────────────────────────────

/// Prints wave progress and forwards everything to the CSV observer when
/// `--output` was given.
struct ConsoleObserver<W: OutputWriter> {
    inner: Option<SimOutputObserver<W>>,
    runs:  usize,
}

impl<W: OutputWriter> ConsoleObserver<W> {
    fn new(inner: Option<SimOutputObserver<W>>) -> Self {
        Self { inner, runs: 0 }
    }
}

impl<W: OutputWriter> SimObserver for ConsoleObserver<W> {
    fn on_wave_start(&mut self, wave: &Wave, at: NaiveDateTime) {
        println!("[{}] {}", at.format(TIMESTAMP_FORMAT), wave.label);
        if let Some(inner) = &mut self.inner {
            inner.on_wave_start(wave, at);
        }
    }

    fn on_corrections(&mut self, applied: &[PackageId], at: NaiveDateTime) {
        for id in applied {
            println!("  address corrected for package {}", id.0);
        }
        if let Some(inner) = &mut self.inner {
            inner.on_corrections(applied, at);
        }
    }

    fn on_plan(&mut self, wave: &Wave, plan: &WavePlan) {
        println!("  loaded {} packages", plan.assignments.len());
        let waiting = plan.deferred.iter().filter(|(_, why)| *why != Deferral::NotFilled).count();
        if waiting > 0 {
            println!("  {waiting} packages waiting for a later wave");
        }
        if let Some(inner) = &mut self.inner {
            inner.on_plan(wave, plan);
        }
    }

    fn on_truck_run(&mut self, run: &TruckRun) {
        self.runs += 1;
        println!(
            "  truck {} last stop at {}: {} delivered, {:.1} miles",
            run.truck.0,
            run.finished.format("%H:%M"),
            run.delivered.len(),
            run.distance
        );
        if let Some(inner) = &mut self.inner {
            inner.on_truck_run(run);
        }
    }

    fn on_day_end(&mut self, outcome: &DayOutcome) {
        if let Some(inner) = &mut self.inner {
            inner.on_day_end(outcome);
        }
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    init_logging();
    let matches = cli().get_matches();

    // 1. Day configuration.
    let config: DayConfig = match matches.get_one::<PathBuf>("config") {
        Some(path) => load_json(path)?,
        None => DayConfig::default(),
    };
    let clock = config.make_clock();

    // 2. Manifest, addresses, distances and corrections.
    let inputs = match matches.get_one::<PathBuf>("data") {
        Some(dir) => load_dir(dir)?,
        None => load_sample()?,
    };
    println!("=== daily — package delivery day ===");
    println!(
        "Packages: {}  |  Addresses: {}  |  Trucks: {} × {}",
        inputs.packages.len(),
        inputs.locations.len(),
        config.truck_count,
        config.truck_capacity
    );
    println!("{clock}");
    println!();

    // 3. Build sim.
    let mut builder = SimBuilder::new(
        config,
        inputs.packages,
        inputs.locations,
        inputs.distances,
    )
    .corrections(inputs.corrections);
    if let Some(path) = matches.get_one::<PathBuf>("waves") {
        builder = builder.schedule(load_json::<WaveSchedule>(path)?);
    }
    let mut sim = builder.build()?;

    // 4. Set up output.
    let inner = match matches.get_one::<PathBuf>("output") {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            Some(SimOutputObserver::new(CsvWriter::new(dir)?))
        }
        None => None,
    };
    let mut obs = ConsoleObserver::new(inner);

    // 5. Run.
    let t0 = Instant::now();
    let outcome = sim.run(&mut obs)?;
    let elapsed = t0.elapsed();

    if let Some(e) = obs.inner.as_mut().and_then(SimOutputObserver::take_error) {
        eprintln!("output error: {e}");
    }

    // 6. Summary.
    println!();
    println!("Day complete in {:.3} s ({} truck runs)", elapsed.as_secs_f64(), obs.runs);
    println!("Total mileage: {:.1}", outcome.total_distance);
    for truck in sim.fleet.iter() {
        println!("  truck {}: {:.1} miles", truck.id().0, outcome.truck_distance(truck.id()));
    }
    let late = outcome.late();
    if !late.is_empty() {
        println!("Late: {}", join_ids(&late));
    }
    if !outcome.unresolved.is_empty() {
        warn!(packages = %join_ids(&outcome.unresolved), "packages never left the hub");
        if matches.get_flag("strict") {
            outcome.ensure_complete()?;
        }
    }
    println!();

    // 7. Status report.
    report(&matches, &outcome, &clock)
}

fn report(matches: &ArgMatches, outcome: &DayOutcome, clock: &SimClock) -> Result<()> {
    let at = match matches.get_one::<String>("at") {
        Some(s) => clock.parse_timestamp(s)?,
        None => outcome.last_delivery().unwrap_or(clock.day_start()),
    };

    match matches.get_one::<u32>("package") {
        Some(&id) => {
            let id = PackageId(id);
            let Some(package) = outcome.packages.get(id) else {
                bail!("no package with id {}", id.0);
            };
            println!("{STATUS_HEADER}");
            println!("{}", status_as_of(&outcome.packages, id, at)?);
            println!();
            println!("{}", PackageDetail(package));
        }
        None => {
            println!("Status as of {}", at.format(TIMESTAMP_FORMAT));
            println!("{STATUS_HEADER}");
            for row in list_all(&outcome.packages, at) {
                println!("{row}");
            }
        }
    }
    Ok(())
}

fn join_ids(ids: &[PackageId]) -> String {
    ids.iter().map(|id| id.0.to_string()).collect::<Vec<_>>().join(", ")
}

#[cfg(test)]
mod tests {
    use pd_core::TruckId;
    use pd_sim::NoopObserver;

    use super::*;

    #[test]
    fn sample_day_delivers_every_package() {
        let inputs = load_sample().unwrap();
        assert_eq!(inputs.packages.len(), 25);
        let mut sim = SimBuilder::new(
            DayConfig::default(),
            inputs.packages,
            inputs.locations,
            inputs.distances,
        )
        .corrections(inputs.corrections)
        .build()
        .unwrap();
        let outcome = sim.run(&mut NoopObserver).unwrap();
        outcome.ensure_complete().unwrap();

        let truck_of = |id: u32| outcome.packages.get(PackageId(id)).unwrap().truck();
        assert_eq!(truck_of(3), Some(TruckId(2)));
        assert_eq!(truck_of(18), Some(TruckId(2)));
        let group = truck_of(13);
        assert!([14, 15, 16, 19, 20].iter().all(|&id| truck_of(id) == group));
        assert_eq!(outcome.packages.get(PackageId(9)).unwrap().address, "410 S State St");
    }

    #[test]
    fn bundled_json_files_parse() {
        let config: DayConfig = serde_json::from_str(include_str!("../data/config.json")).unwrap();
        assert_eq!(config, DayConfig::default());
        let waves: WaveSchedule = serde_json::from_str(include_str!("../data/waves.json")).unwrap();
        assert_eq!(waves.len(), 3);
        assert!(waves.iter().all(|w| w.fill));
    }

    #[test]
    fn cli_accepts_query_flags() {
        let m = cli().get_matches_from(["daily", "--at", "10:25", "--package", "9", "--strict"]);
        assert_eq!(m.get_one::<String>("at").map(String::as_str), Some("10:25"));
        assert_eq!(m.get_one::<u32>("package"), Some(&9));
        assert!(m.get_flag("strict"));
    }
}
