//! Top-level day configuration.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::{CoreError, CoreResult, SimClock};

/// Parameters of one simulated delivery day.
///
/// Typically loaded from a JSON file by the application crate (with the
/// `serde` feature) and passed to the simulation builder.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DayConfig {
    /// When the hub opens.  Every package's history is seeded with
    /// `(AtHub, day_start)`.
    pub day_start: NaiveDateTime,

    /// Average truck speed in distance units per hour.  Default: 18.
    pub speed_per_hour: f64,

    /// Number of trucks, numbered `1..=truck_count`.
    pub truck_count: u32,

    /// Maximum packages a truck carries at once.  Default: 16.
    pub truck_capacity: usize,

    /// Packages due strictly before this time of day are loaded first.
    /// `None` disables deadline preference.
    pub deadline_cutoff: Option<NaiveTime>,
}

impl DayConfig {
    /// Construct a `SimClock` pre-configured for this day.
    pub fn make_clock(&self) -> SimClock {
        SimClock::new(self.day_start, self.speed_per_hour)
    }

    /// Reject configurations the simulator cannot run.
    pub fn validate(&self) -> CoreResult<()> {
        if !(self.speed_per_hour.is_finite() && self.speed_per_hour > 0.0) {
            return Err(CoreError::Config(format!(
                "speed_per_hour must be positive, got {}",
                self.speed_per_hour
            )));
        }
        if self.truck_count == 0 {
            return Err(CoreError::Config("truck_count must be at least 1".into()));
        }
        if self.truck_capacity == 0 {
            return Err(CoreError::Config("truck_capacity must be at least 1".into()));
        }
        Ok(())
    }
}

impl Default for DayConfig {
    fn default() -> Self {
        let day_start = NaiveDate::from_ymd_opt(2023, 10, 24)
            .and_then(|d| d.and_hms_opt(8, 0, 0))
            .expect("constant date is valid");
        Self {
            day_start,
            speed_per_hour:  18.0,
            truck_count:     2,
            truck_capacity:  16,
            deadline_cutoff: NaiveTime::from_hms_opt(12, 0, 0),
        }
    }
}
