//! Simulated-day time model.
//!
//! # Design
//!
//! Every timestamp in the engine is a `chrono::NaiveDateTime` on a single
//! simulated date.  Trucks move at a constant average speed, so the only
//! time arithmetic the engine needs is:
//!
//!   arrival = departure + distance / speed
//!
//! `SimClock` owns the day start and the speed and performs that conversion
//! at microsecond precision, so cumulative-distance timestamps never drift
//! from the distances that produced them.

use std::fmt;

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

use crate::{CoreError, CoreResult};

/// Canonical timestamp format for query input and report output.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const TIME_OF_DAY_FORMATS: [&str; 4] = ["%I:%M %p", "%I:%M:%S %p", "%H:%M:%S", "%H:%M"];

// ── SimClock ──────────────────────────────────────────────────────────────────

/// Converts between distances travelled and wall-clock time on the simulated
/// day.
///
/// `SimClock` is cheap to copy and holds no heap data.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SimClock {
    /// First instant of the working day; every package's history starts here.
    day_start: NaiveDateTime,
    /// Average truck speed in distance units per hour.
    speed_per_hour: f64,
}

impl SimClock {
    /// Create a clock for the day starting at `day_start`.
    pub fn new(day_start: NaiveDateTime, speed_per_hour: f64) -> Self {
        Self { day_start, speed_per_hour }
    }

    #[inline]
    pub fn day_start(&self) -> NaiveDateTime {
        self.day_start
    }

    #[inline]
    pub fn date(&self) -> NaiveDate {
        self.day_start.date()
    }

    #[inline]
    pub fn speed_per_hour(&self) -> f64 {
        self.speed_per_hour
    }

    /// The given time of day on the simulated date.
    #[inline]
    pub fn at(&self, time: NaiveTime) -> NaiveDateTime {
        self.date().and_time(time)
    }

    /// Driving time for `distance` at the configured speed.
    ///
    /// Negative or non-finite distances are treated as zero.
    pub fn travel_time(&self, distance: f64) -> Duration {
        if !distance.is_finite() || distance <= 0.0 {
            return Duration::zero();
        }
        let micros = (distance / self.speed_per_hour * 3_600_000_000.0).round();
        Duration::microseconds(micros as i64)
    }

    /// Timestamp reached after driving `distance` from `departure`.
    ///
    /// # Errors
    ///
    /// [`CoreError::ClockOverflow`] if the result is past the last
    /// representable timestamp.
    #[inline]
    pub fn arrival(&self, departure: NaiveDateTime, distance: f64) -> CoreResult<NaiveDateTime> {
        departure
            .checked_add_signed(self.travel_time(distance))
            .ok_or(CoreError::ClockOverflow { departure, distance })
    }

    /// Parse a query timestamp.
    ///
    /// Accepts `YYYY-MM-DD HH:MM:SS`, `YYYY-MM-DD HH:MM`, or a bare time of
    /// day (see [`parse_time_of_day`]) which is placed on the simulated date.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::MalformedTimestamp`] if no format matches.
    pub fn parse_timestamp(&self, input: &str) -> CoreResult<NaiveDateTime> {
        let s = input.trim();
        for fmt in [TIMESTAMP_FORMAT, "%Y-%m-%d %H:%M"] {
            if let Ok(ts) = NaiveDateTime::parse_from_str(s, fmt) {
                return Ok(ts);
            }
        }
        parse_time_of_day(s)
            .map(|t| self.at(t))
            .map_err(|_| CoreError::MalformedTimestamp(input.to_string()))
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "day {} @ {} mph",
            self.day_start.format(TIMESTAMP_FORMAT),
            self.speed_per_hour
        )
    }
}

// ── Time-of-day parsing ───────────────────────────────────────────────────────

/// Parse a time of day as written in manifests and notes.
///
/// Accepts `9:05 am`, `10:30 AM`, `9:05am`, `09:05:00`, and `10:20`.
pub fn parse_time_of_day(input: &str) -> CoreResult<NaiveTime> {
    let mut s = input.trim().to_ascii_uppercase();
    for suffix in ["AM", "PM"] {
        if let Some(stem) = s.strip_suffix(suffix) {
            s = format!("{} {suffix}", stem.trim_end());
            break;
        }
    }
    TIME_OF_DAY_FORMATS
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(&s, fmt).ok())
        .ok_or_else(|| CoreError::MalformedTimeOfDay(input.to_string()))
}
