//! The `Package` record and its lifecycle transitions.

use std::fmt;

use chrono::{NaiveDateTime, NaiveTime};
use serde::Deserialize;

use pd_core::{PackageId, TruckId, parse_time_of_day};

use crate::history::{PackageStatus, StatusAt, StatusEvent, StatusHistory};
use crate::note::{Constraint, parse_note};
use crate::{AddressCorrection, StoreError, StoreResult};

// ── Deadline ──────────────────────────────────────────────────────────────────

/// Delivery deadline as a time of day, or end of day.
#[derive(Copy, Clone, PartialEq, Eq, Debug, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Deadline {
    By(NaiveTime),
    EndOfDay,
}

impl Deadline {
    /// Parse `EOD` (or blank) and times such as `10:30 AM`.
    pub fn parse(s: &str) -> StoreResult<Deadline> {
        let t = s.trim();
        if t.is_empty() || t.eq_ignore_ascii_case("eod") {
            return Ok(Deadline::EndOfDay);
        }
        Ok(Deadline::By(parse_time_of_day(t)?))
    }

    pub fn time(self) -> Option<NaiveTime> {
        match self {
            Deadline::By(t)    => Some(t),
            Deadline::EndOfDay => None,
        }
    }
}

impl fmt::Display for Deadline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Deadline::By(t)    => write!(f, "{}", t.format("%-I:%M %p")),
            Deadline::EndOfDay => f.write_str("EOD"),
        }
    }
}

// ── PackageRecord ─────────────────────────────────────────────────────────────

/// One manifest row as produced by an input loader.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct PackageRecord {
    pub id:       u32,
    pub address:  String,
    pub city:     String,
    pub state:    String,
    pub zip:      String,
    pub deadline: String,
    pub weight:   f64,
    #[serde(default)]
    pub note:     String,
}

// ── Package ───────────────────────────────────────────────────────────────────

/// A package and everything that happens to it during the day.
///
/// Address fields are public for display; state that must stay consistent
/// with the history (status, truck, distance) is only reachable through
/// the transition methods.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Package {
    pub id:       PackageId,
    pub address:  String,
    pub city:     String,
    pub state:    String,
    pub zip:      String,
    pub deadline: Deadline,
    /// Weight in kilograms.
    pub weight:   f64,
    /// Special note as written on the manifest.
    pub note:     String,

    constraints: Vec<Constraint>,
    distance:    f64,
    truck:       Option<TruckId>,
    corrected:   bool,
    history:     StatusHistory,
}

impl Package {
    /// Build a package from a manifest row; its history is seeded with
    /// `(AtHub, day_start)`.
    pub fn from_record(record: PackageRecord, day_start: NaiveDateTime) -> StoreResult<Self> {
        let id = PackageId(record.id);
        let constraints =
            parse_note(&record.note).map_err(|reason| StoreError::Note { package: id, reason })?;
        Ok(Self {
            id,
            address:  record.address.trim().to_string(),
            city:     record.city,
            state:    record.state,
            zip:      record.zip,
            deadline: Deadline::parse(&record.deadline)?,
            weight:   record.weight,
            note:     record.note,
            constraints,
            distance: 0.0,
            truck:    None,
            corrected: false,
            history:  StatusHistory::seeded(day_start),
        })
    }

    // ── Read access ───────────────────────────────────────────────────────

    #[inline]
    pub fn status(&self) -> PackageStatus {
        self.history.current().status
    }

    /// Time of the latest status change.
    #[inline]
    pub fn timestamp(&self) -> NaiveDateTime {
        self.history.current().at
    }

    /// Cumulative distance its truck had driven when it was delivered.
    #[inline]
    pub fn distance(&self) -> f64 {
        self.distance
    }

    #[inline]
    pub fn truck(&self) -> Option<TruckId> {
        self.truck
    }

    pub fn history(&self) -> &StatusHistory {
        &self.history
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// At the hub and not yet given to a truck.
    #[inline]
    pub fn is_unassigned(&self) -> bool {
        self.truck.is_none() && self.status() == PackageStatus::AtHub
    }

    /// Point-in-time status; never mutates.
    pub fn status_as_of(&self, t: NaiveDateTime) -> StatusAt {
        self.history.as_of(t)
    }

    /// `Some(true)` if delivered no later than its deadline.  `None` while
    /// undelivered.
    pub fn on_time(&self) -> Option<bool> {
        let ev = self.history.current();
        (ev.status == PackageStatus::Delivered).then(|| match self.deadline {
            Deadline::By(t)    => ev.at.time() <= t,
            Deadline::EndOfDay => true,
        })
    }

    // ── Constraint helpers ────────────────────────────────────────────────

    /// Packages this one must share a truck with.
    pub fn ship_with(&self) -> impl Iterator<Item = PackageId> + '_ {
        self.constraints
            .iter()
            .filter_map(|c| match c {
                Constraint::ShipWith(ids) => Some(ids),
                _ => None,
            })
            .flatten()
            .copied()
    }

    /// The truck this package is pinned to, if any.
    pub fn required_truck(&self) -> Option<TruckId> {
        self.constraints.iter().find_map(|c| match c {
            Constraint::TruckOnly(t) => Some(*t),
            _ => None,
        })
    }

    /// Time of day before which the package is not at the hub.
    pub fn delayed_until(&self) -> Option<NaiveTime> {
        self.constraints.iter().find_map(|c| match c {
            Constraint::DelayedUntil(t) => Some(*t),
            _ => None,
        })
    }

    /// `Some(unlock)` if the listed address is known wrong.
    pub fn wrong_address(&self) -> Option<Option<NaiveTime>> {
        self.constraints.iter().find_map(|c| match c {
            Constraint::WrongAddress { until } => Some(*until),
            _ => None,
        })
    }

    pub fn is_corrected(&self) -> bool {
        self.corrected
    }

    /// `true` if a delay or an uncorrected wrong address keeps the package
    /// off trucks at `now`.
    pub fn is_held(&self, now: NaiveDateTime) -> bool {
        let delayed = self.delayed_until().is_some_and(|t| now.time() < t);
        let misaddressed = self.wrong_address().is_some() && !self.corrected;
        delayed || misaddressed
    }

    // ── Transitions ───────────────────────────────────────────────────────

    /// Load onto `truck` at `at`: `AtHub → InRoute`.
    pub fn assign(&mut self, truck: TruckId, at: NaiveDateTime) -> StoreResult<()> {
        self.advance(PackageStatus::InRoute, at)?;
        self.truck = Some(truck);
        Ok(())
    }

    /// Hand over at `at` after the truck drove `distance`: `InRoute → Delivered`.
    pub fn deliver(&mut self, at: NaiveDateTime, distance: f64) -> StoreResult<()> {
        self.advance(PackageStatus::Delivered, at)?;
        self.distance = distance;
        Ok(())
    }

    /// Replace the address fields with `correction` if this package is
    /// flagged wrong-address, not yet corrected, and `now` has reached the
    /// unlock time.  Returns `Ok(true)` when the correction was applied.
    ///
    /// The unlock time comes from the note when it names one, otherwise from
    /// the correction itself, otherwise the correction applies at once.
    pub fn apply_correction(
        &mut self,
        correction: &AddressCorrection,
        now: NaiveDateTime,
    ) -> StoreResult<bool> {
        let Some(note_unlock) = self.wrong_address() else {
            return Err(StoreError::UnflaggedCorrection(self.id));
        };
        if self.corrected {
            return Ok(false);
        }
        let unlock = note_unlock.or(correction.effective_at);
        if unlock.is_some_and(|t| now.time() < t) {
            return Ok(false);
        }
        self.address = correction.address.trim().to_string();
        self.city = correction.city.clone();
        self.state = correction.state.clone();
        self.zip = correction.zip.clone();
        self.corrected = true;
        Ok(true)
    }

    fn advance(&mut self, to: PackageStatus, at: NaiveDateTime) -> StoreResult<()> {
        let last = self.history.current();
        if !last.status.can_advance_to(to) {
            return Err(StoreError::InvalidTransition { package: self.id, from: last.status, to });
        }
        if at < last.at {
            return Err(StoreError::OutOfOrderEvent { package: self.id, last: last.at, at });
        }
        self.history.push(StatusEvent { status: to, at });
        Ok(())
    }
}
