//! Package status and its append-only history.

use std::fmt;

use chrono::NaiveDateTime;

use pd_core::TIMESTAMP_FORMAT;

// ── PackageStatus ─────────────────────────────────────────────────────────────

/// Where a package is in its day.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PackageStatus {
    AtHub,
    InRoute,
    Delivered,
}

impl PackageStatus {
    /// `true` if `self → next` is a forward step of the delivery lifecycle.
    pub fn can_advance_to(self, next: PackageStatus) -> bool {
        matches!(
            (self, next),
            (PackageStatus::AtHub, PackageStatus::InRoute)
                | (PackageStatus::InRoute, PackageStatus::Delivered)
        )
    }
}

impl fmt::Display for PackageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PackageStatus::AtHub     => "At Hub",
            PackageStatus::InRoute   => "In Route",
            PackageStatus::Delivered => "Delivered",
        };
        f.write_str(s)
    }
}

// ── StatusEvent ───────────────────────────────────────────────────────────────

/// One `(status, timestamp)` entry.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusEvent {
    pub status: PackageStatus,
    pub at:     NaiveDateTime,
}

// ── StatusAt ──────────────────────────────────────────────────────────────────

/// Answer to a point-in-time status query.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum StatusAt {
    /// The newest event at or before the query time.
    Known(StatusEvent),
    /// The query time precedes the package's first event.
    NotAvailable(NaiveDateTime),
}

impl StatusAt {
    pub fn event(&self) -> Option<StatusEvent> {
        match self {
            StatusAt::Known(e)        => Some(*e),
            StatusAt::NotAvailable(_) => None,
        }
    }

    pub fn status(&self) -> Option<PackageStatus> {
        self.event().map(|e| e.status)
    }
}

impl fmt::Display for StatusAt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusAt::Known(e) => write!(f, "{} at {}", e.status, e.at.format(TIMESTAMP_FORMAT)),
            StatusAt::NotAvailable(t) => {
                write!(f, "Status not available at {}", t.format(TIMESTAMP_FORMAT))
            }
        }
    }
}

// ── StatusHistory ─────────────────────────────────────────────────────────────

/// Ordered, never-empty log of status events, oldest first.
///
/// The seed event is held apart from later events so that "current status"
/// needs no emptiness check.  Ordering (non-decreasing `at`) is enforced by
/// [`Package`](crate::Package), the only writer.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusHistory {
    seed:  StatusEvent,
    later: Vec<StatusEvent>,
}

impl StatusHistory {
    /// A history whose only event is `(AtHub, at)`.
    pub fn seeded(at: NaiveDateTime) -> Self {
        Self {
            seed:  StatusEvent { status: PackageStatus::AtHub, at },
            later: Vec::new(),
        }
    }

    /// The newest event.
    #[inline]
    pub fn current(&self) -> StatusEvent {
        self.later.last().copied().unwrap_or(self.seed)
    }

    /// All events, oldest first.
    pub fn events(&self) -> impl DoubleEndedIterator<Item = &StatusEvent> + '_ {
        std::iter::once(&self.seed).chain(self.later.iter())
    }

    pub fn len(&self) -> usize {
        1 + self.later.len()
    }

    /// Always `false`; present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Newest event with `at ≤ t`, or [`StatusAt::NotAvailable`] if `t`
    /// precedes the seed event.  Exact matches return that event.
    pub fn as_of(&self, t: NaiveDateTime) -> StatusAt {
        self.events()
            .rev()
            .find(|e| e.at <= t)
            .map_or(StatusAt::NotAvailable(t), |e| StatusAt::Known(*e))
    }

    pub(crate) fn push(&mut self, event: StatusEvent) {
        self.later.push(event);
    }
}
