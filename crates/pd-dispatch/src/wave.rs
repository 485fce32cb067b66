//! Load waves: when each truck comes back to the hub to be (re)loaded.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use pd_core::{DayConfig, TruckId};

use crate::{DispatchError, DispatchResult, Fleet};

// ── Wave ──────────────────────────────────────────────────────────────────────

/// One loading round.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Wave {
    /// Free-form name used in logs and observer callbacks.
    pub label: String,

    /// Earliest time of day the wave may load.
    pub not_before: NaiveTime,

    /// Trucks loading in this wave, in the order they depart on ties.
    pub trucks: Vec<TruckId>,

    /// When `false`, only constrained packages (groups, pinned, early
    /// deadlines) are loaded.
    #[cfg_attr(feature = "serde", serde(default = "default_fill"))]
    pub fill: bool,
}

#[cfg(feature = "serde")]
fn default_fill() -> bool {
    true
}

impl Wave {
    pub fn new(label: impl Into<String>, not_before: NaiveTime, trucks: Vec<TruckId>) -> Self {
        Self { label: label.into(), not_before, trucks, fill: true }
    }

    /// Builder-style switch for [`fill`](Self::fill).
    pub fn with_fill(mut self, fill: bool) -> Self {
        self.fill = fill;
        self
    }

    pub fn loads(&self, truck: TruckId) -> bool {
        self.trucks.contains(&truck)
    }

    /// Nominal wave time on `date`: the later of `not_before` and the
    /// `available_at` of every truck in the wave.
    pub fn nominal_time(&self, date: NaiveDate, fleet: &Fleet) -> DispatchResult<NaiveDateTime> {
        let mut at = date.and_time(self.not_before);
        for &id in &self.trucks {
            at = at.max(fleet.truck(id)?.available_at());
        }
        Ok(at)
    }
}

// ── WaveSchedule ──────────────────────────────────────────────────────────────

/// The day's waves, evaluated in order.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WaveSchedule {
    waves: Vec<Wave>,
}

impl WaveSchedule {
    pub fn new(waves: Vec<Wave>) -> Self {
        Self { waves }
    }

    /// Morning wave for every truck at day start, then one reload per truck:
    /// truck 1 not before 09:05, truck 2 not before 10:20, any further truck
    /// not before noon.
    pub fn default_for(config: &DayConfig) -> Self {
        let start = config.day_start.time();
        let mut waves = vec![Wave::new("morning", start, (1..=config.truck_count).map(TruckId).collect())];
        for n in 1..=config.truck_count {
            let (h, m) = match n {
                1 => (9, 5),
                2 => (10, 20),
                _ => (12, 0),
            };
            let not_before = NaiveTime::from_hms_opt(h, m, 0).unwrap_or(start).max(start);
            waves.push(Wave::new(format!("reload truck {n}"), not_before, vec![TruckId(n)]));
        }
        Self { waves }
    }

    pub fn push(&mut self, wave: Wave) {
        self.waves.push(wave);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Wave> + '_ {
        self.waves.iter()
    }

    pub fn len(&self) -> usize {
        self.waves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waves.is_empty()
    }

    /// Every wave loads at least one truck, and every truck exists.
    pub fn validate(&self, fleet: &Fleet) -> DispatchResult<()> {
        for wave in &self.waves {
            if wave.trucks.is_empty() {
                return Err(DispatchError::EmptyWave(wave.label.clone()));
            }
            for &id in &wave.trucks {
                fleet.truck(id)?;
            }
        }
        Ok(())
    }
}
