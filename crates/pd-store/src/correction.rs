//! Conditional address corrections.
//!
//! A package whose note says its address is wrong is held at the hub until a
//! correction for it is applied.  The correction fires at most once, the
//! first time the simulation clock reaches its unlock time (see
//! [`Package::apply_correction`](crate::Package::apply_correction)).

use chrono::NaiveTime;
use serde::Deserialize;

use pd_core::{PackageId, parse_time_of_day};

use crate::StoreResult;

/// Replacement address data for one package.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AddressCorrection {
    pub package:      PackageId,
    pub address:      String,
    pub city:         String,
    pub state:        String,
    pub zip:          String,
    /// Used when the package's note does not name an unlock time.
    #[cfg_attr(feature = "serde", serde(default))]
    pub effective_at: Option<NaiveTime>,
}

/// One corrections-file row as produced by the loader.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct CorrectionRecord {
    pub package:      u32,
    pub address:      String,
    pub city:         String,
    pub state:        String,
    pub zip:          String,
    #[serde(default)]
    pub effective_at: String,
}

impl CorrectionRecord {
    /// Blank `effective_at` means "no time of its own".
    pub fn into_correction(self) -> StoreResult<AddressCorrection> {
        let effective_at = match self.effective_at.trim() {
            "" => None,
            t => Some(parse_time_of_day(t)?),
        };
        Ok(AddressCorrection {
            package: PackageId(self.package),
            address: self.address,
            city: self.city,
            state: self.state,
            zip: self.zip,
            effective_at,
        })
    }
}
