//! Strongly typed, zero-cost identifier wrappers.
//!
//! All IDs are `Copy + Ord + Hash` so they can be used as map keys and sorted
//! collection elements without ceremony.  The inner integer is `pub`;
//! `LocationId` additionally indexes the distance matrix via `.index()`.

use std::fmt;

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Cast to `usize` for direct use as a `Vec` index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl From<$name> for usize {
            #[inline(always)]
            fn from(id: $name) -> usize {
                id.0 as usize
            }
        }

        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;
            fn try_from(n: usize) -> Result<$name, Self::Error> {
                <$inner>::try_from(n).map($name)
            }
        }
    };
}

typed_id! {
    /// Package identifier as printed on the manifest.  Stable for the day.
    pub struct PackageId(u32);
}

typed_id! {
    /// Dense index of an address in the distance matrix.  `LocationId::HUB`
    /// (index 0) is the depot.
    pub struct LocationId(u32);
}

typed_id! {
    /// Truck number.  1-based, matching "Can only be on truck 2" notes.
    pub struct TruckId(u32);
}

impl LocationId {
    /// The depot: start and notional end of every route.
    pub const HUB: LocationId = LocationId(0);

    #[inline]
    pub fn is_hub(self) -> bool {
        self == Self::HUB
    }
}
