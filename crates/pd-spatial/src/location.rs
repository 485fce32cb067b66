//! Address ↔ dense index mapping.
//!
//! Registration order is the canonical order of the address table and must
//! match the row order of the distance matrix: the first address registered
//! becomes `LocationId(0)`, the hub.

use pd_core::LocationId;

use crate::{SpatialError, SpatialResult};

#[cfg(feature = "fx-hash")]
type AddressMap = rustc_hash::FxHashMap<String, LocationId>;
#[cfg(not(feature = "fx-hash"))]
type AddressMap = std::collections::HashMap<String, LocationId>;

/// Bijection between address strings and `LocationId`s.
///
/// Addresses are keyed after trimming surrounding whitespace, so
/// `" 195 W Oakland Ave"` and `"195 W Oakland Ave"` are the same location.
#[derive(Debug, Clone, Default)]
pub struct LocationIndex {
    by_address: AddressMap,
    /// Address strings indexed by `LocationId`.
    addresses: Vec<String>,
}

impl LocationIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index by registering `addresses` in order.
    pub fn from_addresses<I, S>(addresses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut index = Self::new();
        for a in addresses {
            index.register(a.as_ref());
        }
        index
    }

    /// Register `address` and return its index.
    ///
    /// A new address receives the next unused index.  Registering an address
    /// that is already known returns its existing index and changes nothing.
    pub fn register(&mut self, address: &str) -> LocationId {
        let key = address.trim();
        if let Some(&id) = self.by_address.get(key) {
            return id;
        }
        let id = LocationId(self.addresses.len() as u32);
        self.by_address.insert(key.to_string(), id);
        self.addresses.push(key.to_string());
        id
    }

    /// `true` if `address` is already registered.
    pub fn contains(&self, address: &str) -> bool {
        self.by_address.contains_key(address.trim())
    }

    /// Resolve `address` to its index.
    ///
    /// # Errors
    ///
    /// [`SpatialError::LocationNotFound`] if the address was never registered.
    pub fn lookup(&self, address: &str) -> SpatialResult<LocationId> {
        self.by_address
            .get(address.trim())
            .copied()
            .ok_or_else(|| SpatialError::LocationNotFound(address.to_string()))
    }

    /// Reverse lookup.
    pub fn address(&self, id: LocationId) -> Option<&str> {
        self.addresses.get(id.index()).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.addresses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }

    /// All `(LocationId, address)` pairs in index order.
    pub fn iter(&self) -> impl Iterator<Item = (LocationId, &str)> + '_ {
        self.addresses
            .iter()
            .enumerate()
            .map(|(i, a)| (LocationId(i as u32), a.as_str()))
    }
}
