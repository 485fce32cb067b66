//! `PackageStore` — the single owner of every package record.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;

use pd_core::PackageId;

use crate::{AddressCorrection, Package, PackageRecord, StoreError, StoreResult};

/// Keyed package collection.
///
/// Backed by a `BTreeMap` so iteration is always in ascending `PackageId`
/// order; every policy scan and report that walks the store is therefore
/// deterministic without an explicit sort.
#[derive(Clone, Debug, Default)]
pub struct PackageStore {
    packages: BTreeMap<PackageId, Package>,
}

impl PackageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from manifest rows, seeding each history at `day_start`.
    ///
    /// # Errors
    ///
    /// [`StoreError::DuplicatePackage`] if two rows share an id, plus any
    /// deadline or note parse error.
    pub fn from_records<I>(records: I, day_start: NaiveDateTime) -> StoreResult<Self>
    where
        I: IntoIterator<Item = PackageRecord>,
    {
        let mut store = Self::new();
        for record in records {
            let package = Package::from_record(record, day_start)?;
            let id = package.id;
            if store.upsert(package).is_some() {
                return Err(StoreError::DuplicatePackage(id));
            }
        }
        Ok(store)
    }

    /// Insert or replace; returns the previous record under the same id.
    pub fn upsert(&mut self, package: Package) -> Option<Package> {
        self.packages.insert(package.id, package)
    }

    pub fn remove(&mut self, id: PackageId) -> Option<Package> {
        self.packages.remove(&id)
    }

    pub fn get(&self, id: PackageId) -> Option<&Package> {
        self.packages.get(&id)
    }

    pub fn get_mut(&mut self, id: PackageId) -> Option<&mut Package> {
        self.packages.get_mut(&id)
    }

    /// Like [`get`](Self::get) but a miss is an error.
    pub fn lookup(&self, id: PackageId) -> StoreResult<&Package> {
        self.get(id).ok_or(StoreError::PackageNotFound(id))
    }

    /// Like [`get_mut`](Self::get_mut) but a miss is an error.
    pub fn lookup_mut(&mut self, id: PackageId) -> StoreResult<&mut Package> {
        self.get_mut(id).ok_or(StoreError::PackageNotFound(id))
    }

    pub fn contains(&self, id: PackageId) -> bool {
        self.packages.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    /// All packages in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = &Package> + '_ {
        self.packages.values()
    }

    /// Packages at the hub with no truck, in ascending id order.
    pub fn unassigned(&self) -> impl Iterator<Item = &Package> + '_ {
        self.iter().filter(|p| p.is_unassigned())
    }

    /// Apply every correction whose unlock time has been reached.
    ///
    /// Returns the ids that were corrected by this call.
    pub fn apply_corrections(
        &mut self,
        corrections: &[AddressCorrection],
        now: NaiveDateTime,
    ) -> StoreResult<Vec<PackageId>> {
        let mut applied = Vec::new();
        for c in corrections {
            if self.lookup_mut(c.package)?.apply_correction(c, now)? {
                applied.push(c.package);
            }
        }
        Ok(applied)
    }
}
