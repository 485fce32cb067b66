//! Delivery trucks and the fleet that owns them.

use chrono::NaiveDateTime;

use pd_core::{PackageId, TruckId};

use crate::{DispatchError, DispatchResult};

// ── Truck ─────────────────────────────────────────────────────────────────────

/// One truck: its load queue, capacity, and when it is next free.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Truck {
    id:           TruckId,
    capacity:     usize,
    queue:        Vec<PackageId>,
    available_at: NaiveDateTime,
    distance:     f64,
    runs:         u32,
}

impl Truck {
    pub fn new(id: TruckId, capacity: usize, available_at: NaiveDateTime) -> Self {
        Self { id, capacity, queue: Vec::new(), available_at, distance: 0.0, runs: 0 }
    }

    #[inline]
    pub fn id(&self) -> TruckId {
        self.id
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Packages on board, in load order.
    pub fn queue(&self) -> &[PackageId] {
        &self.queue
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Slots still open.
    #[inline]
    pub fn free(&self) -> usize {
        self.capacity.saturating_sub(self.queue.len())
    }

    pub fn is_full(&self) -> bool {
        self.free() == 0
    }

    pub fn carries(&self, package: PackageId) -> bool {
        self.queue.contains(&package)
    }

    /// Earliest time the truck can leave the hub again.
    #[inline]
    pub fn available_at(&self) -> NaiveDateTime {
        self.available_at
    }

    pub fn set_available_at(&mut self, at: NaiveDateTime) {
        self.available_at = at;
    }

    /// Total distance driven today, return legs included.
    #[inline]
    pub fn distance(&self) -> f64 {
        self.distance
    }

    pub fn add_distance(&mut self, d: f64) {
        self.distance += d;
    }

    /// Completed runs (hub → stops → hub).
    pub fn runs(&self) -> u32 {
        self.runs
    }

    pub fn finish_run(&mut self) {
        self.runs += 1;
    }

    /// Put `package` on board.
    ///
    /// # Errors
    ///
    /// [`DispatchError::CapacityExceeded`] if the truck is full.
    pub fn load(&mut self, package: PackageId) -> DispatchResult<()> {
        if self.is_full() {
            return Err(DispatchError::CapacityExceeded {
                truck:    self.id,
                capacity: self.capacity,
            });
        }
        self.queue.push(package);
        Ok(())
    }

    /// Take `package` off the truck.  Returns `false` if it was not aboard.
    pub fn unload(&mut self, package: PackageId) -> bool {
        match self.queue.iter().position(|&p| p == package) {
            Some(i) => {
                self.queue.remove(i);
                true
            }
            None => false,
        }
    }
}

// ── Fleet ─────────────────────────────────────────────────────────────────────

/// All trucks, indexed by `TruckId` (1-based).
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Fleet {
    trucks: Vec<Truck>,
}

impl Fleet {
    /// `count` empty trucks, all available at `start`.
    pub fn new(count: u32, capacity: usize, start: NaiveDateTime) -> Self {
        let trucks = (1..=count).map(|n| Truck::new(TruckId(n), capacity, start)).collect();
        Self { trucks }
    }

    pub fn len(&self) -> usize {
        self.trucks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trucks.is_empty()
    }

    pub fn get(&self, id: TruckId) -> Option<&Truck> {
        let slot = (id.0 as usize).checked_sub(1)?;
        self.trucks.get(slot)
    }

    pub fn get_mut(&mut self, id: TruckId) -> Option<&mut Truck> {
        let slot = (id.0 as usize).checked_sub(1)?;
        self.trucks.get_mut(slot)
    }

    /// Like [`get`](Self::get) but a miss is an error.
    pub fn truck(&self, id: TruckId) -> DispatchResult<&Truck> {
        self.get(id).ok_or(DispatchError::UnknownTruck(id))
    }

    pub fn truck_mut(&mut self, id: TruckId) -> DispatchResult<&mut Truck> {
        self.get_mut(id).ok_or(DispatchError::UnknownTruck(id))
    }

    /// Trucks in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = &Truck> + '_ {
        self.trucks.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Truck> + '_ {
        self.trucks.iter_mut()
    }

    /// Sum of every truck's driven distance.
    pub fn total_distance(&self) -> f64 {
        self.trucks.iter().map(Truck::distance).sum()
    }
}
