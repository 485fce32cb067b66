//! Unit tests for pd-dispatch.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use pd_core::TruckId;
use pd_store::{PackageRecord, PackageStore};

use crate::{AssignmentPolicy, Fleet, RulePolicy, ShipGroups, Wave, WaveContext, WavePlan};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 10, 24).unwrap()
}

fn at(h: u32, m: u32) -> NaiveDateTime {
    date().and_hms_opt(h, m, 0).unwrap()
}

fn tod(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

fn rec(id: u32, deadline: &str, note: &str) -> PackageRecord {
    PackageRecord {
        id,
        address:  format!("{id} Main St"),
        city:     "Salt Lake City".into(),
        state:    "UT".into(),
        zip:      "84115".into(),
        deadline: deadline.into(),
        weight:   1.0,
        note:     note.into(),
    }
}

fn plain(ids: impl IntoIterator<Item = u32>) -> Vec<PackageRecord> {
    ids.into_iter().map(|id| rec(id, "EOD", "")).collect()
}

fn store_of(rows: Vec<PackageRecord>) -> PackageStore {
    PackageStore::from_records(rows, at(8, 0)).unwrap()
}

fn morning(n: u32) -> Wave {
    Wave::new("morning", tod(8, 0), (1..=n).map(TruckId).collect())
}

fn plan_for(store: &PackageStore, fleet: &Fleet, wave: &Wave) -> WavePlan {
    let groups = ShipGroups::build(store);
    let at = wave.nominal_time(date(), fleet).unwrap();
    let ctx = WaveContext { store, fleet, groups: &groups, wave, at };
    RulePolicy::new(Some(tod(12, 0))).plan(&ctx)
}

/// 13, 15 and 19 must ride together; 19 is on a delayed flight.
fn grouped_store() -> PackageStore {
    let mut rows = plain([1, 2, 3]);
    rows.push(rec(13, "EOD", ""));
    rows.push(rec(15, "EOD", "Must be delivered with 13, 19"));
    rows.push(rec(19, "EOD", "Delayed on flight---will not arrive to depot until 9:05 am"));
    store_of(rows)
}

// ── Trucks ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod truck {
    use pd_core::{PackageId, TruckId};

    use super::at;
    use crate::{DispatchError, Fleet, Truck};

    #[test]
    fn load_until_full() {
        let mut t = Truck::new(TruckId(1), 2, at(8, 0));
        t.load(PackageId(1)).unwrap();
        t.load(PackageId(2)).unwrap();
        assert!(t.is_full());
        let err = t.load(PackageId(3)).unwrap_err();
        assert!(matches!(err, DispatchError::CapacityExceeded { capacity: 2, .. }));
        assert_eq!(t.queue(), &[PackageId(1), PackageId(2)]);
    }

    #[test]
    fn unload_frees_a_slot() {
        let mut t = Truck::new(TruckId(1), 1, at(8, 0));
        t.load(PackageId(7)).unwrap();
        assert!(t.unload(PackageId(7)));
        assert!(!t.unload(PackageId(7)));
        assert_eq!(t.free(), 1);
    }

    #[test]
    fn fleet_is_one_based() {
        let fleet = Fleet::new(2, 16, at(8, 0));
        assert_eq!(fleet.len(), 2);
        assert!(fleet.get(TruckId(0)).is_none());
        assert_eq!(fleet.get(TruckId(2)).unwrap().id(), TruckId(2));
        assert!(matches!(fleet.truck(TruckId(3)), Err(DispatchError::UnknownTruck(TruckId(3)))));
    }

    #[test]
    fn total_distance_sums_trucks() {
        let mut fleet = Fleet::new(2, 16, at(8, 0));
        fleet.truck_mut(TruckId(1)).unwrap().add_distance(10.5);
        fleet.truck_mut(TruckId(2)).unwrap().add_distance(4.0);
        assert_eq!(fleet.total_distance(), 14.5);
    }
}

// ── Waves ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod wave {
    use pd_core::{DayConfig, TruckId};

    use super::{at, date, tod};
    use crate::{DispatchError, Fleet, Wave, WaveSchedule};

    #[test]
    fn nominal_time_waits_for_latest_truck() {
        let mut fleet = Fleet::new(2, 16, at(8, 0));
        fleet.truck_mut(TruckId(2)).unwrap().set_available_at(at(10, 47));
        let both = Wave::new("w", tod(9, 5), vec![TruckId(1), TruckId(2)]);
        assert_eq!(both.nominal_time(date(), &fleet).unwrap(), at(10, 47));
        let one = Wave::new("w", tod(9, 5), vec![TruckId(1)]);
        assert_eq!(one.nominal_time(date(), &fleet).unwrap(), at(9, 5));
    }

    #[test]
    fn default_schedule() {
        let s = WaveSchedule::default_for(&DayConfig::default());
        let waves: Vec<_> = s.iter().collect();
        assert_eq!(waves.len(), 3);
        assert_eq!(waves[0].trucks, vec![TruckId(1), TruckId(2)]);
        assert_eq!(waves[0].not_before, tod(8, 0));
        assert_eq!((waves[1].trucks.clone(), waves[1].not_before), (vec![TruckId(1)], tod(9, 5)));
        assert_eq!((waves[2].trucks.clone(), waves[2].not_before), (vec![TruckId(2)], tod(10, 20)));
        assert!(waves.iter().all(|w| w.fill));
    }

    #[test]
    fn validate_rejects_empty_and_unknown() {
        let fleet = Fleet::new(1, 16, at(8, 0));
        let empty = WaveSchedule::new(vec![Wave::new("none", tod(8, 0), vec![])]);
        assert!(matches!(empty.validate(&fleet), Err(DispatchError::EmptyWave(_))));
        let unknown = WaveSchedule::new(vec![Wave::new("x", tod(8, 0), vec![TruckId(4)])]);
        assert!(matches!(unknown.validate(&fleet), Err(DispatchError::UnknownTruck(TruckId(4)))));
    }
}

// ── Ship-with groups ──────────────────────────────────────────────────────────

#[cfg(test)]
mod groups {
    use pd_core::PackageId;

    use super::{plain, rec, store_of};
    use crate::ShipGroups;

    #[test]
    fn closure_is_transitive_and_symmetric() {
        let mut rows = plain([1, 13, 19, 20]);
        rows.push(rec(14, "EOD", "Must be delivered with 15, 19"));
        rows.push(rec(15, "EOD", ""));
        rows.push(rec(16, "EOD", "Must be delivered with 13, 19"));
        let groups = ShipGroups::build(&store_of(rows));
        assert_eq!(groups.len(), 1);
        let ids: Vec<u32> = groups.group_of(PackageId(13)).unwrap().iter().map(|p| p.0).collect();
        assert_eq!(ids, vec![13, 14, 15, 16, 19]);
        assert!(!groups.is_grouped(PackageId(20)));
    }

    #[test]
    fn unknown_ids_are_ignored() {
        let mut rows = plain([1]);
        rows.push(rec(2, "EOD", "Must be delivered with 99"));
        assert!(ShipGroups::build(&store_of(rows)).is_empty());
    }
}

// ── RulePolicy ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod policy {
    use pd_core::{PackageId, TruckId};
    use pd_store::AddressCorrection;

    use super::{at, grouped_store, morning, plain, plan_for, rec, store_of, tod};
    use crate::{Deferral, Fleet, Wave};

    #[test]
    fn group_with_held_member_waits_whole() {
        let store = grouped_store();
        let fleet = Fleet::new(2, 16, at(8, 0));
        let plan = plan_for(&store, &fleet, &morning(2));
        for id in [13, 15, 19] {
            assert_eq!(plan.deferral_of(PackageId(id)), Some(Deferral::GroupHeld));
            assert_eq!(plan.truck_for(PackageId(id)), None);
        }
        for id in [1, 2, 3] {
            assert_eq!(plan.truck_for(PackageId(id)), Some(TruckId(1)));
        }
    }

    #[test]
    fn group_rides_together_once_unlocked() {
        let store = grouped_store();
        let fleet = Fleet::new(2, 16, at(8, 0));
        let wave = Wave::new("reload", tod(9, 5), vec![TruckId(2)]);
        let plan = plan_for(&store, &fleet, &wave);
        assert_eq!(plan.at, at(9, 5));
        for id in [13, 15, 19] {
            assert_eq!(plan.truck_for(PackageId(id)), Some(TruckId(2)));
        }
    }

    #[test]
    fn group_needing_more_room_than_any_truck_waits() {
        let store = grouped_store();
        let fleet = Fleet::new(2, 2, at(10, 0));
        let plan = plan_for(&store, &fleet, &morning(2));
        assert_eq!(plan.deferral_of(PackageId(15)), Some(Deferral::NoCapacity));
    }

    #[test]
    fn pinned_package_goes_to_its_truck() {
        let mut rows = plain([1, 2]);
        rows.push(rec(3, "EOD", "Can only be on truck 2"));
        let store = store_of(rows);
        let fleet = Fleet::new(2, 16, at(8, 0));

        let plan = plan_for(&store, &fleet, &morning(2));
        assert_eq!(plan.truck_for(PackageId(3)), Some(TruckId(2)));

        let only_one = Wave::new("t1", tod(8, 0), vec![TruckId(1)]);
        let plan = plan_for(&store, &fleet, &only_one);
        assert_eq!(plan.deferral_of(PackageId(3)), Some(Deferral::TruckNotLoading(TruckId(2))));
    }

    #[test]
    fn urgent_packages_go_to_earliest_departing_truck() {
        let mut rows = plain([1, 2]);
        rows.push(rec(3, "9:00 AM", ""));
        rows.push(rec(5, "10:30 AM", ""));
        let store = store_of(rows);
        let mut fleet = Fleet::new(2, 1, at(8, 0));
        fleet.truck_mut(TruckId(1)).unwrap().set_available_at(at(8, 30));

        let plan = plan_for(&store, &fleet, &morning(2));
        assert_eq!(plan.truck_for(PackageId(3)), Some(TruckId(2)));
        assert_eq!(plan.truck_for(PackageId(5)), Some(TruckId(1)));
        assert_eq!(plan.deferral_of(PackageId(1)), Some(Deferral::NoCapacity));
        assert_eq!(plan.deferral_of(PackageId(2)), Some(Deferral::NoCapacity));
    }

    #[test]
    fn fill_goes_in_id_order_and_respects_capacity() {
        let store = store_of(plain([5, 1, 4, 2, 3]));
        let fleet = Fleet::new(2, 2, at(8, 0));
        let plan = plan_for(&store, &fleet, &morning(2));
        let t1: Vec<_> = plan.assigned_to(TruckId(1)).map(|p| p.0).collect();
        let t2: Vec<_> = plan.assigned_to(TruckId(2)).map(|p| p.0).collect();
        assert_eq!(t1, vec![1, 2]);
        assert_eq!(t2, vec![3, 4]);
        assert_eq!(plan.deferral_of(PackageId(5)), Some(Deferral::NoCapacity));
    }

    #[test]
    fn non_filling_wave_loads_constrained_only() {
        let mut rows = plain([1]);
        rows.push(rec(2, "9:00 AM", ""));
        let store = store_of(rows);
        let fleet = Fleet::new(1, 16, at(8, 0));
        let plan = plan_for(&store, &fleet, &morning(1).with_fill(false));
        assert_eq!(plan.truck_for(PackageId(2)), Some(TruckId(1)));
        assert_eq!(plan.deferral_of(PackageId(1)), Some(Deferral::NotFilled));
    }

    #[test]
    fn wrong_address_held_until_corrected() {
        let mut rows = plain([1]);
        rows.push(rec(9, "EOD", "Wrong address listed"));
        let mut store = store_of(rows);
        let fleet = Fleet::new(1, 16, at(8, 0));

        let plan = plan_for(&store, &fleet, &morning(1));
        assert_eq!(plan.deferral_of(PackageId(9)), Some(Deferral::Held));

        let fix = AddressCorrection {
            package:      PackageId(9),
            address:      "410 S State St".into(),
            city:         "Salt Lake City".into(),
            state:        "UT".into(),
            zip:          "84111".into(),
            effective_at: Some(tod(10, 20)),
        };
        store.apply_corrections(&[fix], at(10, 20)).unwrap();
        let plan = plan_for(&store, &fleet, &morning(1));
        assert_eq!(plan.truck_for(PackageId(9)), Some(TruckId(1)));
    }

    #[test]
    fn planning_is_deterministic() {
        let store = grouped_store();
        let fleet = Fleet::new(2, 16, at(8, 0));
        assert_eq!(plan_for(&store, &fleet, &morning(2)), plan_for(&store, &fleet, &morning(2)));
    }
}

// ── Placement check and apply ─────────────────────────────────────────────────

#[cfg(test)]
mod apply {
    use pd_core::{PackageId, TruckId};
    use pd_store::PackageStatus;

    use super::{at, grouped_store, morning, plain, plan_for, store_of};
    use crate::{
        Assignment, DispatchError, Fleet, ShipGroups, WavePlan, apply_plan, check_placement,
    };

    #[test]
    fn grouped_package_without_its_group_is_rejected() {
        let store = grouped_store();
        let fleet = Fleet::new(2, 16, at(8, 0));
        let groups = ShipGroups::build(&store);
        let lone = [Assignment { package: PackageId(15), truck: TruckId(1) }];
        let err = check_placement(&store, &fleet, &groups, &lone).unwrap_err();
        assert!(matches!(
            err,
            DispatchError::SplitGroup { package: PackageId(15), missing: PackageId(13), .. }
        ));
    }

    #[test]
    fn rejected_plan_leaves_state_untouched() {
        let mut store = grouped_store();
        let mut fleet = Fleet::new(2, 16, at(8, 0));
        let groups = ShipGroups::build(&store);
        let mut plan = WavePlan::new(at(8, 0));
        plan.assign(PackageId(1), TruckId(1));
        plan.assign(PackageId(15), TruckId(1));
        plan.assign(PackageId(13), TruckId(1));
        assert!(apply_plan(&plan, &mut store, &mut fleet, &groups).is_err());
        assert!(store.get(PackageId(1)).unwrap().is_unassigned());
        assert!(fleet.get(TruckId(1)).unwrap().is_empty());
    }

    #[test]
    fn applied_plan_loads_and_stamps_wave_time() {
        let mut store = store_of(plain([1, 2, 3]));
        let mut fleet = Fleet::new(2, 16, at(8, 0));
        let groups = ShipGroups::build(&store);
        let plan = plan_for(&store, &fleet, &morning(2));
        apply_plan(&plan, &mut store, &mut fleet, &groups).unwrap();
        for p in store.iter() {
            assert_eq!(p.status(), PackageStatus::InRoute);
            assert_eq!(p.timestamp(), at(8, 0));
            assert_eq!(p.truck(), Some(TruckId(1)));
        }
        assert_eq!(fleet.get(TruckId(1)).unwrap().len(), 3);
    }

    #[test]
    fn overfull_plan_is_a_capacity_error() {
        let mut store = store_of(plain([1, 2, 3]));
        let mut fleet = Fleet::new(1, 2, at(8, 0));
        let groups = ShipGroups::build(&store);
        let mut plan = WavePlan::new(at(8, 0));
        for id in 1..=3 {
            plan.assign(PackageId(id), TruckId(1));
        }
        let err = apply_plan(&plan, &mut store, &mut fleet, &groups).unwrap_err();
        assert!(matches!(err, DispatchError::CapacityExceeded { truck: TruckId(1), capacity: 2 }));
    }

    #[test]
    fn double_assignment_is_rejected() {
        let mut store = store_of(plain([1]));
        let mut fleet = Fleet::new(1, 16, at(8, 0));
        let groups = ShipGroups::build(&store);
        let mut plan = WavePlan::new(at(8, 0));
        plan.assign(PackageId(1), TruckId(1));
        apply_plan(&plan, &mut store, &mut fleet, &groups).unwrap();
        let err = apply_plan(&plan, &mut store, &mut fleet, &groups).unwrap_err();
        assert!(matches!(err, DispatchError::AlreadyAssigned(PackageId(1))));
    }
}
