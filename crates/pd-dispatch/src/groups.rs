//! Ship-with groups.
//!
//! A package's note may list packages it must share a truck with.  The
//! relation is made symmetric and transitive with a small union-find, so
//! `15 with 13` and `13 with 19` put 13, 15 and 19 in one group.  References
//! to ids missing from the store are ignored.

use std::collections::BTreeMap;

use pd_core::PackageId;
use pd_store::PackageStore;

/// Connected components of the ship-with relation.
///
/// Only components of two or more packages are kept.  Members are listed in
/// ascending id order; groups are ordered by their smallest member.
#[derive(Clone, Debug, Default)]
pub struct ShipGroups {
    groups:   Vec<Vec<PackageId>>,
    group_of: BTreeMap<PackageId, usize>,
}

impl ShipGroups {
    pub fn build(store: &PackageStore) -> Self {
        let ids: Vec<PackageId> = store.iter().map(|p| p.id).collect();
        let slot: BTreeMap<PackageId, usize> =
            ids.iter().enumerate().map(|(i, &id)| (id, i)).collect();
        let mut parent: Vec<usize> = (0..ids.len()).collect();

        for package in store.iter() {
            let a = slot[&package.id];
            for other in package.ship_with() {
                if let Some(&b) = slot.get(&other) {
                    union(&mut parent, a, b);
                }
            }
        }

        let mut by_root: BTreeMap<usize, Vec<PackageId>> = BTreeMap::new();
        for (i, &id) in ids.iter().enumerate() {
            by_root.entry(find(&mut parent, i)).or_default().push(id);
        }

        let mut groups: Vec<Vec<PackageId>> =
            by_root.into_values().filter(|members| members.len() > 1).collect();
        groups.sort_by_key(|members| members[0]);

        let mut group_of = BTreeMap::new();
        for (g, members) in groups.iter().enumerate() {
            for &id in members {
                group_of.insert(id, g);
            }
        }
        Self { groups, group_of }
    }

    /// The group containing `package`, if it belongs to one.
    pub fn group_of(&self, package: PackageId) -> Option<&[PackageId]> {
        self.group_of.get(&package).map(|&g| self.groups[g].as_slice())
    }

    pub fn is_grouped(&self, package: PackageId) -> bool {
        self.group_of.contains_key(&package)
    }

    pub fn iter(&self) -> impl Iterator<Item = &[PackageId]> + '_ {
        self.groups.iter().map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

fn find(parent: &mut [usize], mut i: usize) -> usize {
    while parent[i] != i {
        parent[i] = parent[parent[i]];
        i = parent[i];
    }
    i
}

fn union(parent: &mut [usize], a: usize, b: usize) {
    let (ra, rb) = (find(parent, a), find(parent, b));
    if ra != rb {
        // Smaller slot wins so roots stay stable across builds.
        let (lo, hi) = if ra < rb { (ra, rb) } else { (rb, ra) };
        parent[hi] = lo;
    }
}
