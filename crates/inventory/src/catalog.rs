//! Grouped stock: one FIFO queue per beverage kind.
//!
//! Invariants kept by every operation:
//! - at most one group per kind
//! - every unit in a group has the group's kind
//! - no group is empty (emptied groups are pruned right away, shifting the
//!   later groups one position left)
//! - groups keep the order in which their kind first appeared

use std::collections::{BTreeMap, VecDeque};

use chrono::{DateTime, Utc};

use vending_core::{VendingError, VendingResult};

use crate::beverage::{Beverage, BeverageKind, ShelfLife};

/// Ordered units of a single kind; the front is the oldest-added unit.
#[derive(Debug, Clone)]
pub struct StockGroup {
    kind: BeverageKind,
    units: VecDeque<Beverage>,
}

impl StockGroup {
    /// Fails on an empty batch or on mixed kinds.
    pub fn from_units(units: Vec<Beverage>) -> VendingResult<Self> {
        let kind = uniform_kind(&units)?;
        Ok(Self {
            kind,
            units: units.into(),
        })
    }

    pub fn kind(&self) -> BeverageKind {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// The unit the next purchase would hand out.
    pub fn front(&self) -> Option<&Beverage> {
        self.units.front()
    }

    pub fn get(&self, position: usize) -> Option<&Beverage> {
        self.units.get(position)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Beverage> {
        self.units.iter()
    }

    pub fn to_vec(&self) -> Vec<Beverage> {
        self.units.iter().cloned().collect()
    }
}

/// Units of one kind found past their shelf life, keyed by position in the group.
///
/// Positions refer to the group as it was when the set was built; they are only
/// meaningful until the next mutation of that group.
#[derive(Debug, Clone)]
pub struct ExpiredSet {
    kind: BeverageKind,
    units: BTreeMap<usize, Beverage>,
}

impl ExpiredSet {
    pub fn new(kind: BeverageKind) -> Self {
        Self {
            kind,
            units: BTreeMap::new(),
        }
    }

    pub fn insert(&mut self, position: usize, unit: Beverage) {
        self.units.insert(position, unit);
    }

    pub fn kind(&self) -> BeverageKind {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn units(&self) -> &BTreeMap<usize, Beverage> {
        &self.units
    }

    /// Positions highest first: the only order in which removing one position
    /// leaves the remaining (lower) positions valid.
    pub fn positions_descending(&self) -> Vec<usize> {
        self.units.keys().rev().copied().collect()
    }
}

/// The machine's grouped inventory.
#[derive(Debug, Clone, Default)]
pub struct StockCatalog {
    groups: Vec<StockGroup>,
}

impl StockCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a catalog from raw per-group unit lists (seed data, snapshots).
    ///
    /// Lists of a kind already seen are merged into the first group of that
    /// kind, empty lists are dropped, and a list mixing kinds is rejected.
    pub fn from_unit_lists(lists: Vec<Vec<Beverage>>) -> VendingResult<Self> {
        let mut catalog = Self::new();
        for units in lists {
            if units.is_empty() {
                continue;
            }
            let group = StockGroup::from_units(units)
                .map_err(|e| VendingError::invariant(format!("corrupt stock group: {e}")))?;
            catalog.merge_group(group);
        }
        Ok(catalog)
    }

    pub fn groups(&self) -> &[StockGroup] {
        &self.groups
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn total_units(&self) -> usize {
        self.groups.iter().map(StockGroup::len).sum()
    }

    pub fn position_of(&self, kind: BeverageKind) -> Option<usize> {
        self.groups.iter().position(|g| g.kind == kind)
    }

    pub fn group(&self, index: usize) -> VendingResult<&StockGroup> {
        self.groups
            .get(index)
            .ok_or_else(|| VendingError::index_out_of_range(index, self.groups.len()))
    }

    /// Oldest unit of the group at `index`, without removing it.
    pub fn peek_first(&self, index: usize) -> VendingResult<&Beverage> {
        let group = self.group(index)?;
        group
            .front()
            .ok_or_else(|| VendingError::invariant(format!("stock group {index} is empty")))
    }

    /// Removes and returns the oldest unit of the group at `index`.
    ///
    /// When the group runs dry it is removed and every later group shifts one
    /// position left; indices held across this call are stale.
    pub fn take_first(&mut self, index: usize) -> VendingResult<Beverage> {
        let len = self.groups.len();
        let group = self
            .groups
            .get_mut(index)
            .ok_or_else(|| VendingError::index_out_of_range(index, len))?;

        let unit = group
            .units
            .pop_front()
            .ok_or_else(|| VendingError::invariant(format!("stock group {index} is empty")))?;

        if group.units.is_empty() {
            let pruned = self.groups.remove(index);
            tracing::debug!(kind = %pruned.kind, index, "stock group sold out");
        }

        Ok(unit)
    }

    /// Appends a same-kind batch to the group of that kind, creating the group
    /// at the end of the catalog if the kind is new. Returns the merged group.
    pub fn add_units(&mut self, units: Vec<Beverage>) -> VendingResult<&StockGroup> {
        if units.is_empty() {
            return Err(VendingError::EmptyRestockBatch);
        }
        let group = StockGroup::from_units(units)?;
        let index = self.merge_group(group);
        Ok(&self.groups[index])
    }

    /// Per group, the units whose age reached `shelf_life` at `as_of`.
    ///
    /// Pure query. Groups with nothing expired are left out of the result.
    pub fn sweep_expired(
        &self,
        as_of: DateTime<Utc>,
        shelf_life: ShelfLife,
    ) -> VendingResult<Vec<ExpiredSet>> {
        if self.groups.is_empty() {
            return Err(VendingError::OutOfStock);
        }

        let sets: Vec<ExpiredSet> = self
            .groups
            .iter()
            .filter_map(|group| {
                let mut set = ExpiredSet::new(group.kind);
                for (position, unit) in group.units.iter().enumerate() {
                    if unit.is_expired(as_of, shelf_life) {
                        set.insert(position, unit.clone());
                    }
                }
                (!set.is_empty()).then_some(set)
            })
            .collect();

        if sets.is_empty() {
            return Err(VendingError::NoExpiredStock);
        }
        Ok(sets)
    }

    /// Removes the units named by `expired` and returns them in a flat list.
    ///
    /// All positions are validated before anything is removed, so a stale or
    /// malformed input leaves the catalog untouched. Sets whose kind has no
    /// group any more are skipped; several sets for one kind are merged.
    /// Within a group, positions are removed highest first, and emptied groups
    /// are pruned only after every removal is done.
    pub fn remove_expired(&mut self, expired: &[ExpiredSet]) -> VendingResult<Vec<Beverage>> {
        if self.groups.is_empty() {
            return Err(VendingError::OutOfStock);
        }

        let mut plan: Vec<(usize, ExpiredSet)> = Vec::new();
        for set in expired {
            let Some(group_index) = self.position_of(set.kind) else {
                tracing::debug!(kind = %set.kind, "expired set for a kind no longer stocked");
                continue;
            };
            let group_len = self.groups[group_index].len();
            if let Some(&position) = set.units.keys().find(|&&p| p >= group_len) {
                return Err(VendingError::index_out_of_range(position, group_len));
            }

            match plan.iter_mut().find(|(index, _)| *index == group_index) {
                Some((_, merged)) => merged
                    .units
                    .extend(set.units.iter().map(|(&p, unit)| (p, unit.clone()))),
                None => plan.push((group_index, set.clone())),
            }
        }

        let mut removed = Vec::new();
        for (group_index, merged) in plan {
            let group = &mut self.groups[group_index];
            for position in merged.positions_descending() {
                if let Some(unit) = group.units.remove(position) {
                    removed.push(unit);
                }
            }
        }

        let before = self.groups.len();
        self.groups.retain(|g| !g.units.is_empty());
        tracing::debug!(
            removed = removed.len(),
            pruned_groups = before - self.groups.len(),
            "expired units removed"
        );

        Ok(removed)
    }

    /// Appends into the existing group of the same kind or adds a new group.
    fn merge_group(&mut self, group: StockGroup) -> usize {
        match self.position_of(group.kind) {
            Some(index) => {
                self.groups[index].units.extend(group.units);
                index
            }
            None => {
                self.groups.push(group);
                self.groups.len() - 1
            }
        }
    }
}

fn uniform_kind(units: &[Beverage]) -> VendingResult<BeverageKind> {
    let first = units.first().ok_or(VendingError::EmptyRestockBatch)?;
    let kind = first.kind();
    if let Some(other) = units.iter().find(|u| u.kind() != kind) {
        return Err(VendingError::validation(format!(
            "batch mixes kinds {kind} and {}",
            other.kind()
        )));
    }
    Ok(kind)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::product::Product;
    use chrono::{Duration, TimeZone};
    use proptest::prelude::*;

    fn today() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    }

    fn days_ago(days: i64) -> DateTime<Utc> {
        today() - Duration::days(days)
    }

    fn stamps(group: &StockGroup) -> Vec<DateTime<Utc>> {
        group.iter().map(Beverage::manufactured_at).collect()
    }

    fn catalog_of(lists: Vec<Vec<Beverage>>) -> StockCatalog {
        StockCatalog::from_unit_lists(lists).unwrap()
    }

    #[test]
    fn take_first_serves_oldest_added_unit() {
        let (a, b, c) = (days_ago(3), days_ago(2), days_ago(1));
        let mut catalog = catalog_of(vec![vec![
            Product::DietCoke.unit(a),
            Product::DietCoke.unit(b),
            Product::DietCoke.unit(c),
        ]]);

        assert_eq!(catalog.take_first(0).unwrap().manufactured_at(), a);
        assert_eq!(catalog.take_first(0).unwrap().manufactured_at(), b);
        assert_eq!(catalog.take_first(0).unwrap().manufactured_at(), c);
        assert!(catalog.is_empty());
    }

    #[test]
    fn sold_out_group_is_pruned_and_later_groups_shift_left() {
        let mut catalog = catalog_of(vec![
            Product::DietCoke.batch(2, today()),
            Product::ChilsungCider.batch(1, today()),
            Product::OrangeFanta.batch(3, today()),
        ]);

        let sold = catalog.take_first(1).unwrap();
        assert_eq!(sold.kind(), BeverageKind::Cider);

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.position_of(BeverageKind::Cider), None);
        assert_eq!(catalog.groups()[1].kind(), BeverageKind::Fanta);
        assert_eq!(catalog.groups()[1].len(), 3);
    }

    #[test]
    fn take_first_rejects_out_of_range_index() {
        let mut catalog = catalog_of(vec![Product::DietCoke.batch(1, today())]);
        let err = catalog.take_first(1).unwrap_err();
        assert_eq!(err, VendingError::index_out_of_range(1, 1));
        assert_eq!(catalog.total_units(), 1);
    }

    #[test]
    fn restock_merges_into_existing_group() {
        let mut catalog = catalog_of(vec![
            vec![Product::DietCoke.unit(days_ago(5)), Product::DietCoke.unit(days_ago(4))],
            Product::OrangeFanta.batch(1, today()),
        ]);

        let merged = catalog
            .add_units(vec![Product::DietCoke.unit(days_ago(1)), Product::DietCoke.unit(today())])
            .unwrap();

        assert_eq!(
            stamps(merged),
            vec![days_ago(5), days_ago(4), days_ago(1), today()]
        );
        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn restock_of_new_kind_appends_group_at_end() {
        let mut catalog = catalog_of(vec![Product::DietCoke.batch(1, today())]);
        catalog.add_units(Product::GeorgiaCoffee.batch(2, today())).unwrap();

        assert_eq!(catalog.position_of(BeverageKind::GeorgiaCoffee), Some(1));
    }

    #[test]
    fn restock_rejects_empty_and_mixed_batches() {
        let mut catalog = StockCatalog::new();
        assert_eq!(catalog.add_units(Vec::new()).unwrap_err(), VendingError::EmptyRestockBatch);

        let mixed = vec![Product::DietCoke.unit(today()), Product::OrangeFanta.unit(today())];
        assert!(matches!(catalog.add_units(mixed), Err(VendingError::Validation(_))));
        assert!(catalog.is_empty());
    }

    #[test]
    fn sweep_includes_exactly_fourteen_days_and_excludes_thirteen() {
        let catalog = catalog_of(vec![vec![
            Product::SeoulChocoMilk.unit(days_ago(13)),
            Product::SeoulChocoMilk.unit(days_ago(14)),
        ]]);

        let sets = catalog.sweep_expired(today(), ShelfLife::default()).unwrap();
        assert_eq!(sets.len(), 1);
        assert_eq!(sets[0].positions_descending(), vec![1]);
    }

    #[test]
    fn sweep_reports_empty_catalog_and_nothing_expired() {
        let empty = StockCatalog::new();
        assert_eq!(
            empty.sweep_expired(today(), ShelfLife::default()).unwrap_err(),
            VendingError::OutOfStock
        );

        let fresh = catalog_of(vec![Product::DietCoke.batch(2, today())]);
        assert_eq!(
            fresh.sweep_expired(today(), ShelfLife::default()).unwrap_err(),
            VendingError::NoExpiredStock
        );
    }

    #[test]
    fn sweep_does_not_mutate() {
        let catalog = catalog_of(vec![Product::DietCoke.batch(2, days_ago(30))]);
        let _ = catalog.sweep_expired(today(), ShelfLife::default()).unwrap();
        assert_eq!(catalog.total_units(), 2);
    }

    #[test]
    fn remove_expired_drops_positions_one_and_three_of_five() {
        let made: Vec<_> = (0..5).map(|i| days_ago(20 - i)).collect();
        let mut catalog = catalog_of(vec![made
            .iter()
            .map(|&m| Product::OrangeFanta.unit(m))
            .collect()]);

        // Inserted out of order on purpose.
        let mut set = ExpiredSet::new(BeverageKind::Fanta);
        set.insert(3, Product::OrangeFanta.unit(made[3]));
        set.insert(1, Product::OrangeFanta.unit(made[1]));

        let removed = catalog.remove_expired(&[set]).unwrap();

        let removed_stamps: Vec<_> = removed.iter().map(Beverage::manufactured_at).collect();
        assert_eq!(removed_stamps, vec![made[3], made[1]]);
        assert_eq!(stamps(&catalog.groups()[0]), vec![made[0], made[2], made[4]]);
    }

    #[test]
    fn remove_expired_prunes_groups_left_empty() {
        let mut catalog = catalog_of(vec![
            Product::DietCoke.batch(2, days_ago(20)),
            Product::OrangeFanta.batch(1, today()),
        ]);

        let sets = catalog.sweep_expired(today(), ShelfLife::default()).unwrap();
        let removed = catalog.remove_expired(&sets).unwrap();

        assert_eq!(removed.len(), 2);
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.groups()[0].kind(), BeverageKind::Fanta);
    }

    #[test]
    fn remove_expired_with_stale_position_changes_nothing() {
        let mut catalog = catalog_of(vec![
            Product::DietCoke.batch(3, days_ago(20)),
            Product::OrangeFanta.batch(2, days_ago(20)),
        ]);

        let mut good = ExpiredSet::new(BeverageKind::Coke);
        good.insert(0, Product::DietCoke.unit(days_ago(20)));
        let mut stale = ExpiredSet::new(BeverageKind::Fanta);
        stale.insert(5, Product::OrangeFanta.unit(days_ago(20)));

        let err = catalog.remove_expired(&[good, stale]).unwrap_err();
        assert_eq!(err, VendingError::index_out_of_range(5, 2));
        assert_eq!(catalog.total_units(), 5);
    }

    #[test]
    fn remove_expired_skips_unknown_kinds_and_merges_duplicates() {
        let mut catalog = catalog_of(vec![Product::DietCoke.batch(4, days_ago(20))]);

        let mut first = ExpiredSet::new(BeverageKind::Coke);
        first.insert(0, Product::DietCoke.unit(days_ago(20)));
        let mut second = ExpiredSet::new(BeverageKind::Coke);
        second.insert(0, Product::DietCoke.unit(days_ago(20)));
        second.insert(2, Product::DietCoke.unit(days_ago(20)));
        let mut gone = ExpiredSet::new(BeverageKind::Cider);
        gone.insert(0, Product::ChilsungCider.unit(days_ago(20)));

        let removed = catalog.remove_expired(&[first, gone, second]).unwrap();
        assert_eq!(removed.len(), 2);
        assert_eq!(catalog.total_units(), 2);
    }

    #[test]
    fn interleaved_sets_for_one_kind_are_removed_highest_first() {
        let made: Vec<_> = (0..5).map(|i| days_ago(30 - i)).collect();
        let mut catalog = catalog_of(vec![made
            .iter()
            .map(|&m| Product::TopCoffee.unit(m))
            .collect()]);

        let mut evens = ExpiredSet::new(BeverageKind::TopCoffee);
        evens.insert(0, Product::TopCoffee.unit(made[0]));
        evens.insert(3, Product::TopCoffee.unit(made[3]));
        let mut odds = ExpiredSet::new(BeverageKind::TopCoffee);
        odds.insert(4, Product::TopCoffee.unit(made[4]));
        odds.insert(1, Product::TopCoffee.unit(made[1]));

        let removed = catalog.remove_expired(&[evens, odds]).unwrap();

        let removed_stamps: Vec<_> = removed.iter().map(Beverage::manufactured_at).collect();
        assert_eq!(removed_stamps, vec![made[4], made[3], made[1], made[0]]);
        assert_eq!(stamps(&catalog.groups()[0]), vec![made[2]]);
    }

    #[test]
    fn remove_expired_on_empty_catalog_is_out_of_stock() {
        let mut catalog = StockCatalog::new();
        assert_eq!(catalog.remove_expired(&[]).unwrap_err(), VendingError::OutOfStock);
    }

    #[test]
    fn from_unit_lists_restores_invariants() {
        let catalog = catalog_of(vec![
            Product::DietCoke.batch(1, days_ago(2)),
            Vec::new(),
            Product::OrangeFanta.batch(1, today()),
            Product::DietCoke.batch(2, days_ago(1)),
        ]);

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.groups()[0].kind(), BeverageKind::Coke);
        assert_eq!(
            stamps(&catalog.groups()[0]),
            vec![days_ago(2), days_ago(1), days_ago(1)]
        );

        let mixed = vec![vec![Product::DietCoke.unit(today()), Product::OrangeFanta.unit(today())]];
        assert!(matches!(
            StockCatalog::from_unit_lists(mixed),
            Err(VendingError::InvariantViolation(_))
        ));
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: removing any subset of positions keeps the survivors in
        /// their original relative order and returns exactly the chosen units.
        #[test]
        fn removal_keeps_survivors_in_order(
            ages in prop::collection::vec(0i64..40, 1..12),
            picks in prop::collection::vec(any::<bool>(), 12),
        ) {
            let made: Vec<_> = ages.iter().enumerate()
                .map(|(i, &age)| days_ago(age) + Duration::seconds(i as i64))
                .collect();
            let mut catalog = catalog_of(vec![made.iter().map(|&m| Product::DietCoke.unit(m)).collect()]);

            let mut set = ExpiredSet::new(BeverageKind::Coke);
            for (position, &m) in made.iter().enumerate() {
                if picks[position] {
                    set.insert(position, Product::DietCoke.unit(m));
                }
            }

            let removed = catalog.remove_expired(&[set]).unwrap();

            let expected_removed: Vec<_> = made.iter().enumerate().rev()
                .filter(|(p, _)| picks[*p]).map(|(_, &m)| m).collect();
            let expected_left: Vec<_> = made.iter().enumerate()
                .filter(|(p, _)| !picks[*p]).map(|(_, &m)| m).collect();

            prop_assert_eq!(removed.iter().map(Beverage::manufactured_at).collect::<Vec<_>>(), expected_removed);
            let left = catalog.groups().first().map(stamps).unwrap_or_default();
            prop_assert_eq!(left, expected_left);
        }

        /// Property: restocking m units onto a group of n yields one group of n + m.
        #[test]
        fn restock_merge_counts(n in 1usize..20, m in 1usize..20) {
            let mut catalog = catalog_of(vec![Product::TopCoffee.batch(n, today())]);
            let merged_len = catalog.add_units(Product::TopCoffee.batch(m, today())).unwrap().len();
            prop_assert_eq!(merged_len, n + m);
            prop_assert_eq!(catalog.len(), 1);
        }
    }
}
