//! Per-diff change tracking state.
//!
//! A diff is one observer's view of "what changed since I last looked".
//! The store owns every live diff and fans each mutation out to all of them
//! synchronously; this module only holds the per-diff bookkeeping.
//!
//! Elements created at or after a diff's checkpoint are "new": their
//! attribute writes are not tracked key-by-key, because an update export
//! ships new elements wholesale. Tracked keys mentioning an element are
//! scrubbed when that element is deleted; pre-checkpoint deletions are
//! remembered instead.

use std::collections::{BTreeMap, BTreeSet};

use super::attrs::{
    Attribute, BoolAttr0, BoolAttr1, DoubleAttr0, DoubleAttr1, DoubleAttr2, ElementType, IntAttr1,
    SymmetricDoubleAttr2, SymmetricDoubleAttr3,
};
use super::key::{AttrKey, ElementId, Key0, Key1, Key2, QuadKey, SymPair};

/// Handle to an update tracker registered on a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct DiffId(i64);

impl DiffId {
    /// Get the inner i64 value.
    pub fn inner(self) -> i64 {
        self.0
    }

    /// Create an ID from an i64 value.
    pub fn new(value: i64) -> Self {
        Self(value)
    }
}

/// Pending modified-key sets, one map per attribute family.
///
/// Public only because [`Attribute`] projects families onto it; the fields
/// are crate-private.
#[derive(Debug, Clone, Default)]
pub struct DiffPending {
    pub(crate) bool0: BTreeMap<BoolAttr0, BTreeSet<Key0>>,
    pub(crate) double0: BTreeMap<DoubleAttr0, BTreeSet<Key0>>,
    pub(crate) bool1: BTreeMap<BoolAttr1, BTreeSet<Key1>>,
    pub(crate) int1: BTreeMap<IntAttr1, BTreeSet<Key1>>,
    pub(crate) double1: BTreeMap<DoubleAttr1, BTreeSet<Key1>>,
    pub(crate) double2: BTreeMap<DoubleAttr2, BTreeSet<Key2>>,
    pub(crate) sym_double2: BTreeMap<SymmetricDoubleAttr2, BTreeSet<SymPair>>,
    pub(crate) sym_double3: BTreeMap<SymmetricDoubleAttr3, BTreeSet<QuadKey>>,
}

impl DiffPending {
    pub fn is_empty(&self) -> bool {
        fn all_empty<A: Attribute>(map: &BTreeMap<A, BTreeSet<A::Key>>) -> bool {
            map.values().all(BTreeSet::is_empty)
        }
        all_empty(&self.bool0)
            && all_empty(&self.double0)
            && all_empty(&self.bool1)
            && all_empty(&self.int1)
            && all_empty(&self.double1)
            && all_empty(&self.double2)
            && all_empty(&self.sym_double2)
            && all_empty(&self.sym_double3)
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Diff {
    /// Per element type: ids below this existed at the baseline.
    checkpoint: [ElementId; ElementType::COUNT],
    /// Pre-checkpoint elements deleted since the baseline.
    deleted: [BTreeSet<ElementId>; ElementType::COUNT],
    pending: DiffPending,
}

impl Diff {
    pub fn at_checkpoint(checkpoint: [ElementId; ElementType::COUNT]) -> Self {
        Self {
            checkpoint,
            deleted: std::array::from_fn(|_| BTreeSet::new()),
            pending: DiffPending::default(),
        }
    }

    pub fn checkpoint(&self, element_type: ElementType) -> ElementId {
        self.checkpoint[element_type.index()]
    }

    pub fn checkpoints(&self) -> &[ElementId; ElementType::COUNT] {
        &self.checkpoint
    }

    pub fn deleted(&self, element_type: ElementType) -> &BTreeSet<ElementId> {
        &self.deleted[element_type.index()]
    }

    pub fn pending(&self) -> &DiffPending {
        &self.pending
    }

    /// Whether an element predates this diff's baseline.
    pub fn predates(&self, element_type: ElementType, id: ElementId) -> bool {
        id < self.checkpoint[element_type.index()]
    }

    /// Track an attribute write. Keys touching any post-checkpoint element
    /// are skipped; those elements export wholesale.
    pub fn record<A: Attribute>(&mut self, attr: A, key: A::Key) {
        for (slot, element_type) in attr.key_types().iter().enumerate() {
            if !self.predates(*element_type, key.slot(slot)) {
                return;
            }
        }
        A::pending(&mut self.pending)
            .entry(attr)
            .or_default()
            .insert(key);
    }

    /// Track an element deletion and drop every tracked key mentioning it.
    pub fn record_delete(&mut self, element_type: ElementType, id: ElementId) {
        if self.predates(element_type, id) {
            self.deleted[element_type.index()].insert(id);
        }
        self.scrub::<BoolAttr0>(element_type, id);
        self.scrub::<DoubleAttr0>(element_type, id);
        self.scrub::<BoolAttr1>(element_type, id);
        self.scrub::<IntAttr1>(element_type, id);
        self.scrub::<DoubleAttr1>(element_type, id);
        self.scrub::<DoubleAttr2>(element_type, id);
        self.scrub::<SymmetricDoubleAttr2>(element_type, id);
        self.scrub::<SymmetricDoubleAttr3>(element_type, id);
    }

    /// Re-baseline: everything up to now counts as seen.
    pub fn advance(&mut self, checkpoint: [ElementId; ElementType::COUNT]) {
        self.checkpoint = checkpoint;
        self.deleted = std::array::from_fn(|_| BTreeSet::new());
        self.pending = DiffPending::default();
    }

    /// Whether nothing happened since the baseline, given the store's
    /// current id watermarks.
    pub fn is_empty(&self, next_ids: &[ElementId; ElementType::COUNT]) -> bool {
        self.checkpoint == *next_ids
            && self.deleted.iter().all(BTreeSet::is_empty)
            && self.pending.is_empty()
    }

    fn scrub<A: Attribute>(&mut self, element_type: ElementType, id: ElementId) {
        for (attr, keys) in A::pending(&mut self.pending).iter_mut() {
            let slots: Vec<usize> = attr
                .key_types()
                .iter()
                .enumerate()
                .filter(|(_, t)| **t == element_type)
                .map(|(slot, _)| slot)
                .collect();
            if slots.is_empty() {
                continue;
            }
            keys.retain(|key| slots.iter().all(|&slot| key.slot(slot) != id));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Diff, DiffId};
    use crate::elemental::attrs::{DoubleAttr1, DoubleAttr2, ElementType};
    use crate::elemental::key::{Key1, Key2};

    fn checkpoint(variables: i64, linear_constraints: i64) -> [i64; ElementType::COUNT] {
        let mut next_ids = [0; ElementType::COUNT];
        next_ids[ElementType::Variable.index()] = variables;
        next_ids[ElementType::LinearConstraint.index()] = linear_constraints;
        next_ids
    }

    #[test]
    fn diff_id_roundtrip() {
        assert_eq!(DiffId::new(4).inner(), 4);
    }

    #[test]
    fn writes_to_new_elements_are_not_tracked() {
        let mut diff = Diff::at_checkpoint(checkpoint(2, 0));
        diff.record(DoubleAttr1::VariableLowerBound, Key1(1));
        diff.record(DoubleAttr1::VariableLowerBound, Key1(2));
        let tracked = &diff.pending().double1[&DoubleAttr1::VariableLowerBound];
        assert!(tracked.contains(&Key1(1)));
        assert!(!tracked.contains(&Key1(2)));
    }

    #[test]
    fn mixed_keys_need_every_slot_old() {
        let mut diff = Diff::at_checkpoint(checkpoint(1, 1));
        // Constraint 0 is old, variable 5 is new: not tracked.
        diff.record(DoubleAttr2::LinearConstraintCoefficient, Key2(0, 5));
        diff.record(DoubleAttr2::LinearConstraintCoefficient, Key2(0, 0));
        let tracked = &diff.pending().double2[&DoubleAttr2::LinearConstraintCoefficient];
        assert_eq!(tracked.len(), 1);
        assert!(tracked.contains(&Key2(0, 0)));
    }

    #[test]
    fn deletion_scrubs_tracked_keys() {
        let mut diff = Diff::at_checkpoint(checkpoint(3, 3));
        diff.record(DoubleAttr2::LinearConstraintCoefficient, Key2(0, 1));
        diff.record(DoubleAttr2::LinearConstraintCoefficient, Key2(0, 2));
        diff.record_delete(ElementType::Variable, 1);
        let tracked = &diff.pending().double2[&DoubleAttr2::LinearConstraintCoefficient];
        assert_eq!(tracked.len(), 1);
        assert!(diff.deleted(ElementType::Variable).contains(&1));
    }

    #[test]
    fn deleting_a_new_element_is_not_reported() {
        let mut diff = Diff::at_checkpoint(checkpoint(2, 0));
        diff.record_delete(ElementType::Variable, 7);
        assert!(diff.deleted(ElementType::Variable).is_empty());
    }

    #[test]
    fn advance_clears_everything() {
        let mut diff = Diff::at_checkpoint(checkpoint(2, 0));
        diff.record(DoubleAttr1::VariableUpperBound, Key1(0));
        diff.record_delete(ElementType::Variable, 1);
        let now = checkpoint(4, 1);
        diff.advance(now);
        assert!(diff.is_empty(&now));
    }

    #[test]
    fn scrub_matches_type_scoped_slots_only() {
        let mut diff = Diff::at_checkpoint(checkpoint(5, 5));
        // Key (3, 3): constraint 3 and variable 3 share a raw id.
        diff.record(DoubleAttr2::LinearConstraintCoefficient, Key2(3, 3));
        diff.record_delete(ElementType::QuadraticConstraint, 3);
        let tracked = &diff.pending().double2[&DoubleAttr2::LinearConstraintCoefficient];
        assert_eq!(tracked.len(), 1);
    }
}
