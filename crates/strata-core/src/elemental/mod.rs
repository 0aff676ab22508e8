//! The element/attribute store.
//!
//! One store holds every element of a model, every non-default attribute
//! entry, and every live update tracker. The store is the single owner of
//! all model data; trackers are plain state the store fans writes out to,
//! so a tracker can not outlive its store.
//!
//! # Module Organization
//!
//! - [`attrs`]: element types and the closed attribute vocabulary
//! - [`key`]: fixed-arity key tuples (ordered and symmetric)
//! - [`map`]: sparse storage with per-slot reverse indexes
//! - [`diff`]: per-tracker change state
//! - [`elements`]: per-type id/name registry
//! - [`export`]: snapshots, update patches, and patch application
//! - [`error`]: store errors

pub mod attrs;
pub mod diff;
mod elements;
pub mod error;
pub mod export;
pub mod key;
mod map;

use std::collections::{BTreeMap, BTreeSet};

use attrs::{
    Attribute, BoolAttr0, BoolAttr1, DoubleAttr0, DoubleAttr1, DoubleAttr2, ElementType, IntAttr1,
    SymmetricDoubleAttr2, SymmetricDoubleAttr3,
};
use diff::{Diff, DiffId};
use elements::ElementRegistry;
use error::ElementalError;
use key::{AttrKey, ElementId};

pub(crate) use attrs::AttrTables;
pub use map::AttrMap;

/// Attribute-oriented model store with multicast change tracking.
#[derive(Debug, Clone, Default)]
pub struct Elemental {
    elements: [ElementRegistry; ElementType::COUNT],
    attrs: AttrTables,
    diffs: BTreeMap<DiffId, Diff>,
    next_diff_id: i64,
}

impl Elemental {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    // ── Elements ────────────────────────────────────────────

    /// Create an element and return its freshly allocated id.
    pub fn add_element(&mut self, element_type: ElementType, name: &str) -> ElementId {
        self.elements[element_type.index()].add(name)
    }

    /// Create an element under an externally assigned id (patch import).
    pub(crate) fn add_element_with_id(
        &mut self,
        element_type: ElementType,
        id: ElementId,
        name: &str,
    ) -> Result<(), ElementalError> {
        if self.elements[element_type.index()].add_with_id(id, name) {
            Ok(())
        } else {
            Err(ElementalError::DuplicateElement { element_type, id })
        }
    }

    /// Delete an element and every attribute entry mentioning it in any
    /// key slot. Returns false if the id is unknown or already deleted.
    pub fn delete_element(&mut self, element_type: ElementType, id: ElementId) -> bool {
        if !self.elements[element_type.index()].remove(id) {
            return false;
        }
        self.cascade::<BoolAttr0>(element_type, id);
        self.cascade::<DoubleAttr0>(element_type, id);
        self.cascade::<BoolAttr1>(element_type, id);
        self.cascade::<IntAttr1>(element_type, id);
        self.cascade::<DoubleAttr1>(element_type, id);
        self.cascade::<DoubleAttr2>(element_type, id);
        self.cascade::<SymmetricDoubleAttr2>(element_type, id);
        self.cascade::<SymmetricDoubleAttr3>(element_type, id);
        for tracker in self.diffs.values_mut() {
            tracker.record_delete(element_type, id);
        }
        true
    }

    pub fn has_element(&self, element_type: ElementType, id: ElementId) -> bool {
        self.elements[element_type.index()].exists(id)
    }

    pub fn element_name(
        &self,
        element_type: ElementType,
        id: ElementId,
    ) -> Result<&str, ElementalError> {
        self.elements[element_type.index()]
            .name(id)
            .ok_or(ElementalError::UnknownElement { element_type, id })
    }

    /// Live ids of a type, ascending.
    pub fn element_ids(&self, element_type: ElementType) -> Vec<ElementId> {
        self.elements[element_type.index()].ids().collect()
    }

    pub fn num_elements(&self, element_type: ElementType) -> usize {
        self.elements[element_type.index()].len()
    }

    /// The id the next `add_element` of this type will return.
    pub fn next_element_id(&self, element_type: ElementType) -> ElementId {
        self.elements[element_type.index()].next_id()
    }

    /// Raise the id watermark so locally allocated ids never collide with
    /// remotely assigned ones.
    pub fn ensure_next_id_at_least(&mut self, element_type: ElementType, id: ElementId) {
        self.elements[element_type.index()].ensure_next_id_at_least(id);
    }

    // ── Attributes ──────────────────────────────────────────

    /// Read an attribute; unset keys read the declared default.
    pub fn get_attr<A: Attribute>(&self, attr: A, key: A::Key) -> Result<A::Value, ElementalError> {
        self.validate_key(attr, key)?;
        Ok(A::table(&self.attrs)
            .get(&attr)
            .map(|map| map.get(key))
            .unwrap_or_else(|| attr.default_value()))
    }

    /// Write an attribute; writing the default clears the sparse entry.
    /// Every live tracker observes the write before this returns.
    pub fn set_attr<A: Attribute>(
        &mut self,
        attr: A,
        key: A::Key,
        value: A::Value,
    ) -> Result<(), ElementalError> {
        self.validate_key(attr, key)?;
        let map = A::table_mut(&mut self.attrs)
            .entry(attr)
            .or_insert_with(|| AttrMap::new(attr.default_value()));
        if map.set(key, value) {
            for tracker in self.diffs.values_mut() {
                tracker.record(attr, key);
            }
        }
        Ok(())
    }

    /// Whether a non-default entry is stored for the key.
    pub fn attr_is_set<A: Attribute>(&self, attr: A, key: A::Key) -> Result<bool, ElementalError> {
        self.validate_key(attr, key)?;
        Ok(A::table(&self.attrs)
            .get(&attr)
            .map(|map| map.is_set(key))
            .unwrap_or(false))
    }

    /// Sorted keys holding non-default values.
    pub fn get_attr_non_defaults<A: Attribute>(&self, attr: A) -> Vec<A::Key> {
        A::table(&self.attrs)
            .get(&attr)
            .map(|map| map.non_default_keys())
            .unwrap_or_default()
    }

    pub fn num_non_defaults<A: Attribute>(&self, attr: A) -> usize {
        A::table(&self.attrs)
            .get(&attr)
            .map(|map| map.len())
            .unwrap_or(0)
    }

    /// Bulk write. Validates every key (existence, no repeats) before
    /// applying anything; a failure applies nothing.
    pub fn set_attrs<A: Attribute>(
        &mut self,
        attr: A,
        entries: &[(A::Key, A::Value)],
    ) -> Result<(), ElementalError> {
        let mut seen: BTreeSet<A::Key> = BTreeSet::new();
        for (key, _) in entries {
            if !seen.insert(*key) {
                return Err(ElementalError::DuplicateKey {
                    attr: attr.as_str(),
                });
            }
            self.validate_key(attr, *key)?;
        }
        for (key, value) in entries {
            self.set_attr(attr, *key, *value)?;
        }
        Ok(())
    }

    /// Sorted keys mentioning `id` at the given key slot (row/column
    /// enumeration).
    pub fn attr_keys_with<A: Attribute>(
        &self,
        attr: A,
        slot: usize,
        id: ElementId,
    ) -> Result<Vec<A::Key>, ElementalError> {
        let types = attr.key_types();
        assert!(slot < types.len(), "slot index out of range for attribute");
        let element_type = types[slot];
        if !self.elements[element_type.index()].exists(id) {
            return Err(ElementalError::UnknownElement { element_type, id });
        }
        Ok(A::table(&self.attrs)
            .get(&attr)
            .map(|map| map.keys_with(slot, id))
            .unwrap_or_default())
    }

    fn validate_key<A: Attribute>(&self, attr: A, key: A::Key) -> Result<(), ElementalError> {
        for (slot, element_type) in attr.key_types().iter().enumerate() {
            let id = key.slot(slot);
            if !self.elements[element_type.index()].exists(id) {
                return Err(ElementalError::UnknownElement {
                    element_type: *element_type,
                    id,
                });
            }
        }
        Ok(())
    }

    fn cascade<A: Attribute>(&mut self, element_type: ElementType, id: ElementId) {
        for (attr, map) in A::table_mut(&mut self.attrs).iter_mut() {
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
            map.delete_in_slots(&slots, id);
        }
    }

    // ── Update trackers ─────────────────────────────────────

    /// Register a tracker; it observes every mutation from this point on.
    pub fn add_diff(&mut self) -> DiffId {
        let id = DiffId::new(self.next_diff_id);
        self.next_diff_id += 1;
        self.diffs.insert(id, Diff::at_checkpoint(self.next_ids()));
        id
    }

    /// Clear one tracker's pending state; its next export starts from now.
    pub fn advance_diff(&mut self, diff: DiffId) -> Result<(), ElementalError> {
        let next_ids = self.next_ids();
        match self.diffs.get_mut(&diff) {
            Some(state) => {
                state.advance(next_ids);
                Ok(())
            }
            None => Err(ElementalError::UsedAfterRemoval { diff }),
        }
    }

    /// Remove a tracker. Any later use of the id fails loudly.
    pub fn remove_diff(&mut self, diff: DiffId) -> Result<(), ElementalError> {
        self.diffs
            .remove(&diff)
            .map(|_| ())
            .ok_or(ElementalError::UsedAfterRemoval { diff })
    }

    pub fn num_diffs(&self) -> usize {
        self.diffs.len()
    }

    pub(crate) fn diff_state(&self, diff: DiffId) -> Result<&Diff, ElementalError> {
        self.diffs
            .get(&diff)
            .ok_or(ElementalError::UsedAfterRemoval { diff })
    }

    pub(crate) fn tables(&self) -> &AttrTables {
        &self.attrs
    }

    pub(crate) fn registry(&self, element_type: ElementType) -> &ElementRegistry {
        &self.elements[element_type.index()]
    }

    pub(crate) fn next_ids(&self) -> [ElementId; ElementType::COUNT] {
        std::array::from_fn(|index| self.elements[index].next_id())
    }
}
