//! Sparse attribute storage with per-slot reverse indexes.
//!
//! Only non-default entries are stored. Every key slot keeps a reverse
//! index (element id to the keys mentioning it there), maintained on each
//! write; the indexes serve both row/column enumeration and the cascade
//! that removes every entry touching a deleted element.

use std::collections::{BTreeMap, BTreeSet};

use super::key::{AttrKey, ElementId};

/// Public only because [`Attribute`](super::attrs::Attribute) names it in
/// projection signatures; construction and mutation stay crate-private.
#[derive(Debug, Clone)]
pub struct AttrMap<K: AttrKey, V: Copy + PartialEq> {
    default: V,
    entries: BTreeMap<K, V>,
    slots: Vec<BTreeMap<ElementId, BTreeSet<K>>>,
}

impl<K: AttrKey, V: Copy + PartialEq> AttrMap<K, V> {
    pub fn new(default: V) -> Self {
        Self {
            default,
            entries: BTreeMap::new(),
            slots: (0..K::ARITY).map(|_| BTreeMap::new()).collect(),
        }
    }

    pub fn get(&self, key: K) -> V {
        self.entries.get(&key).copied().unwrap_or(self.default)
    }

    pub fn is_set(&self, key: K) -> bool {
        self.entries.contains_key(&key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn entries(&self) -> impl Iterator<Item = (&K, &V)> {
        self.entries.iter()
    }

    /// Sorted non-default keys.
    pub fn non_default_keys(&self) -> Vec<K> {
        self.entries.keys().copied().collect()
    }

    /// Set a value; writing the default removes the sparse entry.
    ///
    /// Returns whether the stored value actually changed.
    pub fn set(&mut self, key: K, value: V) -> bool {
        if value == self.default {
            if self.entries.remove(&key).is_some() {
                self.unindex(key);
                true
            } else {
                false
            }
        } else {
            match self.entries.insert(key, value) {
                Some(previous) => previous != value,
                None => {
                    self.index(key);
                    true
                }
            }
        }
    }

    /// Sorted keys mentioning `id` at the given slot.
    pub fn keys_with(&self, slot: usize, id: ElementId) -> Vec<K> {
        self.slots[slot]
            .get(&id)
            .map(|keys| keys.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Remove every entry whose key mentions `id` in any of the given
    /// slots. Returns the removed keys, sorted.
    pub fn delete_in_slots(&mut self, slot_indices: &[usize], id: ElementId) -> Vec<K> {
        let mut doomed: BTreeSet<K> = BTreeSet::new();
        for &slot in slot_indices {
            if let Some(keys) = self.slots[slot].get(&id) {
                doomed.extend(keys.iter().copied());
            }
        }
        for key in &doomed {
            self.entries.remove(key);
            self.unindex(*key);
        }
        doomed.into_iter().collect()
    }

    fn index(&mut self, key: K) {
        for slot in 0..K::ARITY {
            self.slots[slot]
                .entry(key.slot(slot))
                .or_default()
                .insert(key);
        }
    }

    fn unindex(&mut self, key: K) {
        for slot in 0..K::ARITY {
            let id = key.slot(slot);
            if let Some(keys) = self.slots[slot].get_mut(&id) {
                keys.remove(&key);
                if keys.is_empty() {
                    self.slots[slot].remove(&id);
                }
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::AttrMap;
    use crate::elemental::key::Key2;

    #[test]
    fn unset_keys_read_the_default() {
        let map: AttrMap<Key2, f64> = AttrMap::new(0.0);
        assert_eq!(map.get(Key2(1, 2)), 0.0);
        assert!(!map.is_set(Key2(1, 2)));
    }

    #[test]
    fn setting_the_default_removes_the_entry() {
        let mut map: AttrMap<Key2, f64> = AttrMap::new(0.0);
        assert!(map.set(Key2(1, 2), 3.5));
        assert!(map.is_set(Key2(1, 2)));
        assert!(map.set(Key2(1, 2), 0.0));
        assert!(!map.is_set(Key2(1, 2)));
        assert_eq!(map.len(), 0);
        assert!(map.keys_with(0, 1).is_empty());
    }

    #[test]
    fn rewriting_the_same_value_reports_no_change() {
        let mut map: AttrMap<Key2, f64> = AttrMap::new(0.0);
        assert!(map.set(Key2(1, 2), 3.5));
        assert!(!map.set(Key2(1, 2), 3.5));
        assert!(map.set(Key2(1, 2), 4.0));
        assert!(!map.set(Key2(3, 4), 0.0));
    }

    #[test]
    fn slot_indexes_serve_row_and_column_queries() {
        let mut map: AttrMap<Key2, f64> = AttrMap::new(0.0);
        map.set(Key2(1, 10), 1.0);
        map.set(Key2(1, 11), 2.0);
        map.set(Key2(2, 10), 3.0);
        assert_eq!(map.keys_with(0, 1), vec![Key2(1, 10), Key2(1, 11)]);
        assert_eq!(map.keys_with(1, 10), vec![Key2(1, 10), Key2(2, 10)]);
    }

    #[test]
    fn delete_in_slots_removes_every_mention() {
        let mut map: AttrMap<Key2, f64> = AttrMap::new(0.0);
        map.set(Key2(1, 10), 1.0);
        map.set(Key2(2, 10), 2.0);
        map.set(Key2(2, 11), 3.0);
        let removed = map.delete_in_slots(&[1], 10);
        assert_eq!(removed, vec![Key2(1, 10), Key2(2, 10)]);
        assert_eq!(map.len(), 1);
        assert!(map.keys_with(1, 10).is_empty());
        assert_eq!(map.keys_with(0, 2), vec![Key2(2, 11)]);
    }

    #[test]
    fn delete_covers_an_id_in_either_slot() {
        let mut map: AttrMap<Key2, f64> = AttrMap::new(0.0);
        map.set(Key2(5, 5), 1.0);
        map.set(Key2(5, 6), 2.0);
        let removed = map.delete_in_slots(&[0, 1], 5);
        assert_eq!(removed.len(), 2);
        assert_eq!(map.len(), 0);
    }
}
