//! Snapshots, update patches, and patch application.
//!
//! Exports are total and stably ordered (ascending ids everywhere), so two
//! exports of an unchanged store compare equal byte for byte. An update
//! patch mirrors exactly what one tracker observed: deletions, new
//! elements shipped wholesale, and modified attribute rows at their
//! current values (a row that reverted to the default is still shipped, at
//! the default, so the receiving copy clears it too).

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::attrs::{
    Attribute, BoolAttr0, BoolAttr1, DoubleAttr0, DoubleAttr1, DoubleAttr2, ElementType, IntAttr1,
    SymmetricDoubleAttr2, SymmetricDoubleAttr3,
};
use super::diff::{Diff, DiffId};
use super::error::ElementalError;
use super::key::{AttrKey, ElementId, Key0, Key1, Key2, QuadKey, SymPair};
use super::{AttrTables, Elemental};

/// One exported element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementView {
    pub id: ElementId,
    pub name: Option<String>,
}

/// The elements of one type, ascending by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementBlock {
    pub element_type: ElementType,
    pub elements: Vec<ElementView>,
}

/// Deleted ids of one type, ascending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletedBlock {
    pub element_type: ElementType,
    pub ids: Vec<ElementId>,
}

/// Sorted `(key, value)` rows of one attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttrExport<A, K, V> {
    pub attr: A,
    pub rows: Vec<(K, V)>,
}

/// Attribute rows grouped by family, each family sorted by attribute.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttrBundle {
    pub bool0: Vec<AttrExport<BoolAttr0, Key0, bool>>,
    pub double0: Vec<AttrExport<DoubleAttr0, Key0, f64>>,
    pub bool1: Vec<AttrExport<BoolAttr1, Key1, bool>>,
    pub int1: Vec<AttrExport<IntAttr1, Key1, i64>>,
    pub double1: Vec<AttrExport<DoubleAttr1, Key1, f64>>,
    pub double2: Vec<AttrExport<DoubleAttr2, Key2, f64>>,
    pub sym_double2: Vec<AttrExport<SymmetricDoubleAttr2, SymPair, f64>>,
    pub sym_double3: Vec<AttrExport<SymmetricDoubleAttr3, QuadKey, f64>>,
}

impl AttrBundle {
    pub fn is_empty(&self) -> bool {
        self.bool0.is_empty()
            && self.double0.is_empty()
            && self.bool1.is_empty()
            && self.int1.is_empty()
            && self.double1.is_empty()
            && self.double2.is_empty()
            && self.sym_double2.is_empty()
            && self.sym_double3.is_empty()
    }
}

/// A complete, stably ordered description of a store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSnapshot {
    pub elements: Vec<ElementBlock>,
    pub attrs: AttrBundle,
}

/// Changes observed by one tracker since its baseline, applicable to a
/// copy that matched the store at that baseline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelUpdate {
    pub deleted: Vec<DeletedBlock>,
    pub created: Vec<ElementBlock>,
    pub attrs: AttrBundle,
}

fn export_attr_family<A: Attribute>(tables: &AttrTables) -> Vec<AttrExport<A, A::Key, A::Value>> {
    A::table(tables)
        .iter()
        .filter(|(_, map)| map.len() > 0)
        .map(|(attr, map)| AttrExport {
            attr: *attr,
            rows: map.entries().map(|(key, value)| (*key, *value)).collect(),
        })
        .collect()
}

fn export_update_family<A: Attribute>(
    tables: &AttrTables,
    diff: &Diff,
) -> Vec<AttrExport<A, A::Key, A::Value>> {
    let mut grouped: BTreeMap<A, BTreeMap<A::Key, A::Value>> = BTreeMap::new();
    // Modified pre-baseline keys ship their current value, default included.
    for (attr, keys) in A::pending_ref(diff.pending()) {
        if keys.is_empty() {
            continue;
        }
        let rows = grouped.entry(*attr).or_default();
        for key in keys {
            let value = A::table(tables)
                .get(attr)
                .map(|map| map.get(*key))
                .unwrap_or_else(|| attr.default_value());
            rows.insert(*key, value);
        }
    }
    // Rows touching a post-baseline element ship wholesale.
    for (attr, map) in A::table(tables) {
        let types = attr.key_types();
        for (key, value) in map.entries() {
            let touches_new = types
                .iter()
                .enumerate()
                .any(|(slot, element_type)| !diff.predates(*element_type, key.slot(slot)));
            if touches_new {
                grouped.entry(*attr).or_default().insert(*key, *value);
            }
        }
    }
    grouped
        .into_iter()
        .map(|(attr, rows)| AttrExport {
            attr,
            rows: rows.into_iter().collect(),
        })
        .collect()
}

impl Elemental {
    /// Export the full store.
    pub fn export(&self, remove_names: bool) -> ModelSnapshot {
        let elements = ElementType::ALL
            .iter()
            .map(|element_type| ElementBlock {
                element_type: *element_type,
                elements: self
                    .registry(*element_type)
                    .ids()
                    .map(|id| ElementView {
                        id,
                        name: self.exported_name(*element_type, id, remove_names),
                    })
                    .collect(),
            })
            .collect();
        let snapshot = ModelSnapshot {
            elements,
            attrs: AttrBundle {
                bool0: export_attr_family::<BoolAttr0>(self.tables()),
                double0: export_attr_family::<DoubleAttr0>(self.tables()),
                bool1: export_attr_family::<BoolAttr1>(self.tables()),
                int1: export_attr_family::<IntAttr1>(self.tables()),
                double1: export_attr_family::<DoubleAttr1>(self.tables()),
                double2: export_attr_family::<DoubleAttr2>(self.tables()),
                sym_double2: export_attr_family::<SymmetricDoubleAttr2>(self.tables()),
                sym_double3: export_attr_family::<SymmetricDoubleAttr3>(self.tables()),
            },
        };
        tracing::debug!(
            component = "elemental",
            operation = "export",
            status = "success",
            variables = self.num_elements(ElementType::Variable),
            linear_constraints = self.num_elements(ElementType::LinearConstraint),
            "Exported model snapshot"
        );
        snapshot
    }

    /// Export what one tracker saw since its baseline. `Ok(None)` means
    /// nothing changed, which lets consumers skip a re-solve outright.
    pub fn export_update(
        &self,
        diff: DiffId,
        remove_names: bool,
    ) -> Result<Option<ModelUpdate>, ElementalError> {
        let state = self.diff_state(diff)?;
        if state.is_empty(&self.next_ids()) {
            return Ok(None);
        }

        let mut deleted = Vec::new();
        let mut created = Vec::new();
        for element_type in ElementType::ALL {
            let gone = state.deleted(element_type);
            if !gone.is_empty() {
                deleted.push(DeletedBlock {
                    element_type,
                    ids: gone.iter().copied().collect(),
                });
            }
            let fresh: Vec<ElementView> = self
                .registry(element_type)
                .ids()
                .filter(|id| !state.predates(element_type, *id))
                .map(|id| ElementView {
                    id,
                    name: self.exported_name(element_type, id, remove_names),
                })
                .collect();
            if !fresh.is_empty() {
                created.push(ElementBlock {
                    element_type,
                    elements: fresh,
                });
            }
        }

        let update = ModelUpdate {
            deleted,
            created,
            attrs: AttrBundle {
                bool0: export_update_family::<BoolAttr0>(self.tables(), state),
                double0: export_update_family::<DoubleAttr0>(self.tables(), state),
                bool1: export_update_family::<BoolAttr1>(self.tables(), state),
                int1: export_update_family::<IntAttr1>(self.tables(), state),
                double1: export_update_family::<DoubleAttr1>(self.tables(), state),
                double2: export_update_family::<DoubleAttr2>(self.tables(), state),
                sym_double2: export_update_family::<SymmetricDoubleAttr2>(self.tables(), state),
                sym_double3: export_update_family::<SymmetricDoubleAttr3>(self.tables(), state),
            },
        };
        if update.deleted.is_empty() && update.created.is_empty() && update.attrs.is_empty() {
            // An element born and deleted inside the window leaves nothing
            // to report, only a moved id watermark.
            return Ok(None);
        }
        tracing::debug!(
            component = "elemental",
            operation = "export_update",
            status = "success",
            diff = diff.inner(),
            deleted_blocks = update.deleted.len(),
            created_blocks = update.created.len(),
            "Exported model update"
        );
        Ok(Some(update))
    }

    /// Apply a patch produced against a copy of this store. Everything is
    /// validated before anything is applied.
    pub fn apply_update(&mut self, update: &ModelUpdate) -> Result<(), ElementalError> {
        for block in &update.deleted {
            for id in &block.ids {
                if !self.has_element(block.element_type, *id) {
                    return Err(ElementalError::UnknownElement {
                        element_type: block.element_type,
                        id: *id,
                    });
                }
            }
        }
        let mut removed: [BTreeSet<ElementId>; ElementType::COUNT] =
            std::array::from_fn(|_| BTreeSet::new());
        for block in &update.deleted {
            removed[block.element_type.index()].extend(block.ids.iter().copied());
        }
        let mut added: [BTreeSet<ElementId>; ElementType::COUNT] =
            std::array::from_fn(|_| BTreeSet::new());
        for block in &update.created {
            for view in &block.elements {
                if self.has_element(block.element_type, view.id) {
                    return Err(ElementalError::DuplicateElement {
                        element_type: block.element_type,
                        id: view.id,
                    });
                }
                added[block.element_type.index()].insert(view.id);
            }
        }

        self.validate_bundle_family::<BoolAttr0>(&update.attrs.bool0, &removed, &added)?;
        self.validate_bundle_family::<DoubleAttr0>(&update.attrs.double0, &removed, &added)?;
        self.validate_bundle_family::<BoolAttr1>(&update.attrs.bool1, &removed, &added)?;
        self.validate_bundle_family::<IntAttr1>(&update.attrs.int1, &removed, &added)?;
        self.validate_bundle_family::<DoubleAttr1>(&update.attrs.double1, &removed, &added)?;
        self.validate_bundle_family::<DoubleAttr2>(&update.attrs.double2, &removed, &added)?;
        self.validate_bundle_family::<SymmetricDoubleAttr2>(
            &update.attrs.sym_double2,
            &removed,
            &added,
        )?;
        self.validate_bundle_family::<SymmetricDoubleAttr3>(
            &update.attrs.sym_double3,
            &removed,
            &added,
        )?;

        for block in &update.deleted {
            for id in &block.ids {
                self.delete_element(block.element_type, *id);
            }
        }
        for block in &update.created {
            for view in &block.elements {
                self.add_element_with_id(
                    block.element_type,
                    view.id,
                    view.name.as_deref().unwrap_or(""),
                )?;
            }
        }
        self.apply_bundle_family(&update.attrs.bool0)?;
        self.apply_bundle_family(&update.attrs.double0)?;
        self.apply_bundle_family(&update.attrs.bool1)?;
        self.apply_bundle_family(&update.attrs.int1)?;
        self.apply_bundle_family(&update.attrs.double1)?;
        self.apply_bundle_family(&update.attrs.double2)?;
        self.apply_bundle_family(&update.attrs.sym_double2)?;
        self.apply_bundle_family(&update.attrs.sym_double3)?;
        tracing::debug!(
            component = "elemental",
            operation = "apply_update",
            status = "success",
            "Applied model update"
        );
        Ok(())
    }

    fn exported_name(
        &self,
        element_type: ElementType,
        id: ElementId,
        remove_names: bool,
    ) -> Option<String> {
        if remove_names {
            None
        } else {
            self.registry(element_type).name(id).map(str::to_string)
        }
    }

    fn validate_bundle_family<A: Attribute>(
        &self,
        exports: &[AttrExport<A, A::Key, A::Value>],
        removed: &[BTreeSet<ElementId>; ElementType::COUNT],
        added: &[BTreeSet<ElementId>; ElementType::COUNT],
    ) -> Result<(), ElementalError> {
        for export in exports {
            let mut seen: BTreeSet<A::Key> = BTreeSet::new();
            for (key, _) in &export.rows {
                if !seen.insert(*key) {
                    return Err(ElementalError::DuplicateKey {
                        attr: export.attr.as_str(),
                    });
                }
                for (slot, element_type) in export.attr.key_types().iter().enumerate() {
                    let id = key.slot(slot);
                    let index = element_type.index();
                    let alive = (self.registry(*element_type).exists(id)
                        && !removed[index].contains(&id))
                        || added[index].contains(&id);
                    if !alive {
                        return Err(ElementalError::UnknownElement {
                            element_type: *element_type,
                            id,
                        });
                    }
                }
            }
        }
        Ok(())
    }

    fn apply_bundle_family<A: Attribute>(
        &mut self,
        exports: &[AttrExport<A, A::Key, A::Value>],
    ) -> Result<(), ElementalError> {
        for export in exports {
            for (key, value) in &export.rows {
                self.set_attr(export.attr, *key, *value)?;
            }
        }
        Ok(())
    }
}
