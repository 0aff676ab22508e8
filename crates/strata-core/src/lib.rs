//! Strata model store: elements, sparse attributes, and incremental diffs.
//!
//! The [`Elemental`] store holds all model data as elements plus sparse,
//! default-elided attribute entries, and fans every mutation out to any
//! number of registered update trackers. The [`Model`] façade layers the
//! modeling vocabulary (variables, constraints, objectives) on top and is
//! the surface most callers use.

pub mod elemental;
pub mod model;

pub use elemental::attrs::{
    AttrValue, Attribute, BoolAttr0, BoolAttr1, DoubleAttr0, DoubleAttr1, DoubleAttr2,
    ElementType, IntAttr1, SymmetricDoubleAttr2, SymmetricDoubleAttr3,
};
pub use elemental::diff::DiffId;
pub use elemental::error::ElementalError;
pub use elemental::export::{
    AttrBundle, AttrExport, DeletedBlock, ElementBlock, ElementView, ModelSnapshot, ModelUpdate,
};
pub use elemental::key::{AttrKey, ElementId, Key0, Key1, Key2, QuadKey, SymPair};
pub use elemental::Elemental;
pub use model::{Model, ModelError};
