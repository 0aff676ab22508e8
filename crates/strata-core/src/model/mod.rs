//! Typed model façade over the element/attribute store.
//!
//! The [`Model`] owns an [`Elemental`] store and exposes the modeling
//! vocabulary (variables, constraints, objectives) as typed methods; every
//! write lands in the store as attribute entries, so update trackers and
//! exports see one coherent source of truth.
//!
//! # Module Organization
//!
//! - [`error`]: model error types
//! - [`builder`]: adding/removing variables, constraints, objectives
//! - [`storage`]: typed getters and row/column enumeration
//! - [`trackers`]: update trackers, export, and patch application

mod builder;
mod error;
mod storage;
mod trackers;

use crate::elemental::Elemental;

pub use error::ModelError;

/// An incrementally re-exportable optimization model.
#[derive(Debug, Clone, Default)]
pub struct Model {
    store: Elemental,
}

impl Model {
    /// Create a new empty model.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read access to the underlying store.
    pub fn elemental(&self) -> &Elemental {
        &self.store
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::Model;
    use crate::elemental::attrs::ElementType;

    mod modeling;
    mod support;
    mod trackers;

    use support::{bounded_variable, small_model};

    #[test]
    fn new_model_is_empty() {
        let model = Model::new();
        assert_eq!(model.num_variables(), 0);
        assert_eq!(model.num_linear_constraints(), 0);
    }

    #[test]
    fn add_variable_assigns_sequential_ids() {
        let mut model = Model::new();
        let x = bounded_variable(&mut model, 0.0, 1.0);
        let y = bounded_variable(&mut model, 0.0, 2.5);
        assert_eq!(x.inner(), 0);
        assert_eq!(y.inner(), 1);
        assert_eq!(model.num_variables(), 2);
    }

    #[test]
    fn small_model_round_trips_through_getters() {
        let (model, x, y) = small_model();
        assert_eq!(model.variable_lower_bound(x).unwrap(), 0.0);
        assert_eq!(model.variable_upper_bound(x).unwrap(), 1.0);
        assert!(model.is_variable_integer(x).unwrap());
        assert_eq!(model.variable_upper_bound(y).unwrap(), 2.5);
        assert!(!model.is_variable_integer(y).unwrap());
        assert_eq!(model.variable_name(x).unwrap(), "x");
    }

    #[test]
    fn deleting_a_variable_invalidates_handles() {
        let (mut model, x, _) = small_model();
        assert!(model.delete_variable(x));
        assert!(!model.delete_variable(x));
        assert!(model.variable_lower_bound(x).is_err());
        assert!(!model.elemental().has_element(ElementType::Variable, x.inner()));
    }
}
