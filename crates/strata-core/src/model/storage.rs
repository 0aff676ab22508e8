//! Typed getters and row/column enumeration.

use strata_expr::ids::{
    AuxiliaryObjectiveId, IndicatorConstraintId, LinearConstraintId, QuadraticConstraintId,
    VariableId,
};

use crate::elemental::attrs::{
    BoolAttr0, BoolAttr1, DoubleAttr0, DoubleAttr1, DoubleAttr2, ElementType, IntAttr1,
    SymmetricDoubleAttr2,
};
use crate::elemental::key::{Key0, Key1, Key2, SymPair};

use super::error::ModelError;
use super::Model;

impl Model {
    // ── Counts and enumeration ──────────────────────────────

    pub fn num_variables(&self) -> usize {
        self.store.num_elements(ElementType::Variable)
    }

    pub fn num_linear_constraints(&self) -> usize {
        self.store.num_elements(ElementType::LinearConstraint)
    }

    pub fn num_quadratic_constraints(&self) -> usize {
        self.store.num_elements(ElementType::QuadraticConstraint)
    }

    pub fn num_indicator_constraints(&self) -> usize {
        self.store.num_elements(ElementType::IndicatorConstraint)
    }

    pub fn num_auxiliary_objectives(&self) -> usize {
        self.store.num_elements(ElementType::AuxiliaryObjective)
    }

    /// Live variable ids, ascending.
    pub fn variable_ids(&self) -> Vec<VariableId> {
        self.store
            .element_ids(ElementType::Variable)
            .into_iter()
            .map(VariableId::new)
            .collect()
    }

    /// Live linear constraint ids, ascending.
    pub fn linear_constraint_ids(&self) -> Vec<LinearConstraintId> {
        self.store
            .element_ids(ElementType::LinearConstraint)
            .into_iter()
            .map(LinearConstraintId::new)
            .collect()
    }

    pub fn has_variable(&self, variable: VariableId) -> bool {
        self.store
            .has_element(ElementType::Variable, variable.inner())
    }

    // ── Variables ───────────────────────────────────────────

    pub fn variable_lower_bound(&self, variable: VariableId) -> Result<f64, ModelError> {
        Ok(self
            .store
            .get_attr(DoubleAttr1::VariableLowerBound, Key1(variable.inner()))?)
    }

    pub fn variable_upper_bound(&self, variable: VariableId) -> Result<f64, ModelError> {
        Ok(self
            .store
            .get_attr(DoubleAttr1::VariableUpperBound, Key1(variable.inner()))?)
    }

    pub fn is_variable_integer(&self, variable: VariableId) -> Result<bool, ModelError> {
        Ok(self
            .store
            .get_attr(BoolAttr1::VariableInteger, Key1(variable.inner()))?)
    }

    pub fn variable_name(&self, variable: VariableId) -> Result<&str, ModelError> {
        Ok(self
            .store
            .element_name(ElementType::Variable, variable.inner())?)
    }

    // ── Linear constraints ──────────────────────────────────

    pub fn linear_constraint_bounds(
        &self,
        constraint: LinearConstraintId,
    ) -> Result<(f64, f64), ModelError> {
        let lower = self.store.get_attr(
            DoubleAttr1::LinearConstraintLowerBound,
            Key1(constraint.inner()),
        )?;
        let upper = self.store.get_attr(
            DoubleAttr1::LinearConstraintUpperBound,
            Key1(constraint.inner()),
        )?;
        Ok((lower, upper))
    }

    pub fn linear_constraint_name(
        &self,
        constraint: LinearConstraintId,
    ) -> Result<&str, ModelError> {
        Ok(self
            .store
            .element_name(ElementType::LinearConstraint, constraint.inner())?)
    }

    /// The constraint's coefficient row, sorted by variable id.
    pub fn linear_constraint_coefficients(
        &self,
        constraint: LinearConstraintId,
    ) -> Result<Vec<(VariableId, f64)>, ModelError> {
        let keys = self.store.attr_keys_with(
            DoubleAttr2::LinearConstraintCoefficient,
            0,
            constraint.inner(),
        )?;
        let mut row = Vec::with_capacity(keys.len());
        for key in keys {
            let value = self
                .store
                .get_attr(DoubleAttr2::LinearConstraintCoefficient, key)?;
            row.push((VariableId::new(key.1), value));
        }
        Ok(row)
    }

    /// The linear constraints whose rows mention a variable, ascending.
    pub fn linear_constraints_with_variable(
        &self,
        variable: VariableId,
    ) -> Result<Vec<LinearConstraintId>, ModelError> {
        let keys = self.store.attr_keys_with(
            DoubleAttr2::LinearConstraintCoefficient,
            1,
            variable.inner(),
        )?;
        Ok(keys
            .into_iter()
            .map(|key| LinearConstraintId::new(key.0))
            .collect())
    }

    pub fn linear_constraint_coefficient(
        &self,
        constraint: LinearConstraintId,
        variable: VariableId,
    ) -> Result<f64, ModelError> {
        Ok(self.store.get_attr(
            DoubleAttr2::LinearConstraintCoefficient,
            Key2(constraint.inner(), variable.inner()),
        )?)
    }

    // ── Quadratic and indicator constraints ─────────────────

    pub fn quadratic_constraint_bounds(
        &self,
        constraint: QuadraticConstraintId,
    ) -> Result<(f64, f64), ModelError> {
        let lower = self.store.get_attr(
            DoubleAttr1::QuadraticConstraintLowerBound,
            Key1(constraint.inner()),
        )?;
        let upper = self.store.get_attr(
            DoubleAttr1::QuadraticConstraintUpperBound,
            Key1(constraint.inner()),
        )?;
        Ok((lower, upper))
    }

    pub fn quadratic_constraint_name(
        &self,
        constraint: QuadraticConstraintId,
    ) -> Result<&str, ModelError> {
        Ok(self
            .store
            .element_name(ElementType::QuadraticConstraint, constraint.inner())?)
    }

    pub fn indicator_constraint_name(
        &self,
        constraint: IndicatorConstraintId,
    ) -> Result<&str, ModelError> {
        Ok(self
            .store
            .element_name(ElementType::IndicatorConstraint, constraint.inner())?)
    }

    /// The indicator variable, if one is wired up.
    pub fn indicator_variable(
        &self,
        constraint: IndicatorConstraintId,
    ) -> Result<Option<VariableId>, ModelError> {
        let raw = self
            .store
            .get_attr(IntAttr1::IndicatorVariable, Key1(constraint.inner()))?;
        Ok((raw >= 0).then(|| VariableId::new(raw)))
    }

    pub fn indicator_activate_on_zero(
        &self,
        constraint: IndicatorConstraintId,
    ) -> Result<bool, ModelError> {
        Ok(self.store.get_attr(
            BoolAttr1::IndicatorActivateOnZero,
            Key1(constraint.inner()),
        )?)
    }

    // ── Auxiliary objectives ────────────────────────────────

    pub fn auxiliary_objective_priority(
        &self,
        objective: AuxiliaryObjectiveId,
    ) -> Result<i64, ModelError> {
        Ok(self.store.get_attr(
            IntAttr1::AuxiliaryObjectivePriority,
            Key1(objective.inner()),
        )?)
    }

    // ── Objective ───────────────────────────────────────────

    pub fn is_maximize(&self) -> Result<bool, ModelError> {
        Ok(self.store.get_attr(BoolAttr0::Maximize, Key0)?)
    }

    pub fn objective_offset(&self) -> Result<f64, ModelError> {
        Ok(self.store.get_attr(DoubleAttr0::ObjectiveOffset, Key0)?)
    }

    pub fn objective_coefficient(&self, variable: VariableId) -> Result<f64, ModelError> {
        Ok(self.store.get_attr(
            DoubleAttr1::ObjectiveLinearCoefficient,
            Key1(variable.inner()),
        )?)
    }

    pub fn objective_quadratic_coefficient(
        &self,
        first: VariableId,
        second: VariableId,
    ) -> Result<f64, ModelError> {
        Ok(self.store.get_attr(
            SymmetricDoubleAttr2::ObjectiveQuadraticCoefficient,
            SymPair::new(first.inner(), second.inner()),
        )?)
    }

    /// The objective's non-default linear terms, sorted by variable id.
    pub fn objective_terms(&self) -> Vec<(VariableId, f64)> {
        self.store
            .get_attr_non_defaults(DoubleAttr1::ObjectiveLinearCoefficient)
            .into_iter()
            .map(|key| {
                let value = self
                    .store
                    .get_attr(DoubleAttr1::ObjectiveLinearCoefficient, key)
                    .unwrap_or(0.0);
                (VariableId::new(key.0), value)
            })
            .collect()
    }
}
