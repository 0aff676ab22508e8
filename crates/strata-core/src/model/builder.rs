//! Model builder methods for variables, constraints, and objectives.

use std::collections::BTreeMap;
use std::time::Instant;

use strata_expr::expr::{
    flatten_linear, flatten_quadratic, normalize_linear, normalize_quadratic, BoundedLinearExpr,
    BoundedQuadExpr, LinearExpr, QuadExpr, VarPair,
};
use strata_expr::ids::{
    AuxiliaryObjectiveId, IndicatorConstraintId, LinearConstraintId, QuadraticConstraintId,
    VariableId,
};

use crate::elemental::attrs::{
    BoolAttr0, BoolAttr1, DoubleAttr0, DoubleAttr1, DoubleAttr2, ElementType, IntAttr1,
    SymmetricDoubleAttr2, SymmetricDoubleAttr3,
};
use crate::elemental::key::{Key0, Key1, Key2, QuadKey, SymPair};

use super::error::ModelError;
use super::Model;

impl Model {
    // ── Variables ───────────────────────────────────────────

    /// Add a variable with bounds and integrality.
    pub fn add_variable(
        &mut self,
        lower: f64,
        upper: f64,
        is_integer: bool,
        name: &str,
    ) -> Result<VariableId, ModelError> {
        if lower.is_nan() || upper.is_nan() || lower > upper {
            return Err(ModelError::InvalidVariableBounds { lower, upper });
        }
        let id = self.store.add_element(ElementType::Variable, name);
        self.store
            .set_attr(DoubleAttr1::VariableLowerBound, Key1(id), lower)?;
        self.store
            .set_attr(DoubleAttr1::VariableUpperBound, Key1(id), upper)?;
        self.store
            .set_attr(BoolAttr1::VariableInteger, Key1(id), is_integer)?;
        Ok(VariableId::new(id))
    }

    /// Delete a variable and every coefficient mentioning it. Returns
    /// false if the variable is unknown or already deleted.
    pub fn delete_variable(&mut self, variable: VariableId) -> bool {
        self.store
            .delete_element(ElementType::Variable, variable.inner())
    }

    pub fn set_variable_lower_bound(
        &mut self,
        variable: VariableId,
        lower: f64,
    ) -> Result<(), ModelError> {
        if lower.is_nan() {
            return Err(ModelError::InvalidVariableBounds {
                lower,
                upper: f64::NAN,
            });
        }
        self.store
            .set_attr(DoubleAttr1::VariableLowerBound, Key1(variable.inner()), lower)?;
        Ok(())
    }

    pub fn set_variable_upper_bound(
        &mut self,
        variable: VariableId,
        upper: f64,
    ) -> Result<(), ModelError> {
        if upper.is_nan() {
            return Err(ModelError::InvalidVariableBounds {
                lower: f64::NAN,
                upper,
            });
        }
        self.store
            .set_attr(DoubleAttr1::VariableUpperBound, Key1(variable.inner()), upper)?;
        Ok(())
    }

    pub fn set_variable_integer(
        &mut self,
        variable: VariableId,
        is_integer: bool,
    ) -> Result<(), ModelError> {
        self.store
            .set_attr(BoolAttr1::VariableInteger, Key1(variable.inner()), is_integer)?;
        Ok(())
    }

    // ── Linear constraints ──────────────────────────────────

    /// Add a linear constraint, driven from a bounded expression XOR
    /// explicit lb/ub/expr parts.
    pub fn add_linear_constraint(
        &mut self,
        bounded: Option<BoundedLinearExpr>,
        lower: Option<f64>,
        upper: Option<f64>,
        expr: Option<LinearExpr>,
        name: &str,
    ) -> Result<LinearConstraintId, ModelError> {
        let started = Instant::now();
        let normalized = normalize_linear(bounded, lower, upper, expr)?;
        self.validate_terms(&normalized.terms)?;

        let id = self.store.add_element(ElementType::LinearConstraint, name);
        self.store.set_attr(
            DoubleAttr1::LinearConstraintLowerBound,
            Key1(id),
            normalized.lower,
        )?;
        self.store.set_attr(
            DoubleAttr1::LinearConstraintUpperBound,
            Key1(id),
            normalized.upper,
        )?;
        for (variable, coefficient) in &normalized.terms {
            self.store.set_attr(
                DoubleAttr2::LinearConstraintCoefficient,
                Key2(id, variable.inner()),
                *coefficient,
            )?;
        }
        tracing::debug!(
            component = "model",
            operation = "add_linear_constraint",
            status = "success",
            terms = normalized.terms.len(),
            duration_ms = started.elapsed().as_secs_f64() * 1000.0,
            "Added linear constraint"
        );
        Ok(LinearConstraintId::new(id))
    }

    /// Add a linear constraint from a bounded comparison value
    /// (e.g. `(x + y).le_scalar(10.0)`).
    pub fn add_constraint_expr(
        &mut self,
        bounded: impl Into<BoundedLinearExpr>,
        name: &str,
    ) -> Result<LinearConstraintId, ModelError> {
        self.add_linear_constraint(Some(bounded.into()), None, None, None, name)
    }

    /// Delete a linear constraint. Returns false if unknown.
    pub fn delete_linear_constraint(&mut self, constraint: LinearConstraintId) -> bool {
        self.store
            .delete_element(ElementType::LinearConstraint, constraint.inner())
    }

    // ── Quadratic constraints ───────────────────────────────

    /// Add a quadratic constraint, driven from a bounded expression XOR
    /// explicit lb/ub/expr parts.
    pub fn add_quadratic_constraint(
        &mut self,
        bounded: Option<BoundedQuadExpr>,
        lower: Option<f64>,
        upper: Option<f64>,
        expr: Option<QuadExpr>,
        name: &str,
    ) -> Result<QuadraticConstraintId, ModelError> {
        let started = Instant::now();
        let normalized = normalize_quadratic(bounded, lower, upper, expr)?;
        self.validate_terms(&normalized.terms)?;
        self.validate_quadratic_terms(&normalized.quadratic_terms)?;

        let id = self
            .store
            .add_element(ElementType::QuadraticConstraint, name);
        self.store.set_attr(
            DoubleAttr1::QuadraticConstraintLowerBound,
            Key1(id),
            normalized.lower,
        )?;
        self.store.set_attr(
            DoubleAttr1::QuadraticConstraintUpperBound,
            Key1(id),
            normalized.upper,
        )?;
        for (variable, coefficient) in &normalized.terms {
            self.store.set_attr(
                DoubleAttr2::QuadraticConstraintLinearCoefficient,
                Key2(id, variable.inner()),
                *coefficient,
            )?;
        }
        for (pair, coefficient) in &normalized.quadratic_terms {
            self.store.set_attr(
                SymmetricDoubleAttr3::QuadraticConstraintQuadraticCoefficient,
                QuadKey::new(id, pair.lo().inner(), pair.hi().inner()),
                *coefficient,
            )?;
        }
        tracing::debug!(
            component = "model",
            operation = "add_quadratic_constraint",
            status = "success",
            terms = normalized.terms.len(),
            quadratic_terms = normalized.quadratic_terms.len(),
            duration_ms = started.elapsed().as_secs_f64() * 1000.0,
            "Added quadratic constraint"
        );
        Ok(QuadraticConstraintId::new(id))
    }

    /// Add a quadratic constraint from a bounded comparison value.
    pub fn add_quadratic_constraint_expr(
        &mut self,
        bounded: impl Into<BoundedQuadExpr>,
        name: &str,
    ) -> Result<QuadraticConstraintId, ModelError> {
        self.add_quadratic_constraint(Some(bounded.into()), None, None, None, name)
    }

    /// Delete a quadratic constraint. Returns false if unknown.
    pub fn delete_quadratic_constraint(&mut self, constraint: QuadraticConstraintId) -> bool {
        self.store
            .delete_element(ElementType::QuadraticConstraint, constraint.inner())
    }

    // ── Indicator constraints ───────────────────────────────

    /// Add an indicator constraint: when the (binary) indicator variable
    /// takes its activating value, the linear body must hold.
    #[allow(clippy::too_many_arguments)]
    pub fn add_indicator_constraint(
        &mut self,
        indicator: VariableId,
        activate_on_zero: bool,
        bounded: Option<BoundedLinearExpr>,
        lower: Option<f64>,
        upper: Option<f64>,
        expr: Option<LinearExpr>,
        name: &str,
    ) -> Result<IndicatorConstraintId, ModelError> {
        self.ensure_variable(indicator)?;
        let normalized = normalize_linear(bounded, lower, upper, expr)?;
        self.validate_terms(&normalized.terms)?;

        let id = self
            .store
            .add_element(ElementType::IndicatorConstraint, name);
        self.store
            .set_attr(IntAttr1::IndicatorVariable, Key1(id), indicator.inner())?;
        self.store.set_attr(
            BoolAttr1::IndicatorActivateOnZero,
            Key1(id),
            activate_on_zero,
        )?;
        self.store.set_attr(
            DoubleAttr1::IndicatorConstraintLowerBound,
            Key1(id),
            normalized.lower,
        )?;
        self.store.set_attr(
            DoubleAttr1::IndicatorConstraintUpperBound,
            Key1(id),
            normalized.upper,
        )?;
        for (variable, coefficient) in &normalized.terms {
            self.store.set_attr(
                DoubleAttr2::IndicatorConstraintLinearCoefficient,
                Key2(id, variable.inner()),
                *coefficient,
            )?;
        }
        Ok(IndicatorConstraintId::new(id))
    }

    /// Delete an indicator constraint. Returns false if unknown.
    pub fn delete_indicator_constraint(&mut self, constraint: IndicatorConstraintId) -> bool {
        self.store
            .delete_element(ElementType::IndicatorConstraint, constraint.inner())
    }

    // ── Auxiliary objectives ────────────────────────────────

    /// Add a secondary objective solved at the given priority.
    pub fn add_auxiliary_objective(
        &mut self,
        priority: i64,
        expr: LinearExpr,
        name: &str,
    ) -> Result<AuxiliaryObjectiveId, ModelError> {
        let form = flatten_linear(&expr);
        if !form.offset().is_finite() {
            return Err(ModelError::InvalidCoefficient {
                coefficient: form.offset(),
            });
        }
        self.validate_terms(form.terms())?;

        let id = self
            .store
            .add_element(ElementType::AuxiliaryObjective, name);
        self.store
            .set_attr(IntAttr1::AuxiliaryObjectivePriority, Key1(id), priority)?;
        self.store.set_attr(
            DoubleAttr1::AuxiliaryObjectiveOffset,
            Key1(id),
            form.offset(),
        )?;
        for (variable, coefficient) in form.terms() {
            self.store.set_attr(
                DoubleAttr2::AuxiliaryObjectiveLinearCoefficient,
                Key2(id, variable.inner()),
                *coefficient,
            )?;
        }
        Ok(AuxiliaryObjectiveId::new(id))
    }

    /// Delete an auxiliary objective. Returns false if unknown.
    pub fn delete_auxiliary_objective(&mut self, objective: AuxiliaryObjectiveId) -> bool {
        self.store
            .delete_element(ElementType::AuxiliaryObjective, objective.inner())
    }

    // ── Objective ───────────────────────────────────────────

    /// Minimize an expression (replaces the current objective).
    pub fn minimize(&mut self, expr: impl Into<QuadExpr>) -> Result<(), ModelError> {
        self.set_objective(expr, false)
    }

    /// Maximize an expression (replaces the current objective).
    pub fn maximize(&mut self, expr: impl Into<QuadExpr>) -> Result<(), ModelError> {
        self.set_objective(expr, true)
    }

    /// Replace the objective with an expression and sense.
    pub fn set_objective(
        &mut self,
        expr: impl Into<QuadExpr>,
        maximize: bool,
    ) -> Result<(), ModelError> {
        let form = flatten_quadratic(&expr.into());
        if !form.offset().is_finite() {
            return Err(ModelError::InvalidCoefficient {
                coefficient: form.offset(),
            });
        }
        self.validate_terms(form.terms())?;
        self.validate_quadratic_terms(form.quadratic_terms())?;

        self.clear_objective()?;
        self.store.set_attr(BoolAttr0::Maximize, Key0, maximize)?;
        self.store
            .set_attr(DoubleAttr0::ObjectiveOffset, Key0, form.offset())?;
        for (variable, coefficient) in form.terms() {
            self.store.set_attr(
                DoubleAttr1::ObjectiveLinearCoefficient,
                Key1(variable.inner()),
                *coefficient,
            )?;
        }
        for (pair, coefficient) in form.quadratic_terms() {
            self.store.set_attr(
                SymmetricDoubleAttr2::ObjectiveQuadraticCoefficient,
                SymPair::new(pair.lo().inner(), pair.hi().inner()),
                *coefficient,
            )?;
        }
        tracing::debug!(
            component = "model",
            operation = "set_objective",
            status = "success",
            maximize,
            terms = form.terms().len(),
            quadratic_terms = form.quadratic_terms().len(),
            "Set objective function"
        );
        Ok(())
    }

    /// Reset the objective to its defaults (minimize nothing).
    pub fn clear_objective(&mut self) -> Result<(), ModelError> {
        self.store.set_attr(BoolAttr0::Maximize, Key0, false)?;
        self.store.set_attr(DoubleAttr0::ObjectiveOffset, Key0, 0.0)?;
        for key in self
            .store
            .get_attr_non_defaults(DoubleAttr1::ObjectiveLinearCoefficient)
        {
            self.store
                .set_attr(DoubleAttr1::ObjectiveLinearCoefficient, key, 0.0)?;
        }
        for key in self
            .store
            .get_attr_non_defaults(SymmetricDoubleAttr2::ObjectiveQuadraticCoefficient)
        {
            self.store.set_attr(
                SymmetricDoubleAttr2::ObjectiveQuadraticCoefficient,
                key,
                0.0,
            )?;
        }
        Ok(())
    }

    pub fn set_objective_sense(&mut self, maximize: bool) -> Result<(), ModelError> {
        self.store.set_attr(BoolAttr0::Maximize, Key0, maximize)?;
        Ok(())
    }

    pub fn set_objective_offset(&mut self, offset: f64) -> Result<(), ModelError> {
        if !offset.is_finite() {
            return Err(ModelError::InvalidCoefficient {
                coefficient: offset,
            });
        }
        self.store
            .set_attr(DoubleAttr0::ObjectiveOffset, Key0, offset)?;
        Ok(())
    }

    pub fn set_objective_coefficient(
        &mut self,
        variable: VariableId,
        coefficient: f64,
    ) -> Result<(), ModelError> {
        if !coefficient.is_finite() {
            return Err(ModelError::InvalidCoefficient { coefficient });
        }
        self.store.set_attr(
            DoubleAttr1::ObjectiveLinearCoefficient,
            Key1(variable.inner()),
            coefficient,
        )?;
        Ok(())
    }

    pub fn set_objective_quadratic_coefficient(
        &mut self,
        first: VariableId,
        second: VariableId,
        coefficient: f64,
    ) -> Result<(), ModelError> {
        if !coefficient.is_finite() {
            return Err(ModelError::InvalidCoefficient { coefficient });
        }
        self.store.set_attr(
            SymmetricDoubleAttr2::ObjectiveQuadraticCoefficient,
            SymPair::new(first.inner(), second.inner()),
            coefficient,
        )?;
        Ok(())
    }

    // ── Shared validation ───────────────────────────────────

    pub(super) fn ensure_variable(&self, variable: VariableId) -> Result<(), ModelError> {
        if self
            .store
            .has_element(ElementType::Variable, variable.inner())
        {
            Ok(())
        } else {
            Err(ModelError::Store(
                crate::elemental::error::ElementalError::UnknownElement {
                    element_type: ElementType::Variable,
                    id: variable.inner(),
                },
            ))
        }
    }

    fn validate_terms(&self, terms: &BTreeMap<VariableId, f64>) -> Result<(), ModelError> {
        for (variable, coefficient) in terms {
            self.ensure_variable(*variable)?;
            if !coefficient.is_finite() {
                return Err(ModelError::InvalidCoefficient {
                    coefficient: *coefficient,
                });
            }
        }
        Ok(())
    }

    fn validate_quadratic_terms(
        &self,
        terms: &BTreeMap<VarPair, f64>,
    ) -> Result<(), ModelError> {
        for (pair, coefficient) in terms {
            self.ensure_variable(pair.lo())?;
            self.ensure_variable(pair.hi())?;
            if !coefficient.is_finite() {
                return Err(ModelError::InvalidCoefficient {
                    coefficient: *coefficient,
                });
            }
        }
        Ok(())
    }
}
