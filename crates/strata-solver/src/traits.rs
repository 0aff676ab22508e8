//! Solver traits for abstraction over external engines.

use std::collections::BTreeMap;

use strata_core::{ModelSnapshot, ModelUpdate};
use strata_expr::ids::{LinearConstraintId, VariableId};

use crate::{SolverConfig, SolverError, SolverKind, SolverStatus};

/// Access to solution data, keyed by element ids.
///
/// Ids are sparse (deletion leaves holes), so solutions are maps rather
/// than dense vectors; a missing id means the engine produced no value for
/// that element.
pub trait SolutionView {
    /// Get the solver status.
    fn status(&self) -> SolverStatus;

    /// Get the objective value of the solution.
    fn objective_value(&self) -> f64;

    /// Get the primal value of a variable.
    fn variable_value(&self, variable: VariableId) -> Option<f64>;

    /// Get all primal values.
    fn variable_values(&self) -> &BTreeMap<VariableId, f64>;

    /// Get the dual value (shadow price) of a linear constraint.
    fn dual_value(&self, constraint: LinearConstraintId) -> Option<f64>;

    /// Get all dual values.
    fn dual_values(&self) -> &BTreeMap<LinearConstraintId, f64>;

    /// Check if the solution is optimal.
    fn is_optimal(&self) -> bool {
        self.status().is_optimal()
    }

    /// Check if the solution is feasible.
    fn is_feasible(&self) -> bool {
        self.status().is_feasible()
    }

    /// Check if the solution is infeasible.
    fn is_infeasible(&self) -> bool {
        self.status().is_infeasible()
    }

    /// Check if the solution is unbounded.
    fn is_unbounded(&self) -> bool {
        self.status().is_unbounded()
    }
}

/// Trait for solver backends.
///
/// A backend wraps one external engine. It receives the model only as an
/// exported snapshot; the store stays on the caller's side.
pub trait Solve {
    /// The solution type returned by this backend.
    type Solution: SolutionView;

    /// The engine family this backend drives.
    fn kind(&self) -> SolverKind;

    /// Solve a model snapshot with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns a `SolverError` if the model is empty, uses features the
    /// engine does not support, or the engine fails.
    fn solve(
        &mut self,
        model: &ModelSnapshot,
        config: &SolverConfig,
    ) -> Result<Self::Solution, SolverError>;
}

/// Trait for backends that can mirror incremental changes instead of
/// re-reading the whole model before each solve.
pub trait IncrementalSolve: Solve {
    /// Apply an update patch exported from the model's tracker.
    fn apply_update(&mut self, update: &ModelUpdate) -> Result<(), SolverError>;
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use strata_core::Model;

    /// A fake engine: counts applied updates and answers with fixed values
    /// for every variable in the last snapshot it saw.
    struct FixtureSolver {
        updates_applied: usize,
    }

    struct FixtureSolution {
        status: SolverStatus,
        values: BTreeMap<VariableId, f64>,
        duals: BTreeMap<LinearConstraintId, f64>,
    }

    impl SolutionView for FixtureSolution {
        fn status(&self) -> SolverStatus {
            self.status
        }

        fn objective_value(&self) -> f64 {
            0.0
        }

        fn variable_value(&self, variable: VariableId) -> Option<f64> {
            self.values.get(&variable).copied()
        }

        fn variable_values(&self) -> &BTreeMap<VariableId, f64> {
            &self.values
        }

        fn dual_value(&self, constraint: LinearConstraintId) -> Option<f64> {
            self.duals.get(&constraint).copied()
        }

        fn dual_values(&self) -> &BTreeMap<LinearConstraintId, f64> {
            &self.duals
        }
    }

    impl Solve for FixtureSolver {
        type Solution = FixtureSolution;

        fn kind(&self) -> SolverKind {
            SolverKind::Simplex
        }

        fn solve(
            &mut self,
            model: &ModelSnapshot,
            _config: &SolverConfig,
        ) -> Result<Self::Solution, SolverError> {
            let variables = model
                .elements
                .iter()
                .find(|block| block.element_type == strata_core::ElementType::Variable)
                .filter(|block| !block.elements.is_empty())
                .ok_or(SolverError::EmptyModel)?;
            let values = variables
                .elements
                .iter()
                .map(|view| (VariableId::new(view.id), 1.0))
                .collect();
            Ok(FixtureSolution {
                status: SolverStatus::Optimal,
                values,
                duals: BTreeMap::new(),
            })
        }
    }

    impl IncrementalSolve for FixtureSolver {
        fn apply_update(&mut self, _update: &ModelUpdate) -> Result<(), SolverError> {
            self.updates_applied += 1;
            Ok(())
        }
    }

    #[test]
    fn fixture_solver_round_trip() {
        let mut model = Model::new();
        let x = model.add_variable(0.0, 1.0, false, "x").unwrap();
        let tracker = model.add_update_tracker();

        let mut solver = FixtureSolver { updates_applied: 0 };
        assert_eq!(solver.kind(), SolverKind::Simplex);
        let solution = solver
            .solve(&model.export(true), &SolverConfig::new())
            .unwrap();
        assert!(solution.is_optimal());
        assert_eq!(solution.variable_value(x), Some(1.0));
        assert_eq!(solution.variable_value(VariableId::new(9)), None);

        // Incremental follow-up: mutate, ship the patch, not the model.
        model.set_variable_upper_bound(x, 2.0).unwrap();
        let update = model.export_update(tracker, true).unwrap().unwrap();
        solver.apply_update(&update).unwrap();
        assert_eq!(solver.updates_applied, 1);
    }

    #[test]
    fn empty_snapshot_is_rejected() {
        let model = Model::new();
        let mut solver = FixtureSolver { updates_applied: 0 };
        let result = solver.solve(&model.export(true), &SolverConfig::new());
        assert!(matches!(result, Err(SolverError::EmptyModel)));
    }
}
