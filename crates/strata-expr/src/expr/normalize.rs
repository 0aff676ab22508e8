//! Bounded-expression normalization.
//!
//! Normalization flattens the expression and subtracts its offset from both
//! bounds, so the result always carries a zero offset. Callers may drive it
//! from a single bounded-expression value or from independent lb/ub/expr
//! parts, never both.

use std::collections::BTreeMap;

use crate::expr::ast::{LinearExpr, QuadExpr};
use crate::expr::bounded::{BoundedLinearExpr, BoundedQuadExpr};
use crate::expr::error::ExprError;
use crate::expr::flatten::{flatten_linear, flatten_quadratic, VarPair};
use crate::ids::VariableId;

/// A normalized linear range constraint: zero offset by construction.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedLinear {
    pub lower: f64,
    pub upper: f64,
    pub terms: BTreeMap<VariableId, f64>,
}

/// A normalized quadratic range constraint: zero offset by construction.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedQuadratic {
    pub lower: f64,
    pub upper: f64,
    pub terms: BTreeMap<VariableId, f64>,
    pub quadratic_terms: BTreeMap<VarPair, f64>,
}

fn resolve_parts<B, E>(
    bounded: Option<B>,
    lower: Option<f64>,
    upper: Option<f64>,
    expr: Option<E>,
    split: impl FnOnce(B) -> (f64, f64, E),
) -> Result<(f64, f64, E), ExprError> {
    match (bounded, lower, upper, expr) {
        (Some(bounded), None, None, None) => Ok(split(bounded)),
        (None, lower, upper, Some(expr)) => Ok((
            lower.unwrap_or(f64::NEG_INFINITY),
            upper.unwrap_or(f64::INFINITY),
            expr,
        )),
        (None, _, _, None) => Err(ExprError::MissingConstraint),
        (Some(_), _, _, _) => Err(ExprError::AmbiguousConstruction),
    }
}

fn check_bounds(lower: f64, upper: f64) -> Result<(), ExprError> {
    if lower.is_nan() || upper.is_nan() {
        return Err(ExprError::InvalidBound { lower, upper });
    }
    Ok(())
}

/// Normalize a linear constraint from a bounded expression XOR explicit
/// lb/ub/expr parts.
pub fn normalize_linear(
    bounded: Option<BoundedLinearExpr>,
    lower: Option<f64>,
    upper: Option<f64>,
    expr: Option<LinearExpr>,
) -> Result<NormalizedLinear, ExprError> {
    let (lower, upper, expr) =
        resolve_parts(bounded, lower, upper, expr, BoundedLinearExpr::into_parts)?;
    check_bounds(lower, upper)?;
    let form = flatten_linear(&expr);
    let offset = form.offset();
    if !offset.is_finite() {
        return Err(ExprError::NonFiniteOffset { offset });
    }
    let (_, terms) = form.into_parts();
    Ok(NormalizedLinear {
        lower: lower - offset,
        upper: upper - offset,
        terms,
    })
}

/// Normalize a quadratic constraint from a bounded expression XOR explicit
/// lb/ub/expr parts.
pub fn normalize_quadratic(
    bounded: Option<BoundedQuadExpr>,
    lower: Option<f64>,
    upper: Option<f64>,
    expr: Option<QuadExpr>,
) -> Result<NormalizedQuadratic, ExprError> {
    let (lower, upper, expr) =
        resolve_parts(bounded, lower, upper, expr, BoundedQuadExpr::into_parts)?;
    check_bounds(lower, upper)?;
    let form = flatten_quadratic(&expr);
    let offset = form.offset();
    if !offset.is_finite() {
        return Err(ExprError::NonFiniteOffset { offset });
    }
    let (_, terms, quadratic_terms) = form.into_parts();
    Ok(NormalizedQuadratic {
        lower: lower - offset,
        upper: upper - offset,
        terms,
        quadratic_terms,
    })
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::{normalize_linear, normalize_quadratic};
    use crate::expr::ast::LinearExpr;
    use crate::expr::bounded::between;
    use crate::expr::error::ExprError;
    use crate::expr::flatten::VarPair;
    use crate::ids::VariableId;

    fn x() -> VariableId {
        VariableId::new(1)
    }

    fn y() -> VariableId {
        VariableId::new(2)
    }

    #[test]
    fn one_sided_upper_bound() {
        // 2x + y <= 1.5.
        let bounded = (2.0 * x() + y()).le_scalar(1.5).into();
        let normalized = normalize_linear(Some(bounded), None, None, None).unwrap();
        assert_eq!(normalized.lower, f64::NEG_INFINITY);
        assert_eq!(normalized.upper, 1.5);
        assert_eq!(normalized.terms[&x()], 2.0);
        assert_eq!(normalized.terms[&y()], 1.0);
    }

    #[test]
    fn offset_moves_into_both_bounds() {
        // 0 <= x + 2y + 1 <= 2 becomes -1 <= x + 2y <= 1.
        let bounded = (LinearExpr::from(x()) + 2.0 * y() + 1.0)
            .ge_scalar(0.0)
            .le_scalar(2.0);
        let normalized = normalize_linear(Some(bounded), None, None, None).unwrap();
        assert_eq!(normalized.lower, -1.0);
        assert_eq!(normalized.upper, 1.0);
        assert_eq!(normalized.terms[&x()], 1.0);
        assert_eq!(normalized.terms[&y()], 2.0);
    }

    #[test]
    fn bounded_value_and_parts_normalize_identically() {
        let expr = 3.0 * x() - 2.0;
        let via_bounded =
            normalize_linear(Some(between(1.0, expr.clone(), 5.0)), None, None, None).unwrap();
        let via_parts = normalize_linear(None, Some(3.0), Some(7.0), Some(3.0 * x())).unwrap();
        assert_eq!(via_bounded, via_parts);
    }

    #[test]
    fn missing_parts_default_to_infinite_bounds() {
        let normalized = normalize_linear(None, None, None, Some(2.0 * x())).unwrap();
        assert_eq!(normalized.lower, f64::NEG_INFINITY);
        assert_eq!(normalized.upper, f64::INFINITY);
    }

    #[test]
    fn both_entry_points_is_ambiguous() {
        let result = normalize_linear(
            Some(between(0.0, 2.0 * x(), 1.0)),
            Some(0.0),
            None,
            Some(LinearExpr::from(x())),
        );
        assert_eq!(result.unwrap_err(), ExprError::AmbiguousConstruction);
    }

    #[test]
    fn bounds_alone_are_not_a_constraint() {
        let result = normalize_linear(None, Some(0.0), Some(1.0), None);
        assert_eq!(result.unwrap_err(), ExprError::MissingConstraint);
    }

    #[test]
    fn infinite_offset_is_rejected() {
        let expr = LinearExpr::from(x()) + f64::INFINITY;
        let result = normalize_linear(None, None, Some(1.0), Some(expr));
        assert_eq!(
            result.unwrap_err(),
            ExprError::NonFiniteOffset {
                offset: f64::INFINITY
            }
        );
    }

    #[test]
    fn nan_bound_is_rejected() {
        let result = normalize_linear(None, Some(f64::NAN), None, Some(2.0 * x()));
        assert!(matches!(result, Err(ExprError::InvalidBound { .. })));
    }

    #[test]
    fn quadratic_equality_pins_both_bounds() {
        // 5 x^2 == 3.
        let bounded = (5.0 * x() * x()).eq_scalar(3.0);
        let normalized = normalize_quadratic(Some(bounded), None, None, None).unwrap();
        assert_eq!(normalized.lower, 3.0);
        assert_eq!(normalized.upper, 3.0);
        assert!(normalized.terms.is_empty());
        assert_eq!(normalized.quadratic_terms[&VarPair::new(x(), x())], 5.0);
    }

    #[test]
    fn quadratic_offset_subtraction() {
        let bounded = (LinearExpr::from(x()) * LinearExpr::from(y()) + 2.0).le_scalar(5.0);
        let normalized = normalize_quadratic(Some(bounded.into()), None, None, None).unwrap();
        assert_eq!(normalized.upper, 3.0);
        assert_eq!(normalized.lower, f64::NEG_INFINITY);
    }
}
