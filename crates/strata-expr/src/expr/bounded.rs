//! Bounded expressions: the comparison surface.
//!
//! Comparisons produce bounded-expression VALUES, never booleans, so a
//! half-built constraint can not be mistaken for a truth value: none of the
//! types here expose any boolean conversion, and `==`/`!=` between
//! expressions do not exist. Two-sided constraints are built in one shot
//! (`between`) or in two steps (`expr.ge_scalar(lb).le_scalar(ub)`) through
//! the distinct half-bounded types.

use crate::expr::ast::{LinearExpr, QuadExpr};

/// A linear expression bounded on both sides (±inf allowed).
#[derive(Debug, Clone)]
pub struct BoundedLinearExpr {
    lower: f64,
    upper: f64,
    expr: LinearExpr,
}

/// A linear expression with only a lower bound so far.
#[derive(Debug, Clone)]
pub struct LowerBoundedLinear {
    lower: f64,
    expr: LinearExpr,
}

/// A linear expression with only an upper bound so far.
#[derive(Debug, Clone)]
pub struct UpperBoundedLinear {
    upper: f64,
    expr: LinearExpr,
}

impl BoundedLinearExpr {
    pub fn new(lower: f64, upper: f64, expr: LinearExpr) -> Self {
        Self { lower, upper, expr }
    }

    pub fn lower(&self) -> f64 {
        self.lower
    }

    pub fn upper(&self) -> f64 {
        self.upper
    }

    pub fn expr(&self) -> &LinearExpr {
        &self.expr
    }

    pub fn into_parts(self) -> (f64, f64, LinearExpr) {
        (self.lower, self.upper, self.expr)
    }
}

impl LowerBoundedLinear {
    /// Close the range: `(lb <= expr) <= ub`.
    pub fn le_scalar(self, upper: f64) -> BoundedLinearExpr {
        BoundedLinearExpr::new(self.lower, upper, self.expr)
    }

    pub fn into_parts(self) -> (f64, LinearExpr) {
        (self.lower, self.expr)
    }
}

impl UpperBoundedLinear {
    /// Close the range: `lb <= (expr <= ub)`.
    pub fn ge_scalar(self, lower: f64) -> BoundedLinearExpr {
        BoundedLinearExpr::new(lower, self.upper, self.expr)
    }

    pub fn into_parts(self) -> (f64, LinearExpr) {
        (self.upper, self.expr)
    }
}

impl From<LowerBoundedLinear> for BoundedLinearExpr {
    fn from(half: LowerBoundedLinear) -> Self {
        BoundedLinearExpr::new(half.lower, f64::INFINITY, half.expr)
    }
}

impl From<UpperBoundedLinear> for BoundedLinearExpr {
    fn from(half: UpperBoundedLinear) -> Self {
        BoundedLinearExpr::new(f64::NEG_INFINITY, half.upper, half.expr)
    }
}

impl LinearExpr {
    /// `expr <= upper`.
    pub fn le_scalar(self, upper: f64) -> UpperBoundedLinear {
        UpperBoundedLinear { upper, expr: self }
    }

    /// `expr >= lower`.
    pub fn ge_scalar(self, lower: f64) -> LowerBoundedLinear {
        LowerBoundedLinear { lower, expr: self }
    }

    /// `expr == value`.
    pub fn eq_scalar(self, value: f64) -> BoundedLinearExpr {
        BoundedLinearExpr::new(value, value, self)
    }

    /// `lhs <= rhs`, rewritten as `lhs - rhs <= 0`.
    pub fn le_expr(self, rhs: impl Into<LinearExpr>) -> UpperBoundedLinear {
        UpperBoundedLinear {
            upper: 0.0,
            expr: self - rhs.into(),
        }
    }

    /// `lhs >= rhs`, rewritten as `lhs - rhs >= 0`.
    pub fn ge_expr(self, rhs: impl Into<LinearExpr>) -> LowerBoundedLinear {
        LowerBoundedLinear {
            lower: 0.0,
            expr: self - rhs.into(),
        }
    }

    /// `lhs == rhs`, rewritten as `lhs - rhs == 0`.
    pub fn eq_expr(self, rhs: impl Into<LinearExpr>) -> BoundedLinearExpr {
        BoundedLinearExpr::new(0.0, 0.0, self - rhs.into())
    }
}

/// `lower <= expr <= upper` in one shot.
pub fn between(lower: f64, expr: impl Into<LinearExpr>, upper: f64) -> BoundedLinearExpr {
    BoundedLinearExpr::new(lower, upper, expr.into())
}

/// A quadratic expression bounded on both sides.
#[derive(Debug, Clone)]
pub struct BoundedQuadExpr {
    lower: f64,
    upper: f64,
    expr: QuadExpr,
}

/// A quadratic expression with only a lower bound so far.
#[derive(Debug, Clone)]
pub struct LowerBoundedQuad {
    lower: f64,
    expr: QuadExpr,
}

/// A quadratic expression with only an upper bound so far.
#[derive(Debug, Clone)]
pub struct UpperBoundedQuad {
    upper: f64,
    expr: QuadExpr,
}

impl BoundedQuadExpr {
    pub fn new(lower: f64, upper: f64, expr: QuadExpr) -> Self {
        Self { lower, upper, expr }
    }

    pub fn lower(&self) -> f64 {
        self.lower
    }

    pub fn upper(&self) -> f64 {
        self.upper
    }

    pub fn expr(&self) -> &QuadExpr {
        &self.expr
    }

    pub fn into_parts(self) -> (f64, f64, QuadExpr) {
        (self.lower, self.upper, self.expr)
    }
}

impl LowerBoundedQuad {
    pub fn le_scalar(self, upper: f64) -> BoundedQuadExpr {
        BoundedQuadExpr::new(self.lower, upper, self.expr)
    }
}

impl UpperBoundedQuad {
    pub fn ge_scalar(self, lower: f64) -> BoundedQuadExpr {
        BoundedQuadExpr::new(lower, self.upper, self.expr)
    }
}

impl From<LowerBoundedQuad> for BoundedQuadExpr {
    fn from(half: LowerBoundedQuad) -> Self {
        BoundedQuadExpr::new(half.lower, f64::INFINITY, half.expr)
    }
}

impl From<UpperBoundedQuad> for BoundedQuadExpr {
    fn from(half: UpperBoundedQuad) -> Self {
        BoundedQuadExpr::new(f64::NEG_INFINITY, half.upper, half.expr)
    }
}

impl QuadExpr {
    /// `expr <= upper`.
    pub fn le_scalar(self, upper: f64) -> UpperBoundedQuad {
        UpperBoundedQuad { upper, expr: self }
    }

    /// `expr >= lower`.
    pub fn ge_scalar(self, lower: f64) -> LowerBoundedQuad {
        LowerBoundedQuad { lower, expr: self }
    }

    /// `expr == value`.
    pub fn eq_scalar(self, value: f64) -> BoundedQuadExpr {
        BoundedQuadExpr::new(value, value, self)
    }

    /// `lhs <= rhs`, rewritten as `lhs - rhs <= 0`.
    pub fn le_expr(self, rhs: impl Into<QuadExpr>) -> UpperBoundedQuad {
        UpperBoundedQuad {
            upper: 0.0,
            expr: self - rhs.into(),
        }
    }

    /// `lhs >= rhs`, rewritten as `lhs - rhs >= 0`.
    pub fn ge_expr(self, rhs: impl Into<QuadExpr>) -> LowerBoundedQuad {
        LowerBoundedQuad {
            lower: 0.0,
            expr: self - rhs.into(),
        }
    }

    /// `lhs == rhs`, rewritten as `lhs - rhs == 0`.
    pub fn eq_expr(self, rhs: impl Into<QuadExpr>) -> BoundedQuadExpr {
        BoundedQuadExpr::new(0.0, 0.0, self - rhs.into())
    }
}

/// `lower <= expr <= upper` for quadratic expressions.
pub fn between_quadratic(lower: f64, expr: impl Into<QuadExpr>, upper: f64) -> BoundedQuadExpr {
    BoundedQuadExpr::new(lower, upper, expr.into())
}
