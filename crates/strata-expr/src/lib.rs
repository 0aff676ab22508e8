pub mod expr;
pub mod ids;

pub use expr::{
    between, between_quadratic, flatten_linear, flatten_quadratic, normalize_linear,
    normalize_quadratic, BoundedLinearExpr, BoundedQuadExpr, ExprError, LinearExpr, LinearForm,
    LowerBoundedLinear, LowerBoundedQuad, NormalizedLinear, NormalizedQuadratic, QuadExpr,
    QuadForm, UpperBoundedLinear, UpperBoundedQuad, VarPair,
};
pub use ids::{
    AuxiliaryObjectiveId, IndicatorConstraintId, LinearConstraintId, QuadraticConstraintId,
    VariableId,
};
