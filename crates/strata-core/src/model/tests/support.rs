use strata_expr::ids::VariableId;

use crate::model::Model;

pub(super) fn bounded_variable(model: &mut Model, lower: f64, upper: f64) -> VariableId {
    let index = model.num_variables();
    model
        .add_variable(lower, upper, false, &format!("v{index}"))
        .expect("variable bounds are valid")
}

/// A model with `x` in [0, 1] integer and `y` in [0, 2.5] continuous.
pub(super) fn small_model() -> (Model, VariableId, VariableId) {
    let mut model = Model::new();
    let x = model
        .add_variable(0.0, 1.0, true, "x")
        .expect("variable bounds are valid");
    let y = model
        .add_variable(0.0, 2.5, false, "y")
        .expect("variable bounds are valid");
    (model, x, y)
}

/// A model with two binary variables `x` and `y`.
pub(super) fn binary_pair() -> (Model, VariableId, VariableId) {
    let mut model = Model::new();
    let x = model
        .add_variable(0.0, 1.0, true, "x")
        .expect("variable bounds are valid");
    let y = model
        .add_variable(0.0, 1.0, true, "y")
        .expect("variable bounds are valid");
    (model, x, y)
}
