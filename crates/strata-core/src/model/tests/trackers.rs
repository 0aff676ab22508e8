use strata_expr::expr::LinearExpr;

use crate::elemental::attrs::DoubleAttr1;
use crate::elemental::error::ElementalError;
use crate::elemental::key::Key1;
use crate::model::ModelError;

use super::support::small_model;

#[test]
fn tracker_sees_all_mutations_since_creation() {
    let (mut model, x, y) = small_model();
    let early = model.add_update_tracker();

    model.set_variable_upper_bound(x, 9.0).unwrap();
    model.set_variable_lower_bound(y, 1.0).unwrap();
    let late = model.add_update_tracker();
    model.set_variable_lower_bound(y, 2.0).unwrap();

    let early_update = model.export_update(early, false).unwrap().unwrap();
    let rows: Vec<_> = early_update
        .attrs
        .double1
        .iter()
        .map(|export| (export.attr, export.rows.clone()))
        .collect();
    // Deduplicated, last value wins.
    assert_eq!(
        rows,
        vec![
            (DoubleAttr1::VariableLowerBound, vec![(Key1(y.inner()), 2.0)]),
            (DoubleAttr1::VariableUpperBound, vec![(Key1(x.inner()), 9.0)]),
        ]
    );

    // The late tracker only sees the write after its creation.
    let late_update = model.export_update(late, false).unwrap().unwrap();
    assert_eq!(late_update.attrs.double1.len(), 1);
    assert_eq!(
        late_update.attrs.double1[0].rows,
        vec![(Key1(y.inner()), 2.0)]
    );
}

#[test]
fn advance_clears_only_that_tracker() {
    let (mut model, x, _) = small_model();
    let first = model.add_update_tracker();
    let second = model.add_update_tracker();

    model.set_variable_upper_bound(x, 5.0).unwrap();
    model.advance_checkpoint(first).unwrap();

    assert_eq!(model.export_update(first, false).unwrap(), None);
    assert!(model.export_update(second, false).unwrap().is_some());
}

#[test]
fn every_live_tracker_observes_each_write() {
    let (mut model, x, _) = small_model();
    let first = model.add_update_tracker();
    let second = model.add_update_tracker();
    assert_eq!(model.num_update_trackers(), 2);

    model.set_variable_upper_bound(x, 3.0).unwrap();

    for tracker in [first, second] {
        let update = model.export_update(tracker, false).unwrap().unwrap();
        assert_eq!(update.attrs.double1[0].rows, vec![(Key1(x.inner()), 3.0)]);
    }
}

#[test]
fn removed_tracker_fails_loudly() {
    let (mut model, _, _) = small_model();
    let tracker = model.add_update_tracker();
    model.remove_update_tracker(tracker).unwrap();

    assert_eq!(
        model.export_update(tracker, false),
        Err(ModelError::Store(ElementalError::UsedAfterRemoval {
            diff: tracker
        }))
    );
    assert!(model.advance_checkpoint(tracker).is_err());
}

#[test]
fn update_patch_reconstructs_a_replica() {
    let (mut model, x, y) = small_model();
    model
        .add_constraint_expr((2.0 * x + y).le_scalar(4.0), "base")
        .unwrap();
    let mut replica = model.clone();
    let tracker = model.add_update_tracker();

    model
        .add_constraint_expr((LinearExpr::from(x) + y).ge_scalar(1.0), "added")
        .unwrap();
    model.set_variable_upper_bound(y, 7.5).unwrap();
    model.delete_variable(x);

    let update = model.export_update(tracker, false).unwrap().unwrap();
    replica.apply_update(&update).unwrap();
    assert_eq!(replica.export(false), model.export(false));
}

#[test]
fn deletions_of_new_constraints_cancel_out() {
    let (mut model, x, _) = small_model();
    let tracker = model.add_update_tracker();
    let constraint = model
        .add_constraint_expr((2.0 * x).le_scalar(1.0), "fleeting")
        .unwrap();
    assert!(model.delete_linear_constraint(constraint));
    assert_eq!(model.export_update(tracker, false).unwrap(), None);
}
