//! End-to-end incremental flows: one model, several observers, and a
//! replica kept in sync through update patches.

use strata_core::{DiffId, Model, ModelUpdate};
use strata_expr::expr::LinearExpr;

fn seeded_model() -> Model {
    let mut model = Model::new();
    let x = model.add_variable(0.0, 1.0, true, "x").unwrap();
    let y = model.add_variable(0.0, 2.5, false, "y").unwrap();
    model
        .add_constraint_expr((2.0 * x + y).le_scalar(1.5), "capacity")
        .unwrap();
    model.minimize(2.0 * x + y).unwrap();
    model
}

fn sync(replica: &mut Model, model: &Model, tracker: DiffId) -> Option<ModelUpdate> {
    let update = model.export_update(tracker, false).unwrap();
    if let Some(update) = &update {
        replica.apply_update(update).unwrap();
    }
    update
}

#[test]
fn exports_of_an_unchanged_model_are_byte_identical() {
    let model = seeded_model();
    let first = serde_json::to_string(&model.export(false)).unwrap();
    let second = serde_json::to_string(&model.export(false)).unwrap();
    assert_eq!(first, second);
}

#[test]
fn snapshot_serialization_round_trips() {
    let model = seeded_model();
    let snapshot = model.export(false);
    let encoded = serde_json::to_string(&snapshot).unwrap();
    let decoded: strata_core::ModelSnapshot = serde_json::from_str(&encoded).unwrap();
    assert_eq!(decoded, snapshot);
}

#[test]
fn replica_follows_a_stream_of_updates() {
    let mut model = seeded_model();
    let mut replica = model.clone();
    let tracker = model.add_update_tracker();

    // Round one: a new variable enters an existing constraint's world.
    let z = model.add_variable(0.0, 4.0, false, "z").unwrap();
    model
        .add_constraint_expr((LinearExpr::from(z)).ge_scalar(0.5), "floor")
        .unwrap();
    assert!(sync(&mut replica, &model, tracker).is_some());
    model.advance_checkpoint(tracker).unwrap();
    assert_eq!(replica.export(false), model.export(false));

    // Round two: mutate, then delete the new variable again.
    model.set_variable_upper_bound(z, 8.0).unwrap();
    model.delete_variable(z);
    assert!(sync(&mut replica, &model, tracker).is_some());
    model.advance_checkpoint(tracker).unwrap();
    assert_eq!(replica.export(false), model.export(false));

    // Round three: nothing changed, nothing to solve.
    assert_eq!(model.export_update(tracker, false).unwrap(), None);
}

#[test]
fn independent_observers_keep_independent_baselines() {
    let mut model = seeded_model();
    let variables = model.variable_ids();
    let x = variables[0];

    let solver_view = model.add_update_tracker();
    model.set_variable_upper_bound(x, 0.5).unwrap();
    let serializer_view = model.add_update_tracker();
    model.set_variable_lower_bound(x, 0.25).unwrap();

    let solver_update = model.export_update(solver_view, false).unwrap().unwrap();
    assert_eq!(solver_update.attrs.double1.len(), 2);

    let serializer_update = model
        .export_update(serializer_view, false)
        .unwrap()
        .unwrap();
    assert_eq!(serializer_update.attrs.double1.len(), 1);

    // Consuming one view leaves the other untouched.
    model.advance_checkpoint(solver_view).unwrap();
    assert_eq!(model.export_update(solver_view, false).unwrap(), None);
    assert!(model
        .export_update(serializer_view, false)
        .unwrap()
        .is_some());
}

#[test]
fn name_stripped_updates_still_apply() {
    let mut model = seeded_model();
    let mut replica = model.clone();
    let tracker = model.add_update_tracker();

    model.add_variable(0.0, 1.0, false, "secret").unwrap();
    let update = model.export_update(tracker, true).unwrap().unwrap();
    assert_eq!(update.created[0].elements[0].name, None);
    replica.apply_update(&update).unwrap();

    // Attribute state matches even though the replica never saw the name.
    assert_eq!(replica.export(true), model.export(true));
}
