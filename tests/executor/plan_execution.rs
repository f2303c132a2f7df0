//! Plan engine behaviour against a live console.

use canopy::{execute_plan, PlanReport};

use crate::common::*;

#[test]
fn applies_every_action_in_order() {
    let (store, mut console) = memory_console(cleanup_data());

    let report = console.apply_plan(&cleanup_plan()).unwrap();

    assert_eq!(report, PlanReport { completed: 2 });
    assert_eq!(
        store.snapshot().as_inner(),
        &json!({
            "users": {"2": {"name": "bob"}},
            "settings": {"theme": "dark", "lang": "en"}
        })
    );
    assert_eq!(console.snapshot(), &store.snapshot());
}

#[test]
fn first_failure_stops_the_plan() {
    let (store, mut console) = memory_console(cleanup_data());
    store.deny_writes_under(p("users"));

    let err = console.apply_plan(&cleanup_plan()).unwrap_err();

    match err {
        Error::PartialPlanExecution {
            completed,
            total,
            source,
        } => {
            assert_eq!(completed, 0);
            assert_eq!(total, 2);
            assert!(matches!(*source, Error::PermissionDenied { .. }));
        }
        other => panic!("expected PartialPlanExecution, got {:?}", other),
    }
    // The SET after the failed DELETE never ran
    assert_eq!(store.read(&p("settings/theme")).unwrap(), TreeValue::from("light"));
}

#[test]
fn partial_effect_is_visible_after_failure() {
    let (store, mut console) = memory_console(cleanup_data());
    store.deny_writes_under(p("settings"));

    let err = console.apply_plan(&cleanup_plan()).unwrap_err();

    assert!(matches!(
        err,
        Error::PartialPlanExecution { completed: 1, total: 2, .. }
    ));
    assert!(canopy_core::get_at_path(console.snapshot(), &p("users/1")).is_none());
    assert_eq!(console.snapshot(), &store.snapshot());
}

#[test]
fn merge_actions_keep_unnamed_keys() {
    let (store, mut console) = memory_console(cleanup_data());
    let plan = ActionPlan::new(
        "Switch language.",
        vec![Action::merge(p("settings"), tree(json!({"lang": "fr"})))],
    );

    console.apply_plan(&plan).unwrap();

    assert_eq!(
        store.read(&p("settings")).unwrap().as_inner(),
        &json!({"theme": "light", "lang": "fr"})
    );
}

#[test]
fn empty_plan_completes_with_nothing_applied() {
    let (store, mut console) = memory_console(cleanup_data());
    let report = console
        .apply_plan(&ActionPlan::new("Nothing to do.", vec![]))
        .unwrap();
    assert_eq!(report.completed, 0);
    assert_eq!(store.snapshot().as_inner(), &cleanup_data());
}

#[test]
fn engine_runs_without_a_console() {
    let store = std::sync::Arc::new(MemoryStore::with_data(tree(cleanup_data())));
    let executor = canopy::Executor::new(Box::new(store.clone()));

    let report = execute_plan(&executor, &cleanup_plan()).unwrap();

    assert_eq!(report.completed, 2);
    assert!(store.read(&p("users/1")).unwrap().is_null());
}

#[test]
fn plan_on_disconnected_console_fails() {
    let mut console = Console::default();
    assert_eq!(console.apply_plan(&cleanup_plan()), Err(Error::NotConnected));
}
