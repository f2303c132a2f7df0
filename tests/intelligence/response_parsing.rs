//! Validation of model responses before anything reaches the engine.

use canopy_intelligence::parse_plan_response;

use crate::common::*;

#[test]
fn well_formed_response_becomes_plan() {
    let plan = parse_plan_response(
        r#"{
            "message": "Removing user 1 and switching to dark mode.",
            "actions": [
                {"type": "DELETE", "path": "/users/1"},
                {"type": "SET", "path": "/settings/theme", "data": "dark"}
            ]
        }"#,
    )
    .unwrap();
    assert_eq!(plan, cleanup_plan());
}

#[test]
fn fenced_response_is_accepted() {
    let text = "```json\n{\"message\": \"ok\", \"actions\": [{\"type\": \"UPDATE\", \"path\": \"settings\", \"data\": {\"lang\": \"fr\"}}]}\n```";
    let plan = parse_plan_response(text).unwrap();
    assert_eq!(plan.len(), 1);
    assert_eq!(plan.actions[0].kind(), ActionKind::Merge);
    assert_eq!(plan.actions[0].payload(), Some(&tree(json!({"lang": "fr"}))));
}

#[test]
fn actions_not_a_list_gives_empty_plan() {
    for actions in [
        json!("DELETE users/1"),
        json!({"type": "DELETE", "path": "users/1"}),
        json!(null),
        json!(3),
    ] {
        let text = json!({"message": "hmm", "actions": actions}).to_string();
        let plan = parse_plan_response(&text).unwrap();
        assert!(plan.is_empty(), "actions {:?}", actions);
        assert_eq!(plan.message, "hmm");
    }
    let plan = parse_plan_response(r#"{"message": "no actions key"}"#).unwrap();
    assert!(plan.is_empty());
}

#[test]
fn unknown_kind_rejects_whole_plan() {
    let err = parse_plan_response(
        r#"{"message": "m", "actions": [
            {"type": "DELETE", "path": "a"},
            {"type": "RENAME", "path": "b", "data": "c"}
        ]}"#,
    )
    .unwrap_err();
    match err {
        PlanError::InvalidResponse(reason) => assert!(reason.contains("action 1"), "{}", reason),
        other => panic!("expected InvalidResponse, got {:?}", other),
    }
}

#[test]
fn set_without_data_is_rejected_but_null_data_is_not() {
    assert!(matches!(
        parse_plan_response(r#"{"message": "m", "actions": [{"type": "SET", "path": "a"}]}"#),
        Err(PlanError::InvalidResponse(_))
    ));
    let plan = parse_plan_response(
        r#"{"message": "m", "actions": [{"type": "SET", "path": "a", "data": null}]}"#,
    )
    .unwrap();
    assert!(plan.actions[0].payload().unwrap().is_null());
}

#[test]
fn delete_ignores_data() {
    let plan = parse_plan_response(
        r#"{"message": "m", "actions": [{"type": "DELETE", "path": "a", "data": 1}]}"#,
    )
    .unwrap();
    assert_eq!(plan.actions[0], Action::remove(p("a")));
}

#[test]
fn only_one_leading_slash_is_stripped() {
    let plan = parse_plan_response(
        r#"{"message": "m", "actions": [{"type": "DELETE", "path": "/users/1/"}]}"#,
    )
    .unwrap();
    assert_eq!(plan.actions[0].path(), &p("users/1"));

    for path in ["//users/1", "a//b"] {
        let text = json!({"message": "m", "actions": [{"type": "DELETE", "path": path}]}).to_string();
        assert!(
            matches!(parse_plan_response(&text), Err(PlanError::InvalidResponse(_))),
            "{path} should be rejected"
        );
    }
}

#[test]
fn delete_of_root_rejects_plan() {
    for path in ["/", ""] {
        let text = json!({"message": "wipe", "actions": [
            {"type": "SET", "path": "a", "data": 1},
            {"type": "DELETE", "path": path}
        ]})
        .to_string();
        assert!(matches!(parse_plan_response(&text), Err(PlanError::InvalidResponse(_))));
    }

    let plan = parse_plan_response(
        r#"{"message": "reset", "actions": [{"type": "SET", "path": "/", "data": {"a": 1}}]}"#,
    )
    .unwrap();
    assert!(plan.actions[0].path().is_root());
}

#[test]
fn single_line_fence_with_info_string() {
    let plan = parse_plan_response("```json{\"message\":\"x\",\"actions\":[]}```").unwrap();
    assert_eq!(plan.message, "x");
    assert!(plan.is_empty());
}

#[test]
fn non_string_path_is_rejected() {
    assert!(matches!(
        parse_plan_response(r#"{"message": "m", "actions": [{"type": "DELETE", "path": 7}]}"#),
        Err(PlanError::InvalidResponse(_))
    ));
}

#[test]
fn envelope_errors() {
    for text in [
        "I could not do that.",
        "[1, 2]",
        r#"{"actions": []}"#,
        r#"{"message": 5, "actions": []}"#,
    ] {
        assert!(
            matches!(parse_plan_response(text), Err(PlanError::InvalidResponse(_))),
            "text {:?}",
            text
        );
    }
}
