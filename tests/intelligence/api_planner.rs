//! ApiPlanner against a mock chat completions endpoint.

use canopy_intelligence::ApiPlanner;
use mockito::{Matcher, Server};

use crate::common::*;

const PATH: &str = "/v1/chat/completions";

fn completion(content: &str) -> String {
    json!({
        "choices": [{"message": {"role": "assistant", "content": content}}]
    })
    .to_string()
}

fn planner(server: &Server, key: Option<&str>) -> ApiPlanner {
    ApiPlanner::new(&format!("{}/v1", server.url()), "test-model", key, 5_000)
}

fn request() -> PlanRequest {
    PlanRequest::new(
        "delete user 1 and use dark mode",
        PlanContext::TopLevelKeys(vec!["users".into(), "settings".into()]),
    )
}

const PLAN_TEXT: &str = r#"{"message": "Removing user 1 and switching to dark mode.", "actions": [{"type": "DELETE", "path": "/users/1"}, {"type": "SET", "path": "settings/theme", "data": "dark"}]}"#;

#[test]
fn posts_chat_request_and_parses_plan() {
    let mut server = Server::new();
    let mock = server
        .mock("POST", PATH)
        .match_header("content-type", "application/json")
        .match_header("authorization", "Bearer sk-test")
        .match_body(Matcher::PartialJson(json!({
            "model": "test-model",
            "max_tokens": 1024
        })))
        .with_status(200)
        .with_body(completion(PLAN_TEXT))
        .create();

    let plan = planner(&server, Some("sk-test")).generate(&request()).unwrap();

    assert_eq!(plan, cleanup_plan());
    mock.assert();
}

#[test]
fn user_message_carries_instruction_and_keys() {
    let mut server = Server::new();
    let mock = server
        .mock("POST", PATH)
        .match_body(Matcher::Regex(
            "Top-level keys: users, settings".to_string(),
        ))
        .with_status(200)
        .with_body(completion(r#"{"message": "ok", "actions": []}"#))
        .create();

    planner(&server, None).generate(&request()).unwrap();
    mock.assert();
}

#[test]
fn no_key_sends_no_authorization() {
    let mut server = Server::new();
    let mock = server
        .mock("POST", PATH)
        .match_header("authorization", Matcher::Missing)
        .with_status(200)
        .with_body(completion(r#"{"message": "ok", "actions": []}"#))
        .create();

    planner(&server, None).generate(&request()).unwrap();
    mock.assert();
}

#[test]
fn server_error_is_model_error() {
    let mut server = Server::new();
    let _mock = server
        .mock("POST", PATH)
        .with_status(500)
        .with_body("overloaded")
        .create();

    assert!(matches!(
        planner(&server, None).generate(&request()),
        Err(PlanError::Model(_))
    ));
}

#[test]
fn unexpected_envelope_is_model_error() {
    let mut server = Server::new();
    let _mock = server
        .mock("POST", PATH)
        .with_status(200)
        .with_body(r#"{"result": "no choices here"}"#)
        .create();

    assert!(matches!(
        planner(&server, None).generate(&request()),
        Err(PlanError::Model(_))
    ));
}

#[test]
fn content_that_is_not_a_plan_is_invalid_response() {
    let mut server = Server::new();
    let _mock = server
        .mock("POST", PATH)
        .with_status(200)
        .with_body(completion("Sure! I deleted user 1 for you."))
        .create();

    assert!(matches!(
        planner(&server, None).generate(&request()),
        Err(PlanError::InvalidResponse(_))
    ));
}

#[test]
fn unreachable_endpoint_is_network_error() {
    let planner = ApiPlanner::new("http://127.0.0.1:1/v1", "m", None, 2_000);
    assert!(matches!(
        planner.generate(&request()),
        Err(PlanError::Network(_))
    ));
}

#[test]
fn generated_plan_runs_through_the_session() {
    let mut server = Server::new();
    let _mock = server
        .mock("POST", PATH)
        .with_status(200)
        .with_body(completion(PLAN_TEXT))
        .create();
    let (store, mut console) = memory_console(cleanup_data());
    let planner = planner(&server, None);

    let mut session = PlanSession::new();
    session.draft("delete user 1 and use dark mode", None).unwrap();
    assert_eq!(session.propose(&planner, &console).unwrap().len(), 2);
    session.confirm(&mut console).unwrap();

    assert_eq!(session.state(), PlanState::Completed);
    assert_eq!(
        store.snapshot().as_inner(),
        &json!({
            "users": {"2": {"name": "bob"}},
            "settings": {"theme": "dark", "lang": "en"}
        })
    );
}
