//! RestStore against a local mock server.

use std::net::TcpListener;
use std::thread;
use std::time::{Duration, Instant};

use canopy_store::{RestStore, StoreError, TreeStore};
use mockito::{Matcher, Server};

use crate::common::*;

fn store(server: &Server) -> RestStore {
    RestStore::new(&server.url(), None).unwrap()
}

#[test]
fn read_gets_exact_path() {
    let mut server = Server::new();
    let mock = server
        .mock("GET", "/users/1.json")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"name":"ada","age":36}"#)
        .create();

    let value = store(&server).read(&p("users/1")).unwrap();
    assert_eq!(value.as_inner(), &json!({"name": "ada", "age": 36}));
    mock.assert();
}

#[test]
fn read_of_empty_path_is_null() {
    let mut server = Server::new();
    let _mock = server
        .mock("GET", "/missing.json")
        .with_status(200)
        .with_body("null")
        .create();
    assert!(store(&server).read(&p("missing")).unwrap().is_null());
}

#[test]
fn root_maps_to_dot_json() {
    let mut server = Server::new();
    let mock = server
        .mock("GET", "/.json")
        .with_status(200)
        .with_body(r#"{"a":1}"#)
        .create();
    assert_eq!(
        store(&server).read(&TreePath::root()).unwrap().child_count(),
        1
    );
    mock.assert();
}

#[test]
fn write_puts_json_body() {
    let mut server = Server::new();
    let mock = server
        .mock("PUT", "/settings/theme.json")
        .match_header("content-type", "application/json")
        .match_body(Matcher::Json(json!("dark")))
        .with_status(200)
        .with_body(r#""dark""#)
        .create();

    store(&server)
        .write(&p("settings/theme"), &TreeValue::from("dark"))
        .unwrap();
    mock.assert();
}

#[test]
fn merge_patches_json_body() {
    let mut server = Server::new();
    let mock = server
        .mock("PATCH", "/settings.json")
        .match_body(Matcher::Json(json!({"lang": "fr", "old": null})))
        .with_status(200)
        .with_body(r#"{"lang":"fr"}"#)
        .create();

    store(&server)
        .merge(&p("settings"), &tree(json!({"lang": "fr", "old": null})))
        .unwrap();
    mock.assert();
}

#[test]
fn remove_deletes() {
    let mut server = Server::new();
    let mock = server
        .mock("DELETE", "/users/1.json")
        .with_status(200)
        .with_body("null")
        .create();
    store(&server).remove(&p("users/1")).unwrap();
    mock.assert();
}

#[test]
fn auth_token_goes_in_query() {
    let mut server = Server::new();
    let mock = server
        .mock("GET", "/users.json")
        .match_query(Matcher::UrlEncoded("auth".into(), "s3cret".into()))
        .with_status(200)
        .with_body("{}")
        .create();

    let store = RestStore::new(&server.url(), Some("s3cret")).unwrap();
    store.read(&p("users")).unwrap();
    mock.assert();
}

#[test]
fn shallow_read_and_probe_use_shallow_query() {
    let mut server = Server::new();
    let shallow = server
        .mock("GET", "/users.json")
        .match_query(Matcher::UrlEncoded("shallow".into(), "true".into()))
        .with_status(200)
        .with_body(r#"{"1":true,"2":true}"#)
        .create();
    let probe = server
        .mock("GET", "/.json")
        .match_query(Matcher::UrlEncoded("shallow".into(), "true".into()))
        .with_status(200)
        .with_body("null")
        .create();

    let store = store(&server);
    let keys = store.read_shallow(&p("users")).unwrap().child_keys();
    assert_eq!(keys, vec!["1".to_string(), "2".to_string()]);
    store.probe().unwrap();
    shallow.assert();
    probe.assert();
}

#[test]
fn unauthorized_is_permission_denied() {
    let mut server = Server::new();
    let _m401 = server
        .mock("GET", "/private.json")
        .with_status(401)
        .with_body(r#"{"error":"Permission denied"}"#)
        .create();
    let _m403 = server
        .mock("PUT", "/private.json")
        .with_status(403)
        .with_body(r#"{"error":"Permission denied"}"#)
        .create();

    let store = store(&server);
    assert_eq!(
        store.read(&p("private")).unwrap_err(),
        StoreError::PermissionDenied {
            path: "private".into()
        }
    );
    assert!(matches!(
        store.write(&p("private"), &TreeValue::from(1i64)),
        Err(StoreError::PermissionDenied { .. })
    ));
}

#[test]
fn probe_not_found_names_the_database() {
    let mut server = Server::new();
    let _mock = server
        .mock("GET", "/.json")
        .match_query(Matcher::Any)
        .with_status(404)
        .with_body(r#"{"error":"Firebase error. Please ensure that you spelled the name of your Firebase correctly"}"#)
        .create();

    let store = store(&server);
    assert_eq!(
        store.probe().unwrap_err(),
        StoreError::NotFound {
            path: store.base_url().to_string()
        }
    );
}

#[test]
fn bad_request_carries_store_message() {
    let mut server = Server::new();
    let _mock = server
        .mock("PUT", "/x.json")
        .with_status(400)
        .with_body(r#"{"error":"Invalid data; couldn't parse JSON object"}"#)
        .create();

    assert_eq!(
        store(&server)
            .write(&p("x"), &TreeValue::from(1i64))
            .unwrap_err(),
        StoreError::MalformedRequest {
            reason: "Invalid data; couldn't parse JSON object".into()
        }
    );
}

#[test]
fn other_status_is_request_failed() {
    let mut server = Server::new();
    let _mock = server
        .mock("GET", "/x.json")
        .with_status(503)
        .with_body("busy")
        .create();

    assert_eq!(
        store(&server).read(&p("x")).unwrap_err(),
        StoreError::RequestFailed {
            status: 503,
            reason: "busy".into()
        }
    );
}

#[test]
fn non_json_success_body_is_invalid_response() {
    let mut server = Server::new();
    let _mock = server
        .mock("GET", "/x.json")
        .with_status(200)
        .with_body("<html>login</html>")
        .create();

    assert!(matches!(
        store(&server).read(&p("x")),
        Err(StoreError::InvalidResponse { .. })
    ));
}

#[test]
fn unreachable_host_is_network_failure() {
    let store = RestStore::new("http://127.0.0.1:1", None).unwrap();
    assert!(matches!(
        store.probe(),
        Err(StoreError::NetworkFailure { .. })
    ));
}

/// Accept connections and hold them open without ever answering.
fn silent_server(hold: Duration) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    thread::spawn(move || {
        let mut held = Vec::new();
        let deadline = Instant::now() + hold;
        listener.set_nonblocking(true).unwrap();
        while Instant::now() < deadline {
            if let Ok((stream, _)) = listener.accept() {
                held.push(stream);
            }
            thread::sleep(Duration::from_millis(20));
        }
    });
    format!("http://{}", addr)
}

#[test]
fn probe_of_silent_server_times_out() {
    let url = silent_server(Duration::from_secs(15));
    let store = RestStore::new(&url, None).unwrap();

    let started = Instant::now();
    let err = store.probe().unwrap_err();
    assert_eq!(err, StoreError::Timeout { after_ms: 8000 });
    assert!(started.elapsed() >= Duration::from_secs(7));
    assert!(started.elapsed() < Duration::from_secs(14));
}

#[test]
fn read_of_silent_server_uses_request_deadline() {
    let url = silent_server(Duration::from_secs(5));
    let store = RestStore::new(&url, None)
        .unwrap()
        .with_timeout(Duration::from_millis(300));
    assert_eq!(
        store.read(&p("a")).unwrap_err(),
        StoreError::Timeout { after_ms: 300 }
    );
}

#[test]
fn console_connects_through_rest() {
    let mut server = Server::new();
    let _root = server
        .mock("GET", "/.json")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"users":{"1":"ada"}}"#)
        .create();

    let mut console = Console::default();
    console.connect_url(&server.url(), None).unwrap();
    assert!(console.is_connected());
    assert_eq!(console.snapshot().as_inner(), &json!({"users": {"1": "ada"}}));
}

#[test]
fn failed_probe_leaves_console_disconnected() {
    let mut server = Server::new();
    let _probe = server
        .mock("GET", "/.json")
        .match_query(Matcher::Any)
        .with_status(401)
        .create();

    let mut console = Console::default();
    let err = console.connect_url(&server.url(), Some("wrong")).unwrap_err();
    assert!(matches!(err, Error::PermissionDenied { .. }));
    assert!(!console.is_connected());
}
