//! Node editor flows end to end: every mutation refreshes the snapshot.

use canopy::{TreeView, VisibleNode};

use crate::common::*;

fn row<'a>(rows: &'a [VisibleNode], path: &str) -> Option<&'a VisibleNode> {
    let path = p(path);
    rows.iter().find(|r| r.path == path)
}

#[test]
fn inline_edit_infers_types() {
    let (store, mut console) = memory_console(json!({"a": "x"}));
    for (raw, expected) in [
        ("true", json!(true)),
        ("42", json!(42)),
        ("{\"x\":1}", json!({"x": 1})),
        ("hello", json!("hello")),
        ("[1, 2]", json!([1, 2])),
    ] {
        console.begin_edit(&p("a")).unwrap();
        let written = console.commit_edit(&p("a"), raw).unwrap();
        assert_eq!(written.as_inner(), &expected, "raw {:?}", raw);
        assert_eq!(store.read(&p("a")).unwrap().as_inner(), &expected);
        assert!(!console.view().is_editing(&p("a")));
    }
}

#[test]
fn inline_edit_null_removes_the_node() {
    let (store, mut console) = memory_console(json!({"a": 1, "b": 2}));
    console.commit_edit(&p("a"), "null").unwrap();
    assert_eq!(store.snapshot().as_inner(), &json!({"b": 2}));
    assert!(row(&console.visible_nodes(), "a").is_none());
}

#[test]
fn add_child_under_object_and_empty_root() {
    let (store, mut console) = memory_console(json!({"users": {"1": "ada"}}));
    console.begin_child(&p("users")).unwrap();
    let child = console.commit_child(&p("users"), " 2 ", "{\"name\":\"bob\"}").unwrap();
    assert_eq!(child, p("users/2"));
    assert_eq!(store.read(&p("users/2/name")).unwrap(), TreeValue::from("bob"));
    assert!(console.view().child_draft(&p("users")).is_none());

    let (store, mut console) = memory_console(serde_json::Value::Null);
    console.commit_child(&TreePath::root(), "config", "{broken").unwrap();
    assert_eq!(store.read(&p("config")).unwrap(), TreeValue::from("{broken"));
}

#[test]
fn add_child_under_list() {
    let (store, mut console) = memory_console(json!({"tags": ["a", "b"]}));
    console.commit_child(&p("tags"), "2", "c").unwrap();
    assert_eq!(store.read(&p("tags")).unwrap().as_inner(), &json!(["a", "b", "c"]));

    console.commit_child(&p("tags"), "note", "x").unwrap();
    assert_eq!(store.read(&p("tags/note")).unwrap(), TreeValue::from("x"));
    assert_eq!(store.read(&p("tags/0")).unwrap(), TreeValue::from("a"));
}

#[test]
fn add_child_rejects_blank_key_and_scalar_parent() {
    let (store, mut console) = memory_console(json!({"name": "ada"}));
    assert!(matches!(
        console.commit_child(&TreePath::root(), "  ", "1"),
        Err(Error::InvalidInput { .. })
    ));
    assert!(matches!(
        console.commit_child(&p("name"), "first", "ada"),
        Err(Error::InvalidInput { .. })
    ));
    assert_eq!(store.snapshot().as_inner(), &json!({"name": "ada"}));
}

#[test]
fn delete_needs_both_steps() {
    let (store, mut console) = memory_console(cleanup_data());

    let pending = console.request_delete(&p("users/1")).unwrap();
    assert_eq!(pending.path(), &p("users/1"));
    assert_eq!(store.snapshot().as_inner(), &cleanup_data());

    console.confirm_delete(pending).unwrap();
    assert!(store.read(&p("users/1")).unwrap().is_null());
    assert!(row(&console.visible_nodes(), "users/1").is_none());
    assert!(row(&console.visible_nodes(), "users/2").is_some());
}

#[test]
fn root_delete_is_refused() {
    let (_, console) = memory_console(cleanup_data());
    assert!(matches!(
        console.request_delete(&TreePath::root()),
        Err(Error::InvalidInput { .. })
    ));
}

#[test]
fn denied_write_surfaces_and_keeps_snapshot() {
    let (store, mut console) = memory_console(cleanup_data());
    store.deny_writes_under(p("settings"));
    console.begin_edit(&p("settings/theme")).unwrap();

    let err = console.commit_edit(&p("settings/theme"), "dark").unwrap_err();

    assert_eq!(
        err,
        Error::PermissionDenied {
            path: "settings/theme".into()
        }
    );
    assert!(console.view().is_editing(&p("settings/theme")));
    assert_eq!(console.snapshot().as_inner(), &cleanup_data());
}

#[test]
fn out_of_band_change_appears_after_refresh() {
    let (store, mut console) = memory_console(cleanup_data());
    store.write(&p("users/3"), &tree(json!({"name": "cy"}))).unwrap();
    assert!(row(&console.visible_nodes(), "users/3").is_none());

    console.refresh().unwrap();
    assert!(row(&console.visible_nodes(), "users/3").is_some());
}

#[test]
fn default_view_expands_two_levels() {
    let data = json!({"a": {"b": {"c": {"d": 1}}}});
    let (_, console) = memory_console(data);
    let rows = console.visible_nodes();

    assert!(row(&rows, "a").unwrap().expanded);
    assert!(row(&rows, "a/b").unwrap().expanded);
    assert!(!row(&rows, "a/b/c").unwrap().expanded);
    assert!(row(&rows, "a/b/c/d").is_none());
}

#[test]
fn collapse_and_expand_all() {
    let (_, mut console) = memory_console(json!({"a": {"b": {"c": {"d": 1}}}}));

    console.view_mut().collapse_all();
    let rows = console.visible_nodes();
    assert_eq!(rows.len(), 1);
    assert!(!rows[0].expanded);

    console.view_mut().expand_all();
    assert!(row(&console.visible_nodes(), "a/b/c/d").is_some());
}

#[test]
fn depth_cap_marks_truncation() {
    let store = std::sync::Arc::new(MemoryStore::with_data(tree(json!({"a": {"b": {"c": 1}}}))));
    let mut console = Console::new(TreeView::new(10, 2));
    console.connect_memory(Box::new(store)).unwrap();

    let rows = console.visible_nodes();
    let capped = row(&rows, "a/b").unwrap();
    assert!(capped.truncated);
    assert!(row(&rows, "a/b/c").is_none());
}

#[test]
fn disconnect_clears_everything() {
    let (_, mut console) = memory_console(cleanup_data());
    console.view_mut().collapse(&p("users"));
    console.disconnect();

    assert!(!console.is_connected());
    assert!(console.snapshot().is_null());
    assert!(console.view().state(&p("users")).is_none());
    assert_eq!(console.commit_edit(&p("a"), "1"), Err(Error::NotConnected));
}
