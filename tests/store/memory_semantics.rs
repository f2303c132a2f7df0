//! MemoryStore follows the remote store's mutation semantics.

use canopy_store::{StoreError, TreeStore};
use proptest::prelude::*;

use crate::common::*;

fn seeded() -> MemoryStore {
    MemoryStore::with_data(tree(cleanup_data()))
}

#[test]
fn write_then_read_returns_value() {
    let store = seeded();
    let value = tree(json!({"name": "cy", "tags": ["x", "y"]}));
    store.write(&p("users/3"), &value).unwrap();
    assert_eq!(store.read(&p("users/3")).unwrap(), value);
    assert_eq!(store.read(&p("users/3/tags/1")).unwrap(), TreeValue::from("y"));
}

#[test]
fn merge_replaces_only_named_keys() {
    let store = MemoryStore::with_data(tree(json!({"p": {"a": 0, "b": 2}})));
    store.merge(&p("p"), &tree(json!({"a": 1}))).unwrap();
    assert_eq!(store.read(&p("p")).unwrap().as_inner(), &json!({"a": 1, "b": 2}));
}

#[test]
fn merge_replaces_whole_subtree_of_named_key() {
    let store = MemoryStore::with_data(tree(json!({"p": {"a": {"x": 1, "y": 2}}})));
    store.merge(&p("p"), &tree(json!({"a": {"z": 3}}))).unwrap();
    assert_eq!(store.read(&p("p/a")).unwrap().as_inner(), &json!({"z": 3}));
}

#[test]
fn merge_into_scalar_overwrites() {
    let store = MemoryStore::with_data(tree(json!({"p": 5})));
    store.merge(&p("p"), &tree(json!({"a": 1}))).unwrap();
    assert_eq!(store.read(&p("p")).unwrap().as_inner(), &json!({"a": 1}));
}

#[test]
fn remove_clears_value_and_descendants() {
    let store = seeded();
    store.remove(&p("users/1")).unwrap();
    assert!(store.read(&p("users/1")).unwrap().is_null());
    assert!(store.read(&p("users/1/name")).unwrap().is_null());
    assert_eq!(store.read(&p("users/2/name")).unwrap(), TreeValue::from("bob"));
}

#[test]
fn removing_list_element_keeps_later_indices() {
    let store = MemoryStore::with_data(tree(json!({"l": ["a", "b", "c"]})));
    store.remove(&p("l/0")).unwrap();
    assert_eq!(store.read(&p("l/1")).unwrap(), TreeValue::from("b"));
    assert_eq!(store.read(&p("l/2")).unwrap(), TreeValue::from("c"));
    assert!(store.read(&p("l/0")).unwrap().is_null());

    // Two removals planned against the original indices hit the right items
    store.remove(&p("l/1")).unwrap();
    assert_eq!(store.read(&p("l")).unwrap().as_inner(), &json!({"2": "c"}));
}

#[test]
fn writing_past_list_end_keeps_existing_items() {
    let store = MemoryStore::with_data(tree(json!({"l": ["a", "b"]})));
    store.write(&p("l/5"), &TreeValue::from("z")).unwrap();
    assert_eq!(store.read(&p("l/0")).unwrap(), TreeValue::from("a"));
    assert_eq!(store.read(&p("l/5")).unwrap(), TreeValue::from("z"));
}

#[test]
fn named_key_on_list_is_written() {
    let store = MemoryStore::with_data(tree(json!({"l": ["a"]})));
    store.write(&p("l/name"), &TreeValue::from("n")).unwrap();
    assert_eq!(store.read(&p("l/name")).unwrap(), TreeValue::from("n"));
    assert_eq!(store.read(&p("l/0")).unwrap(), TreeValue::from("a"));
}

#[test]
fn written_nulls_and_empty_containers_are_not_stored() {
    let store = MemoryStore::new();
    store
        .write(&p("x"), &tree(json!({"a": null, "b": 1, "c": {}})))
        .unwrap();
    assert_eq!(store.read(&p("x")).unwrap().as_inner(), &json!({"b": 1}));
    assert_eq!(store.read_shallow(&p("x")).unwrap().as_inner(), &json!({"b": 1}));

    store.write(&p("y"), &tree(json!({"only": {}}))).unwrap();
    assert!(store.read(&p("y")).unwrap().is_null());
    assert_eq!(store.snapshot().as_inner(), &json!({"x": {"b": 1}}));
}

#[test]
fn merged_members_are_stripped_like_writes() {
    let store = MemoryStore::with_data(tree(json!({"p": {"a": 0}})));
    store
        .merge(&p("p"), &tree(json!({"b": {"c": null}, "d": {"e": 1, "f": []}})))
        .unwrap();
    assert_eq!(store.read(&p("p")).unwrap().as_inner(), &json!({"a": 0, "d": {"e": 1}}));
}

#[test]
fn shallow_read_lists_children() {
    let store = seeded();
    let shallow = store.read_shallow(&TreePath::root()).unwrap();
    assert_eq!(shallow.as_inner(), &json!({"users": true, "settings": true}));
}

#[test]
fn denied_subtree_refuses_every_mutation() {
    let store = seeded();
    store.deny_writes_under(p("settings"));
    let denied = StoreError::PermissionDenied {
        path: "settings/theme".into(),
    };
    assert_eq!(
        store.write(&p("settings/theme"), &TreeValue::from("dark")),
        Err(denied.clone())
    );
    assert_eq!(
        store.merge(&p("settings/theme"), &tree(json!({"a": 1}))),
        Err(denied.clone())
    );
    assert_eq!(store.remove(&p("settings/theme")), Err(denied));
    assert_eq!(store.snapshot().as_inner(), &cleanup_data());
}

fn key() -> impl Strategy<Value = String> {
    "[a-z0-9]{1,6}"
}

fn scalar() -> impl Strategy<Value = serde_json::Value> {
    prop_oneof![
        any::<bool>().prop_map(serde_json::Value::from),
        any::<i64>().prop_map(serde_json::Value::from),
        "[a-zA-Z ]{1,12}".prop_map(serde_json::Value::from),
    ]
}

proptest! {
    #[test]
    fn prop_write_read_roundtrip(
        keys in proptest::collection::vec(key(), 1..4),
        value in scalar(),
    ) {
        let store = MemoryStore::new();
        let path = TreePath::from_segments(keys).unwrap();
        store.write(&path, &tree(value.clone())).unwrap();
        let read_back = store.read(&path).unwrap();
        prop_assert_eq!(read_back.as_inner(), &value);
    }

    #[test]
    fn prop_remove_reads_null_below(
        keys in proptest::collection::vec(key(), 1..4),
        child in key(),
        value in scalar(),
    ) {
        let store = MemoryStore::new();
        let path = TreePath::from_segments(keys).unwrap();
        let below = path.clone().child(child.clone());
        store.write(&path, &tree(json!({ child: value }))).unwrap();
        store.remove(&path).unwrap();
        prop_assert!(store.read(&path).unwrap().is_null());
        prop_assert!(store.read(&below).unwrap().is_null());
    }
}
