//! Path operations over an in-memory tree
//!
//! These implement the store's mutation semantics against a local
//! [`TreeValue`]:
//!
//! | Operation | Effect |
//! |-----------|--------|
//! | [`get_at_path`] | value at the path, `None` when absent |
//! | [`set_at_path`] | Replace: overwrite the subtree, creating parents |
//! | [`merge_at_path`] | Merge: replace each top-level key of the patch |
//! | [`delete_at_path`] | Remove: drop the subtree |
//!
//! The store has no arrays of its own: a list is an object whose keys
//! happen to be `0..n`. Mutations therefore address array elements by key,
//! never by position, and removing element `0` leaves `1` where it was.
//! A container is shown as an array again only while its keys are exactly
//! `0..n`.
//!
//! Null and empty containers mean "nothing here". They never end up in the
//! tree: null members and empty objects or arrays are dropped from written
//! values, and a container emptied by a mutation disappears with it.

use serde_json::{Map, Value};

use crate::path::TreePath;
use crate::value::{array_index, child_of, TreeValue};

/// Get the value at a path
///
/// # Examples
///
/// ```
/// use canopy_core::{get_at_path, TreePath, TreeValue};
///
/// let tree = TreeValue::from(serde_json::json!({"users": {"1": {"name": "Ada"}}}));
/// let path: TreePath = "users/1/name".parse().unwrap();
/// assert_eq!(get_at_path(&tree, &path).and_then(|v| v.as_str()), Some("Ada"));
/// assert!(get_at_path(&tree, &"users/2".parse().unwrap()).is_none());
/// ```
pub fn get_at_path<'a>(value: &'a TreeValue, path: &TreePath) -> Option<&'a TreeValue> {
    let mut current: &Value = value.as_inner();
    for segment in path.segments() {
        current = child_of(current, segment)?;
    }
    Some(TreeValue::wrap_ref(current))
}

/// Replace the subtree at `path` with `value`
///
/// Missing parents are created and scalar parents are replaced by objects.
/// A `null` (or empty) value removes the subtree.
///
/// # Examples
///
/// ```
/// use canopy_core::{set_at_path, TreePath, TreeValue};
/// use serde_json::json;
///
/// let mut tree = TreeValue::from(json!({"l": ["a", "b"]}));
/// set_at_path(&mut tree, &"l/5".parse().unwrap(), TreeValue::from("z"));
/// assert_eq!(tree.into_inner(), json!({"l": {"0": "a", "1": "b", "5": "z"}}));
/// ```
pub fn set_at_path(root: &mut TreeValue, path: &TreePath, value: TreeValue) {
    let current = std::mem::take(root.as_inner_mut());
    let rebuilt = rebuild(current, path.segments(), normalize(value.into_inner()));
    *root = TreeValue::from_value(rebuilt.unwrap_or(Value::Null));
}

/// Remove the subtree at `path`
///
/// Returns the removed value, or `None` if nothing was there. Removing the
/// root resets the tree to null. Siblings keep their keys, and ancestors
/// left empty are removed too.
pub fn delete_at_path(root: &mut TreeValue, path: &TreePath) -> Option<TreeValue> {
    let removed = get_at_path(root, path)?.clone();
    let current = std::mem::take(root.as_inner_mut());
    let rebuilt = rebuild(current, path.segments(), None);
    *root = TreeValue::from_value(rebuilt.unwrap_or(Value::Null));
    Some(removed)
}

/// Merge `patch` into the subtree at `path`
///
/// For an object patch, each top-level key replaces that child's subtree and
/// keys absent from the patch are kept; a `null` member removes its key. A
/// non-object patch, or a patch into a scalar or empty node, overwrites like
/// [`set_at_path`]. An empty patch changes nothing.
///
/// # Examples
///
/// ```
/// use canopy_core::{merge_at_path, TreePath, TreeValue};
/// use serde_json::json;
///
/// let mut tree = TreeValue::from(json!({"p": {"a": 0, "b": 2}}));
/// let path: TreePath = "p".parse().unwrap();
/// merge_at_path(&mut tree, &path, TreeValue::from(json!({"a": 1})));
/// assert_eq!(tree.into_inner(), json!({"p": {"a": 1, "b": 2}}));
/// ```
pub fn merge_at_path(root: &mut TreeValue, path: &TreePath, patch: TreeValue) {
    let members = match patch.into_inner() {
        Value::Object(members) => members,
        other => return set_at_path(root, path, TreeValue::from_value(other)),
    };
    if members.is_empty() {
        return;
    }

    let target_is_container = get_at_path(root, path).is_some_and(|v| v.is_container());
    if !target_is_container {
        return set_at_path(root, path, TreeValue::from_value(Value::Object(members)));
    }

    for (key, value) in members {
        let child = path.clone().child(key);
        set_at_path(root, &child, TreeValue::from_value(value));
    }
}

/// Put `value` (already normalized) at `segments` below `node`.
///
/// Returns the new node, or `None` when nothing is left of it.
fn rebuild(node: Value, segments: &[String], value: Option<Value>) -> Option<Value> {
    let Some((key, rest)) = segments.split_first() else {
        return value;
    };
    let mut map = into_map(node);
    let child = map.get_mut(key.as_str()).map(std::mem::take).unwrap_or_default();
    match rebuild(child, rest, value) {
        // Insert on an existing key keeps its position
        Some(child) => {
            map.insert(key.clone(), child);
        }
        None => {
            map.shift_remove(key.as_str());
        }
    }
    from_map(map)
}

/// Drop null members and empty containers, recursively.
fn normalize(value: Value) -> Option<Value> {
    match value {
        Value::Null => None,
        Value::Object(members) => {
            let map = members
                .into_iter()
                .filter_map(|(key, child)| normalize(child).map(|child| (key, child)))
                .collect();
            from_map(map)
        }
        Value::Array(items) => {
            let map = items
                .into_iter()
                .enumerate()
                .filter_map(|(index, child)| normalize(child).map(|child| (index.to_string(), child)))
                .collect();
            from_map(map)
        }
        scalar => Some(scalar),
    }
}

/// Children of a container keyed by name; anything else has none.
fn into_map(node: Value) -> Map<String, Value> {
    match node {
        Value::Object(map) => map,
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .filter(|(_, child)| !child.is_null())
            .map(|(index, child)| (index.to_string(), child))
            .collect(),
        _ => Map::new(),
    }
}

/// Container for `map`: `None` when empty, an array when the keys are `0..n`.
fn from_map(map: Map<String, Value>) -> Option<Value> {
    if map.is_empty() {
        return None;
    }
    let len = map.len();
    let mut slots: Vec<Option<Value>> = vec![None; len];
    let mut dense = true;
    for key in map.keys() {
        match array_index(key) {
            Some(index) if index < len => slots[index] = Some(Value::Null),
            _ => {
                dense = false;
                break;
            }
        }
    }
    if !dense {
        return Some(Value::Object(map));
    }
    for (key, child) in map {
        if let Some(index) = array_index(&key) {
            slots[index] = Some(child);
        }
    }
    Some(Value::Array(slots.into_iter().flatten().collect()))
}
