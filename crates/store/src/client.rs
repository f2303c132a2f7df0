//! The store client trait

use std::sync::Arc;

use canopy_core::{TreePath, TreeValue};

use crate::error::StoreError;

/// Path-addressed access to a document tree
///
/// All methods take `&self` and are blocking. Implementations are
/// `Send + Sync` so a store can sit behind `Box<dyn TreeStore>` or `Arc`.
///
/// # Implementations
///
/// - `RestStore`: the remote store over HTTPS
/// - `MemoryStore`: an in-process tree with the same semantics
pub trait TreeStore: Send + Sync {
    /// Value at `path`; null when nothing is stored there
    fn read(&self, path: &TreePath) -> Result<TreeValue, StoreError>;

    /// Direct children of `path`, with containers replaced by `true`
    fn read_shallow(&self, path: &TreePath) -> Result<TreeValue, StoreError>;

    /// Replace: overwrite the subtree at `path`, erasing absent children
    fn write(&self, path: &TreePath, value: &TreeValue) -> Result<(), StoreError>;

    /// Merge: replace each top-level key of `value` under `path`
    fn merge(&self, path: &TreePath, value: &TreeValue) -> Result<(), StoreError>;

    /// Remove the subtree at `path`
    fn remove(&self, path: &TreePath) -> Result<(), StoreError>;

    /// Cheap reachability and authorization check
    fn probe(&self) -> Result<(), StoreError>;

    /// Human-readable location of the store
    fn location(&self) -> String;
}

impl<T: TreeStore + ?Sized> TreeStore for Arc<T> {
    fn read(&self, path: &TreePath) -> Result<TreeValue, StoreError> {
        (**self).read(path)
    }

    fn read_shallow(&self, path: &TreePath) -> Result<TreeValue, StoreError> {
        (**self).read_shallow(path)
    }

    fn write(&self, path: &TreePath, value: &TreeValue) -> Result<(), StoreError> {
        (**self).write(path, value)
    }

    fn merge(&self, path: &TreePath, value: &TreeValue) -> Result<(), StoreError> {
        (**self).merge(path, value)
    }

    fn remove(&self, path: &TreePath) -> Result<(), StoreError> {
        (**self).remove(path)
    }

    fn probe(&self) -> Result<(), StoreError> {
        (**self).probe()
    }

    fn location(&self) -> String {
        (**self).location()
    }
}

/// Shallow view of a value: containers become `true`, scalars stay.
pub fn shallow_of(value: &TreeValue) -> TreeValue {
    let placeholder = |v: &serde_json::Value| {
        if v.is_object() || v.is_array() {
            serde_json::Value::Bool(true)
        } else {
            v.clone()
        }
    };
    match value.as_inner() {
        serde_json::Value::Object(obj) => TreeValue::from_value(serde_json::Value::Object(
            obj.iter().map(|(k, v)| (k.clone(), placeholder(v))).collect(),
        )),
        serde_json::Value::Array(arr) => TreeValue::from_value(serde_json::Value::Object(
            arr.iter()
                .enumerate()
                .map(|(i, v)| (i.to_string(), placeholder(v)))
                .collect(),
        )),
        other => TreeValue::from_value(other.clone()),
    }
}
