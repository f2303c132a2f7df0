//! In-memory tree store
//!
//! Applies the same Replace/Merge/Remove semantics as the remote store to a
//! local tree. Used for offline sessions and tests.

use parking_lot::Mutex;

use canopy_core::{delete_at_path, get_at_path, merge_at_path, set_at_path, TreePath, TreeValue};

use crate::client::{shallow_of, TreeStore};
use crate::connection::MEMORY_LOCATION;
use crate::error::{display_path, StoreError};

#[derive(Debug, Default)]
struct Inner {
    root: TreeValue,
    denied: Vec<TreePath>,
}

/// A tree store held in process memory
///
/// Mirrors the remote store's behaviour: writing `null` removes the key, and
/// containers left empty by a mutation disappear.
///
/// # Example
///
/// ```
/// use canopy_core::{TreePath, TreeValue};
/// use canopy_store::{MemoryStore, TreeStore};
///
/// let store = MemoryStore::new();
/// let path: TreePath = "settings/theme".parse().unwrap();
/// store.write(&path, &TreeValue::from("dark")).unwrap();
/// assert_eq!(store.read(&path).unwrap(), TreeValue::from("dark"));
/// ```
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding `root`
    pub fn with_data(root: TreeValue) -> Self {
        MemoryStore {
            inner: Mutex::new(Inner {
                root,
                denied: Vec::new(),
            }),
        }
    }

    /// Refuse every mutation at or under `path`, like a store security rule
    pub fn deny_writes_under(&self, path: TreePath) {
        self.inner.lock().denied.push(path);
    }

    /// Drop all deny rules
    pub fn allow_all(&self) {
        self.inner.lock().denied.clear();
    }

    /// Copy of the whole tree
    pub fn snapshot(&self) -> TreeValue {
        self.inner.lock().root.clone()
    }

    fn mutate(
        &self,
        path: &TreePath,
        f: impl FnOnce(&mut TreeValue),
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.lock();
        if inner.denied.iter().any(|d| d.is_ancestor_of(path)) {
            tracing::debug!(target: "canopy::store", path = %path, "memory store denied write");
            return Err(StoreError::PermissionDenied {
                path: display_path(path),
            });
        }
        f(&mut inner.root);
        Ok(())
    }
}

impl TreeStore for MemoryStore {
    fn read(&self, path: &TreePath) -> Result<TreeValue, StoreError> {
        let inner = self.inner.lock();
        Ok(get_at_path(&inner.root, path).cloned().unwrap_or_default())
    }

    fn read_shallow(&self, path: &TreePath) -> Result<TreeValue, StoreError> {
        let inner = self.inner.lock();
        Ok(get_at_path(&inner.root, path)
            .map(shallow_of)
            .unwrap_or_default())
    }

    fn write(&self, path: &TreePath, value: &TreeValue) -> Result<(), StoreError> {
        let value = value.clone();
        self.mutate(path, |root| set_at_path(root, path, value))
    }

    fn merge(&self, path: &TreePath, value: &TreeValue) -> Result<(), StoreError> {
        let value = value.clone();
        self.mutate(path, |root| merge_at_path(root, path, value))
    }

    fn remove(&self, path: &TreePath) -> Result<(), StoreError> {
        self.mutate(path, |root| {
            delete_at_path(root, path);
        })
    }

    fn probe(&self) -> Result<(), StoreError> {
        Ok(())
    }

    fn location(&self) -> String {
        MEMORY_LOCATION.to_string()
    }
}
