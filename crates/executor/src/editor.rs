//! Node editor flows
//!
//! Inline edit, child insertion, and two-step subtree deletion on top of a
//! connected [`Console`]. Each flow ends in exactly one store mutation
//! followed by a root refresh.

use canopy_core::{infer_child_value, infer_edit_value, ChildDraft, TreePath, TreeValue};
use canopy_store::display_path;

use crate::{Command, Console, Error, Result};

/// A deletion waiting for confirmation.
///
/// Only [`Console::request_delete`] creates one, and only
/// [`Console::confirm_delete`] consumes it, so a subtree cannot be removed
/// without passing through the confirmation step.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "a pending delete does nothing until confirmed"]
pub struct PendingDelete {
    path: TreePath,
}

impl PendingDelete {
    /// Path that will be removed
    pub fn path(&self) -> &TreePath {
        &self.path
    }
}

impl Console {
    /// Open the inline editor on a node
    pub fn begin_edit(&mut self, path: &TreePath) -> Result<()> {
        self.executor()?;
        self.view_mut().begin_edit(path);
        Ok(())
    }

    /// Close the inline editor without writing
    pub fn cancel_edit(&mut self, path: &TreePath) {
        self.view_mut().cancel_edit(path);
    }

    /// Write the value inferred from `raw` at `path` (Replace).
    ///
    /// Returns the value that was written. The editor stays open if the
    /// write fails.
    pub fn commit_edit(&mut self, path: &TreePath, raw: &str) -> Result<TreeValue> {
        let value = infer_edit_value(raw);
        self.mutate(Command::Write {
            path: path.clone(),
            value: value.clone(),
        })?;
        self.view_mut().cancel_edit(path);
        if value.is_null() {
            self.forget_if_gone(path);
        }
        Ok(value)
    }

    /// Open a child draft under `path`
    pub fn begin_child(&mut self, path: &TreePath) -> Result<()> {
        self.executor()?;
        self.check_can_hold_children(path)?;
        self.view_mut().begin_child(path);
        Ok(())
    }

    /// Discard the child draft under `path`
    pub fn cancel_child(&mut self, path: &TreePath) {
        self.view_mut().cancel_child(path);
    }

    /// Write a new child `key` under `path` with the value inferred from
    /// `raw` (Replace at `path/key`).
    ///
    /// Returns the new child's path.
    pub fn commit_child(&mut self, path: &TreePath, key: &str, raw: &str) -> Result<TreePath> {
        let key = key.trim();
        if key.is_empty() {
            return Err(Error::invalid_input("child key must not be empty"));
        }
        self.check_can_hold_children(path)?;

        let child = path.clone().child(key);
        child.validate().map_err(|e| Error::InvalidPath {
            reason: e.to_string(),
        })?;

        self.view_mut().set_child_draft(
            path,
            ChildDraft {
                key: key.to_string(),
                raw_value: raw.to_string(),
            },
        );
        self.mutate(Command::Write {
            path: child.clone(),
            value: infer_child_value(raw),
        })?;
        self.view_mut().cancel_child(path);
        Ok(child)
    }

    /// First step of a deletion. The root cannot be deleted.
    pub fn request_delete(&self, path: &TreePath) -> Result<PendingDelete> {
        self.executor()?;
        if path.is_root() {
            return Err(Error::invalid_input("refusing to delete the root"));
        }
        Ok(PendingDelete { path: path.clone() })
    }

    /// Second step of a deletion: remove the subtree (Remove).
    pub fn confirm_delete(&mut self, pending: PendingDelete) -> Result<()> {
        let PendingDelete { path } = pending;
        self.mutate(Command::Remove { path: path.clone() })?;
        self.view_mut().forget_subtree(&path);
        tracing::info!(target: "canopy::console", path = %display_path(&path), "subtree removed");
        Ok(())
    }

    /// Children can go under containers, empty nodes, and the root.
    fn check_can_hold_children(&self, path: &TreePath) -> Result<()> {
        if path.is_root() {
            return Ok(());
        }
        match canopy_core::get_at_path(self.snapshot(), path) {
            Some(value) if !value.is_container() && !value.is_null() => Err(Error::invalid_input(format!(
                "cannot add a child under {} value at {}",
                value.kind_name(),
                display_path(path)
            ))),
            _ => Ok(()),
        }
    }
}
