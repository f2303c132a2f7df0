//! Command enum defining all store operations.
//!
//! Commands are the instruction set of the console. Every request that
//! reaches a store, whether typed by the user, issued by the node editor, or
//! produced by an action plan, is one variant of this enum.
//!
//! Commands are:
//! - **Self-contained**: All parameters needed for execution are in the variant
//! - **Serializable**: Can be converted to/from JSON
//! - **Pure data**: No closures or executable code

use serde::{Deserialize, Serialize};

use canopy_core::{Action, ActionKind, TreePath, TreeValue};

/// A command is a self-contained, serializable operation.
///
/// | Command | Returns |
/// |---------|---------|
/// | `Read` | `Output::Value` |
/// | `Keys` | `Output::Keys` |
/// | `Write` | `Output::Unit` |
/// | `Merge` | `Output::Unit` |
/// | `Remove` | `Output::Unit` |
/// | `Probe` | `Output::Connected` |
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub enum Command {
    /// Read the subtree at a path.
    Read {
        /// Subtree to read
        path: TreePath,
    },

    /// List the keys directly under a path (shallow read).
    Keys {
        /// Node whose children are listed
        path: TreePath,
    },

    /// Replace the subtree at a path.
    Write {
        /// Subtree to overwrite
        path: TreePath,
        /// New content; null removes
        value: TreeValue,
    },

    /// Merge top-level keys into the subtree at a path.
    Merge {
        /// Subtree to merge into
        path: TreePath,
        /// Keys to replace; null members remove
        value: TreeValue,
    },

    /// Remove the subtree at a path.
    Remove {
        /// Subtree to remove
        path: TreePath,
    },

    /// Check that the store is reachable and readable.
    Probe,
}

impl Command {
    /// Human-readable command name for logs
    pub fn name(&self) -> &'static str {
        match self {
            Command::Read { .. } => "read",
            Command::Keys { .. } => "keys",
            Command::Write { .. } => "write",
            Command::Merge { .. } => "merge",
            Command::Remove { .. } => "remove",
            Command::Probe => "probe",
        }
    }

    /// Whether this command changes the tree
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            Command::Write { .. } | Command::Merge { .. } | Command::Remove { .. }
        )
    }
}

impl From<Action> for Command {
    /// Remove becomes `Remove`, Replace becomes `Write`, Merge becomes `Merge`.
    fn from(action: Action) -> Self {
        let (kind, path, payload) = action.into_parts();
        match kind {
            ActionKind::Remove => Command::Remove { path },
            ActionKind::Replace => Command::Write {
                path,
                value: payload.unwrap_or_default(),
            },
            ActionKind::Merge => Command::Merge {
                path,
                value: payload.unwrap_or_default(),
            },
        }
    }
}
