//! Core types for Canopy
//!
//! This crate defines the data model shared by every other crate:
//! - TreeValue: a node of the remote JSON document tree
//! - TreePath: slash-delimited address of a subtree
//! - Path operations: get/set/merge/delete on an in-memory tree
//! - Inference: raw editor text to TreeValue
//! - Action/ActionPlan: the batch mutation schema
//! - TreeView: per-node UI state and the visible-row walk
//! - Limits: MAX_NESTING_DEPTH, MAX_PATH_LENGTH

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod action;
pub mod infer;
pub mod ops;
pub mod path;
pub mod tree;
pub mod value;

pub use action::{Action, ActionError, ActionKind, ActionPlan};
pub use infer::{infer_child_value, infer_edit_value};
pub use ops::{delete_at_path, get_at_path, merge_at_path, set_at_path};
pub use path::{PathError, TreePath, MAX_PATH_LENGTH};
pub use tree::{ChildDraft, NodeUiState, TreeView, VisibleNode, DEFAULT_EXPAND_DEPTH};
pub use value::{LimitError, TreeValue, MAX_NESTING_DEPTH};
