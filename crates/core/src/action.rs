//! Action plan schema
//!
//! An [`ActionPlan`] is an ordered batch of [`Action`]s paired with an
//! explanatory message. Each action is one of the three store mutations:
//!
//! | Kind | Wire name | Payload |
//! |------|-----------|---------|
//! | [`ActionKind::Replace`] | `SET` | required |
//! | [`ActionKind::Merge`] | `UPDATE` | required |
//! | [`ActionKind::Remove`] | `DELETE` | none |
//!
//! Constructors enforce the payload rule, so a well-typed `Action` is always
//! executable. Unknown wire names are rejected rather than defaulted.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::path::{PathError, TreePath};
use crate::value::TreeValue;

/// Errors raised while building actions from untrusted input
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ActionError {
    /// Wire name is not SET, UPDATE or DELETE
    #[error("unknown action type '{0}'")]
    UnknownKind(String),

    /// SET/UPDATE without a payload
    #[error("{kind} action at '{path}' requires a payload")]
    MissingPayload {
        /// The action kind
        kind: ActionKind,
        /// Target path
        path: String,
    },

    /// Path text did not parse
    #[error("invalid action path: {0}")]
    InvalidPath(#[from] PathError),

    /// Path still starts with `/` after the leading one was stripped
    #[error("invalid action path '{0}': more than one leading '/'")]
    ExtraLeadingSlash(String),

    /// DELETE addressed the whole tree
    #[error("refusing to delete the root")]
    RootRemove,
}

/// The three mutation kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionKind {
    /// Full overwrite of the subtree
    #[serde(rename = "SET")]
    Replace,
    /// Partial key merge into the subtree
    #[serde(rename = "UPDATE")]
    Merge,
    /// Deletion of the subtree
    #[serde(rename = "DELETE")]
    Remove,
}

impl ActionKind {
    /// Wire name used by plan generators
    pub fn wire_name(&self) -> &'static str {
        match self {
            ActionKind::Replace => "SET",
            ActionKind::Merge => "UPDATE",
            ActionKind::Remove => "DELETE",
        }
    }

    /// Whether this kind carries a payload
    pub fn needs_payload(&self) -> bool {
        !matches!(self, ActionKind::Remove)
    }
}

impl FromStr for ActionKind {
    type Err = ActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SET" => Ok(ActionKind::Replace),
            "UPDATE" => Ok(ActionKind::Merge),
            "DELETE" => Ok(ActionKind::Remove),
            other => Err(ActionError::UnknownKind(other.to_string())),
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

/// One mutation against the tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    kind: ActionKind,
    path: TreePath,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    payload: Option<TreeValue>,
}

impl Action {
    /// Replace the subtree at `path` with `value`
    pub fn replace(path: TreePath, value: TreeValue) -> Self {
        Action {
            kind: ActionKind::Replace,
            path,
            payload: Some(value),
        }
    }

    /// Merge the top-level keys of `value` into the subtree at `path`
    pub fn merge(path: TreePath, value: TreeValue) -> Self {
        Action {
            kind: ActionKind::Merge,
            path,
            payload: Some(value),
        }
    }

    /// Remove the subtree at `path`
    pub fn remove(path: TreePath) -> Self {
        Action {
            kind: ActionKind::Remove,
            path,
            payload: None,
        }
    }

    /// Build an action from generator output.
    ///
    /// Exactly one leading `/` is stripped from `raw_path` before parsing;
    /// a second one is an error. A payload given for `Remove` is dropped, and
    /// removing the root is refused.
    pub fn from_raw(
        kind: ActionKind,
        raw_path: &str,
        payload: Option<TreeValue>,
    ) -> Result<Self, ActionError> {
        let stripped = raw_path.strip_prefix('/').unwrap_or(raw_path);
        if stripped.starts_with('/') {
            return Err(ActionError::ExtraLeadingSlash(raw_path.to_string()));
        }
        let path = TreePath::parse(stripped)?;
        match (kind, payload) {
            (ActionKind::Remove, _) if path.is_root() => Err(ActionError::RootRemove),
            (ActionKind::Remove, _) => Ok(Action::remove(path)),
            (ActionKind::Replace, Some(value)) => Ok(Action::replace(path, value)),
            (ActionKind::Merge, Some(value)) => Ok(Action::merge(path, value)),
            (kind, None) => Err(ActionError::MissingPayload {
                kind,
                path: path.to_path_string(),
            }),
        }
    }

    /// The mutation kind
    pub fn kind(&self) -> ActionKind {
        self.kind
    }

    /// Target path
    pub fn path(&self) -> &TreePath {
        &self.path
    }

    /// Payload (None for Remove)
    pub fn payload(&self) -> Option<&TreeValue> {
        self.payload.as_ref()
    }

    /// Split into parts, consuming the action
    pub fn into_parts(self) -> (ActionKind, TreePath, Option<TreeValue>) {
        (self.kind, self.path, self.payload)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = if self.path.is_root() {
            "/".to_string()
        } else {
            self.path.to_path_string()
        };
        match &self.payload {
            Some(value) => write!(f, "{} {} = {}", self.kind, path, value),
            None => write!(f, "{} {}", self.kind, path),
        }
    }
}

/// An ordered batch of actions with an explanatory message
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ActionPlan {
    /// Conversational explanation from the generator
    pub message: String,
    /// Actions, executed strictly in this order
    pub actions: Vec<Action>,
}

impl ActionPlan {
    /// Create a plan
    pub fn new(message: impl Into<String>, actions: Vec<Action>) -> Self {
        ActionPlan {
            message: message.into(),
            actions,
        }
    }

    /// Number of actions
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// True when the plan has nothing to execute
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}
