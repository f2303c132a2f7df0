//! Tree view state
//!
//! [`TreeView`] owns the per-node UI state of the console: which containers
//! are expanded, which node is being edited, and which node has a child
//! draft open. State lives in one map keyed by [`TreePath`], so operations
//! like collapse-all or expand-to-depth are plain map edits.
//!
//! Nodes without an entry use the default: containers at depth below
//! `expand_depth` start expanded. Entries equal to the default are pruned.

use std::collections::HashMap;

use crate::path::TreePath;
use crate::value::{TreeValue, MAX_NESTING_DEPTH};

/// Levels expanded by default (depth 0 and 1)
pub const DEFAULT_EXPAND_DEPTH: usize = 2;

/// An unsaved child being composed under a container
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChildDraft {
    /// New key (trimmed at commit time)
    pub key: String,
    /// Raw text for the value, inferred at commit time
    pub raw_value: String,
}

/// UI state of one node
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NodeUiState {
    /// Explicit expand/collapse override; None follows the depth default
    pub expanded: Option<bool>,
    /// Inline editor open
    pub editing: bool,
    /// Child draft open
    pub pending_child: Option<ChildDraft>,
}

impl NodeUiState {
    fn is_default(&self) -> bool {
        self.expanded.is_none() && !self.editing && self.pending_child.is_none()
    }
}

/// One rendered row of the tree
#[derive(Debug, Clone, PartialEq)]
pub struct VisibleNode {
    /// Address of the node
    pub path: TreePath,
    /// Own key; None for a scalar root rendered as a single value line
    pub key: Option<String>,
    /// Row depth (top-level keys are 0)
    pub depth: usize,
    /// Type name of the node's value
    pub kind: &'static str,
    /// Scalar value; None for containers
    pub scalar: Option<TreeValue>,
    /// Number of direct children
    pub child_count: usize,
    /// Object or array
    pub expandable: bool,
    /// Children are rendered below this row
    pub expanded: bool,
    /// Expanded but children were cut off by the depth cap
    pub truncated: bool,
    /// Inline editor open
    pub editing: bool,
    /// Child draft open
    pub drafting_child: bool,
}

/// Arena of per-node UI state
#[derive(Debug, Clone)]
pub struct TreeView {
    states: HashMap<TreePath, NodeUiState>,
    expand_depth: usize,
    max_depth: usize,
}

impl Default for TreeView {
    fn default() -> Self {
        TreeView::new(DEFAULT_EXPAND_DEPTH, MAX_NESTING_DEPTH)
    }
}

impl TreeView {
    /// Create a view with the given default expand depth and render cap
    pub fn new(expand_depth: usize, max_depth: usize) -> Self {
        TreeView {
            states: HashMap::new(),
            expand_depth,
            max_depth: max_depth.max(1),
        }
    }

    /// Default expand depth currently in effect
    pub fn expand_depth(&self) -> usize {
        self.expand_depth
    }

    /// Render depth cap
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// State of a node, if it differs from the default
    pub fn state(&self, path: &TreePath) -> Option<&NodeUiState> {
        self.states.get(path)
    }

    /// Whether the node at `path` is expanded. The root always is.
    pub fn is_expanded(&self, path: &TreePath) -> bool {
        let Some(depth) = path.depth() else {
            return true;
        };
        self.states
            .get(path)
            .and_then(|s| s.expanded)
            .unwrap_or(depth < self.expand_depth)
    }

    /// Flip the expanded state; returns the new state
    pub fn toggle(&mut self, path: &TreePath) -> bool {
        let expanded = !self.is_expanded(path);
        self.update(path, |s| s.expanded = Some(expanded));
        expanded
    }

    /// Expand one node
    pub fn expand(&mut self, path: &TreePath) {
        self.update(path, |s| s.expanded = Some(true));
    }

    /// Collapse one node
    pub fn collapse(&mut self, path: &TreePath) {
        self.update(path, |s| s.expanded = Some(false));
    }

    /// Expand every level below `depth`, dropping per-node overrides
    pub fn expand_to_depth(&mut self, depth: usize) {
        self.expand_depth = depth;
        self.clear_overrides();
    }

    /// Collapse everything
    pub fn collapse_all(&mut self) {
        self.expand_to_depth(0);
    }

    /// Expand everything (still bounded by the render cap)
    pub fn expand_all(&mut self) {
        self.expand_to_depth(usize::MAX);
    }

    /// Open the inline editor on a node
    pub fn begin_edit(&mut self, path: &TreePath) {
        self.update(path, |s| s.editing = true);
    }

    /// Close the inline editor
    pub fn cancel_edit(&mut self, path: &TreePath) {
        self.update(path, |s| s.editing = false);
    }

    /// Whether the inline editor is open on a node
    pub fn is_editing(&self, path: &TreePath) -> bool {
        self.states.get(path).is_some_and(|s| s.editing)
    }

    /// Open an empty child draft; the container is expanded so the new
    /// child shows up under it.
    pub fn begin_child(&mut self, path: &TreePath) {
        self.update(path, |s| {
            s.pending_child = Some(ChildDraft::default());
            s.expanded = Some(true);
        });
    }

    /// Replace the text of an open child draft
    pub fn set_child_draft(&mut self, path: &TreePath, draft: ChildDraft) {
        self.update(path, |s| s.pending_child = Some(draft));
    }

    /// Current child draft
    pub fn child_draft(&self, path: &TreePath) -> Option<&ChildDraft> {
        self.states.get(path).and_then(|s| s.pending_child.as_ref())
    }

    /// Discard the child draft
    pub fn cancel_child(&mut self, path: &TreePath) {
        self.update(path, |s| s.pending_child = None);
    }

    /// Drop all state at or under `path` (the subtree is gone)
    pub fn forget_subtree(&mut self, path: &TreePath) {
        self.states.retain(|p, _| !path.is_ancestor_of(p));
    }

    /// Drop all state and restore the default expand depth
    pub fn reset(&mut self) {
        self.states.clear();
        self.expand_depth = DEFAULT_EXPAND_DEPTH;
    }

    /// Rows to render for `root`, in display order.
    ///
    /// Walks with an explicit stack. Rows are never produced at depth
    /// `max_depth` or beyond; an expanded node whose children would cross
    /// the cap is marked truncated instead.
    pub fn visible_nodes(&self, root: &TreeValue) -> Vec<VisibleNode> {
        let root_path = TreePath::root();
        if !root.is_container() {
            return vec![VisibleNode {
                path: root_path.clone(),
                key: None,
                depth: 0,
                kind: root.kind_name(),
                scalar: Some(root.clone()),
                child_count: 0,
                expandable: false,
                expanded: false,
                truncated: false,
                editing: self.is_editing(&root_path),
                drafting_child: false,
            }];
        }

        let mut rows = Vec::new();
        let mut stack: Vec<(TreePath, &TreeValue)> = Vec::new();
        push_children(&mut stack, &root_path, root);

        while let Some((path, value)) = stack.pop() {
            let depth = path.len() - 1;
            let expandable = value.is_container();
            let expanded = expandable && self.is_expanded(&path);
            let truncated = expanded && value.child_count() > 0 && depth + 1 >= self.max_depth;

            if expanded && !truncated {
                push_children(&mut stack, &path, value);
            }

            let state = self.states.get(&path);
            rows.push(VisibleNode {
                key: path.last().map(str::to_string),
                depth,
                kind: value.kind_name(),
                scalar: (!expandable).then(|| value.clone()),
                child_count: value.child_count(),
                expandable,
                expanded,
                truncated,
                editing: state.is_some_and(|s| s.editing),
                drafting_child: state.is_some_and(|s| s.pending_child.is_some()),
                path,
            });
        }
        rows
    }

    fn update(&mut self, path: &TreePath, f: impl FnOnce(&mut NodeUiState)) {
        let state = self.states.entry(path.clone()).or_default();
        f(state);
        if state.is_default() {
            self.states.remove(path);
        }
    }

    fn clear_overrides(&mut self) {
        self.states.retain(|_, s| {
            s.expanded = None;
            !s.is_default()
        });
    }
}

/// Push children in reverse so they pop in document order.
fn push_children<'a>(stack: &mut Vec<(TreePath, &'a TreeValue)>, parent: &TreePath, value: &'a TreeValue) {
    match value.as_inner() {
        serde_json::Value::Object(obj) => {
            for (key, child) in obj.iter().rev() {
                stack.push((parent.clone().child(key.as_str()), TreeValue::wrap_ref(child)));
            }
        }
        serde_json::Value::Array(arr) => {
            for (index, child) in arr.iter().enumerate().rev() {
                stack.push((parent.clone().child(index.to_string()), TreeValue::wrap_ref(child)));
            }
        }
        _ => {}
    }
}
