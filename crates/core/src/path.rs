//! Tree paths
//!
//! A [`TreePath`] addresses a subtree of the document tree as an ordered
//! sequence of non-empty key segments. The canonical text form joins the
//! segments with `/`, without leading or trailing slash; the empty path is
//! the root.
//!
//! Segments are stored verbatim. A key that itself contains `/` stays one
//! segment, and is percent-encoded on its own when sent over the wire, so it
//! can never merge with its neighbours.
//!
//! | Text | Segments |
//! |------|----------|
//! | `` | root |
//! | `users` | `["users"]` |
//! | `/users/42/` | `["users", "42"]` |
//! | `users//42` | rejected (empty segment) |

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::value::LimitError;

/// Maximum path length in segments (256 segments)
pub const MAX_PATH_LENGTH: usize = 256;

/// Error type for path parsing
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PathError {
    /// Empty segment in path (`a//b`)
    #[error("empty segment in path '{path}' at position {position}")]
    EmptySegment {
        /// The offending input
        path: String,
        /// Segment index of the empty segment
        position: usize,
    },

    /// Empty key passed to [`TreePath::child`] validation
    #[error("key must not be empty")]
    EmptyKey,

    /// Path exceeds the segment limit
    #[error(transparent)]
    Limit(#[from] LimitError),
}

/// A path into the document tree
///
/// # Examples
///
/// ```
/// use canopy_core::TreePath;
///
/// let root = TreePath::root();
/// let theme = TreePath::root().child("settings").child("theme");
///
/// let parsed: TreePath = "/settings/theme".parse().unwrap();
/// assert_eq!(parsed, theme);
/// assert_eq!(theme.to_string(), "settings/theme");
///
/// assert!(root.is_ancestor_of(&theme));
/// assert_eq!(theme.parent(), Some(TreePath::root().child("settings")));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub struct TreePath {
    segments: Vec<String>,
}

impl TreePath {
    /// Create the root path (empty path)
    pub fn root() -> Self {
        TreePath {
            segments: Vec::new(),
        }
    }

    /// Create a path from raw segments
    ///
    /// Empty segments are rejected so that every path has one address.
    pub fn from_segments<I, S>(segments: I) -> Result<Self, PathError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();
        if let Some(position) = segments.iter().position(|s| s.is_empty()) {
            return Err(PathError::EmptySegment {
                path: segments.join("/"),
                position,
            });
        }
        let path = TreePath { segments };
        path.validate()?;
        Ok(path)
    }

    /// Parse the canonical text form.
    ///
    /// Leading and trailing slashes are stripped; interior empty segments are
    /// rejected.
    pub fn parse(s: &str) -> Result<Self, PathError> {
        let trimmed = s.trim_matches('/');
        if trimmed.is_empty() {
            return Ok(TreePath::root());
        }
        let segments: Vec<&str> = trimmed.split('/').collect();
        if let Some(position) = segments.iter().position(|seg| seg.is_empty()) {
            return Err(PathError::EmptySegment {
                path: s.to_string(),
                position,
            });
        }
        let path = TreePath {
            segments: segments.into_iter().map(str::to_string).collect(),
        };
        path.validate()?;
        Ok(path)
    }

    /// Get the path segments
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Number of segments (0 for the root)
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Depth of the addressed node; top-level keys are depth 0, root is None
    pub fn depth(&self) -> Option<usize> {
        self.segments.len().checked_sub(1)
    }

    /// Check if this is the root path (empty)
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Check if this is the root path
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Address of a direct child (builder pattern)
    ///
    /// The key is appended verbatim as one segment.
    pub fn child(mut self, key: impl Into<String>) -> Self {
        self.segments.push(key.into());
        self
    }

    /// Push a child segment (mutating)
    pub fn push(&mut self, key: impl Into<String>) {
        self.segments.push(key.into());
    }

    /// Get the parent path (None if root)
    pub fn parent(&self) -> Option<TreePath> {
        if self.segments.is_empty() {
            None
        } else {
            let mut parent = self.clone();
            parent.segments.pop();
            Some(parent)
        }
    }

    /// Last segment, i.e. the node's own key (None if root)
    pub fn last(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// Check if this path is an ancestor of another (or equal)
    ///
    /// The root path is an ancestor of all paths.
    pub fn is_ancestor_of(&self, other: &TreePath) -> bool {
        if self.segments.len() > other.segments.len() {
            return false;
        }
        self.segments
            .iter()
            .zip(other.segments.iter())
            .all(|(a, b)| a == b)
    }

    /// Check if this path is a descendant of another (or equal)
    pub fn is_descendant_of(&self, other: &TreePath) -> bool {
        other.is_ancestor_of(self)
    }

    /// Validate path length limit
    ///
    /// Returns an error if the path exceeds [`MAX_PATH_LENGTH`].
    pub fn validate(&self) -> Result<(), LimitError> {
        let length = self.segments.len();
        if length > MAX_PATH_LENGTH {
            Err(LimitError::PathTooLong {
                length,
                max: MAX_PATH_LENGTH,
            })
        } else {
            Ok(())
        }
    }

    /// Canonical text form (`a/b/c`, empty for root)
    pub fn to_path_string(&self) -> String {
        self.segments.join("/")
    }
}

impl FromStr for TreePath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TreePath::parse(s)
    }
}

impl fmt::Display for TreePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_path_string())
    }
}
