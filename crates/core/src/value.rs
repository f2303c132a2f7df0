//! Tree value type
//!
//! A [`TreeValue`] is a node of the remote document tree: null, boolean,
//! number, string, ordered-key object, or array, nested to any depth.
//!
//! # Limits
//!
//! | Limit | Value | Constant |
//! |-------|-------|----------|
//! | Max nesting depth | 100 levels | [`MAX_NESTING_DEPTH`] |
//!
//! Stores accept deeper documents; the limit bounds how far the console
//! walks a tree when rendering or validating a payload.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::str::FromStr;
use thiserror::Error;

/// Maximum nesting depth the console walks (100 levels)
pub const MAX_NESTING_DEPTH: usize = 100;

/// Error type for value limit violations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LimitError {
    /// Value nesting exceeds maximum depth
    #[error("value nesting depth {depth} exceeds maximum of {max} levels")]
    NestingTooDeep {
        /// Actual nesting depth
        depth: usize,
        /// Maximum allowed depth
        max: usize,
    },

    /// Path exceeds maximum length
    #[error("path length {length} exceeds maximum of {max} segments")]
    PathTooLong {
        /// Actual path length
        length: usize,
        /// Maximum allowed length
        max: usize,
    },
}

/// A value in the document tree
///
/// Newtype around `serde_json::Value` (built with `preserve_order`, so
/// object keys keep the order the store returned them in).
///
/// # Examples
///
/// ```
/// use canopy_core::TreeValue;
///
/// let obj = TreeValue::object();
/// let s = TreeValue::from("hello");
/// let n = TreeValue::from(42i64);
///
/// assert!(obj.is_container());
/// assert!(!s.is_container());
/// assert_eq!(n.as_i64(), Some(42));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct TreeValue(serde_json::Value);

impl TreeValue {
    /// Create a null value
    pub fn null() -> Self {
        TreeValue(serde_json::Value::Null)
    }

    /// Create an empty object
    pub fn object() -> Self {
        TreeValue(serde_json::Value::Object(serde_json::Map::new()))
    }

    /// Create an empty array
    pub fn array() -> Self {
        TreeValue(serde_json::Value::Array(Vec::new()))
    }

    /// Create from a serde_json::Value
    pub fn from_value(value: serde_json::Value) -> Self {
        TreeValue(value)
    }

    /// Get the underlying serde_json::Value
    pub fn into_inner(self) -> serde_json::Value {
        self.0
    }

    /// Get a reference to the underlying serde_json::Value
    pub fn as_inner(&self) -> &serde_json::Value {
        &self.0
    }

    /// Get a mutable reference to the underlying serde_json::Value
    pub fn as_inner_mut(&mut self) -> &mut serde_json::Value {
        &mut self.0
    }

    /// Serialize to compact JSON string
    pub fn to_json_string(&self) -> String {
        self.0.to_string()
    }

    /// Serialize to pretty JSON string
    pub fn to_json_string_pretty(&self) -> String {
        serde_json::to_string_pretty(&self.0).unwrap_or_else(|_| self.to_json_string())
    }

    /// Objects and arrays are containers; only containers can be expanded.
    pub fn is_container(&self) -> bool {
        self.0.is_object() || self.0.is_array()
    }

    /// Number of direct children (0 for scalars)
    pub fn child_count(&self) -> usize {
        match &self.0 {
            serde_json::Value::Object(obj) => obj.len(),
            serde_json::Value::Array(arr) => arr.len(),
            _ => 0,
        }
    }

    /// Keys of the direct children, in order.
    ///
    /// Array elements are addressed by their decimal index.
    pub fn child_keys(&self) -> Vec<String> {
        match &self.0 {
            serde_json::Value::Object(obj) => obj.keys().cloned().collect(),
            serde_json::Value::Array(arr) => (0..arr.len()).map(|i| i.to_string()).collect(),
            _ => Vec::new(),
        }
    }

    /// Direct child by key (array elements by decimal index)
    pub fn child(&self, key: &str) -> Option<&TreeValue> {
        child_of(&self.0, key).map(TreeValue::wrap_ref)
    }

    /// Short type name used in listings and error messages
    pub fn kind_name(&self) -> &'static str {
        value_type_name(&self.0)
    }

    /// Calculate the maximum nesting depth of this value
    ///
    /// Returns 0 for scalars and counts nested objects/arrays.
    pub fn nesting_depth(&self) -> usize {
        fn depth_of(value: &serde_json::Value) -> usize {
            match value {
                serde_json::Value::Null
                | serde_json::Value::Bool(_)
                | serde_json::Value::Number(_)
                | serde_json::Value::String(_) => 0,
                serde_json::Value::Array(arr) => 1 + arr.iter().map(depth_of).max().unwrap_or(0),
                serde_json::Value::Object(obj) => 1 + obj.values().map(depth_of).max().unwrap_or(0),
            }
        }
        depth_of(&self.0)
    }

    /// Validate the nesting depth limit
    ///
    /// Returns an error if the value exceeds [`MAX_NESTING_DEPTH`].
    pub fn validate_depth(&self) -> Result<(), LimitError> {
        let depth = self.nesting_depth();
        if depth > MAX_NESTING_DEPTH {
            Err(LimitError::NestingTooDeep {
                depth,
                max: MAX_NESTING_DEPTH,
            })
        } else {
            Ok(())
        }
    }

    pub(crate) fn wrap_ref(value: &serde_json::Value) -> &TreeValue {
        // SAFETY: TreeValue is #[repr(transparent)] over serde_json::Value, so
        // the layouts are identical and the lifetime is carried through.
        unsafe { &*(value as *const serde_json::Value as *const TreeValue) }
    }
}

pub(crate) fn child_of<'a>(value: &'a serde_json::Value, key: &str) -> Option<&'a serde_json::Value> {
    match value {
        serde_json::Value::Object(obj) => obj.get(key),
        serde_json::Value::Array(arr) => array_index(key).and_then(|i| arr.get(i)),
        _ => None,
    }
}

/// Array index named by `key`: decimal digits with no leading zero.
pub(crate) fn array_index(key: &str) -> Option<usize> {
    if key.len() > 1 && key.starts_with('0') {
        return None;
    }
    key.parse::<usize>().ok()
}

/// Helper to get type name for error messages
pub(crate) fn value_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

impl FromStr for TreeValue {
    type Err = serde_json::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        serde_json::from_str(s).map(TreeValue)
    }
}

impl Deref for TreeValue {
    type Target = serde_json::Value;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for TreeValue {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl fmt::Display for TreeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Default for TreeValue {
    fn default() -> Self {
        TreeValue::null()
    }
}

impl From<serde_json::Value> for TreeValue {
    fn from(value: serde_json::Value) -> Self {
        TreeValue(value)
    }
}

impl From<TreeValue> for serde_json::Value {
    fn from(value: TreeValue) -> Self {
        value.0
    }
}

impl From<bool> for TreeValue {
    fn from(b: bool) -> Self {
        TreeValue(serde_json::Value::Bool(b))
    }
}

impl From<i64> for TreeValue {
    fn from(n: i64) -> Self {
        TreeValue(serde_json::Value::from(n))
    }
}

impl From<u64> for TreeValue {
    fn from(n: u64) -> Self {
        TreeValue(serde_json::Value::from(n))
    }
}

impl From<f64> for TreeValue {
    /// Non-finite floats have no JSON representation and become null.
    fn from(n: f64) -> Self {
        TreeValue(serde_json::Value::from(n))
    }
}

impl From<&str> for TreeValue {
    fn from(s: &str) -> Self {
        TreeValue(serde_json::Value::String(s.to_string()))
    }
}

impl From<String> for TreeValue {
    fn from(s: String) -> Self {
        TreeValue(serde_json::Value::String(s))
    }
}
