//! Raw text → TreeValue inference for the node editor.
//!
//! Inline edits apply these rules in order:
//! 1. `true` / `false` → boolean
//! 2. `null` → null
//! 3. A finite number → number (integers stay integers)
//! 4. Anything that parses as JSON → the parsed value
//! 5. Everything else → the raw string
//!
//! Child insertion first tries a JSON parse when the text starts with `{` or
//! `[`, then falls through to the same rules. Inference never fails: text
//! that matches nothing is kept verbatim as a string.

use crate::value::TreeValue;

/// Infer the value for an inline edit of an existing node.
///
/// ```
/// use canopy_core::infer_edit_value;
/// use serde_json::json;
///
/// assert_eq!(infer_edit_value("true").into_inner(), json!(true));
/// assert_eq!(infer_edit_value("42").into_inner(), json!(42));
/// assert_eq!(infer_edit_value("{\"x\":1}").into_inner(), json!({"x": 1}));
/// assert_eq!(infer_edit_value("hello").into_inner(), json!("hello"));
/// ```
pub fn infer_edit_value(raw: &str) -> TreeValue {
    match raw {
        "true" => return TreeValue::from(true),
        "false" => return TreeValue::from(false),
        "null" => return TreeValue::null(),
        _ => {}
    }

    if let Some(number) = parse_number(raw) {
        return number;
    }

    match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(json) => TreeValue::from_value(json),
        Err(_) => TreeValue::from(raw),
    }
}

/// Infer the value for a new child node.
///
/// Same rules as [`infer_edit_value`], except that text opening a JSON
/// structure is parsed as JSON before anything else.
pub fn infer_child_value(raw: &str) -> TreeValue {
    let trimmed = raw.trim_start();
    if trimmed.starts_with('{') || trimmed.starts_with('[') {
        return match serde_json::from_str::<serde_json::Value>(raw) {
            Ok(json) => TreeValue::from_value(json),
            Err(_) => TreeValue::from(raw),
        };
    }
    infer_edit_value(raw)
}

/// Parse a finite number; integers keep integer form.
fn parse_number(raw: &str) -> Option<TreeValue> {
    let s = raw.trim();
    if !looks_numeric(s) {
        return None;
    }
    if let Ok(i) = s.parse::<i64>() {
        return Some(TreeValue::from(i));
    }
    if let Ok(u) = s.parse::<u64>() {
        return Some(TreeValue::from(u));
    }
    match s.parse::<f64>() {
        Ok(f) if f.is_finite() => Some(TreeValue::from(f)),
        _ => None,
    }
}

/// Digits with optional sign, dot and exponent. Rejects `inf`/`NaN`, which
/// `f64::from_str` would otherwise accept.
fn looks_numeric(s: &str) -> bool {
    let body = s.strip_prefix(['-', '+']).unwrap_or(s);
    if body.is_empty() || !body.bytes().any(|b| b.is_ascii_digit()) {
        return false;
    }
    body.bytes().all(|b| {
        b.is_ascii_digit() || b == b'.' || b == b'e' || b == b'E' || b == b'+' || b == b'-'
    })
}
