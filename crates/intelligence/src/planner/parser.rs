//! Output parser for plan generation responses
//!
//! The model's text is untrusted. Parsing is strict about everything that
//! could change what gets executed (action types, paths, payloads) and
//! lenient only about a missing or malformed action list, which becomes an
//! empty plan.

use canopy_core::{Action, ActionKind, ActionPlan, TreeValue};

use super::PlanError;

/// Parse model output into a validated plan.
///
/// - A surrounding markdown code fence is removed first
/// - The remainder must be a JSON object with a string `message`
/// - `actions` that is missing or not a list yields an empty plan
/// - Each action needs a known `type`, a string `path`, and `data` for
///   SET/UPDATE (null is allowed); any violation rejects the whole plan
pub fn parse_plan_response(text: &str) -> Result<ActionPlan, PlanError> {
    let body = strip_code_fence(text);
    let json: serde_json::Value = serde_json::from_str(body)
        .map_err(|e| PlanError::InvalidResponse(format!("response is not JSON: {}", e)))?;

    let obj = json
        .as_object()
        .ok_or_else(|| PlanError::InvalidResponse("response is not a JSON object".to_string()))?;

    let message = obj
        .get("message")
        .and_then(|m| m.as_str())
        .ok_or_else(|| PlanError::InvalidResponse("'message' must be a string".to_string()))?
        .to_string();

    let items: &[serde_json::Value] = match obj.get("actions") {
        Some(serde_json::Value::Array(items)) => items.as_slice(),
        other => {
            tracing::warn!(
                target: "canopy::plan",
                found = other.map(kind_of).unwrap_or("nothing"),
                "'actions' is not a list, treating plan as empty"
            );
            &[]
        }
    };

    let actions = items
        .iter()
        .enumerate()
        .map(|(index, item)| parse_action(index, item))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ActionPlan::new(message, actions))
}

fn parse_action(index: usize, item: &serde_json::Value) -> Result<Action, PlanError> {
    let invalid = |reason: String| PlanError::InvalidResponse(format!("action {}: {}", index, reason));

    let obj = item
        .as_object()
        .ok_or_else(|| invalid("not an object".to_string()))?;

    let kind: ActionKind = obj
        .get("type")
        .and_then(|t| t.as_str())
        .ok_or_else(|| invalid("'type' must be a string".to_string()))?
        .parse()
        .map_err(|e| invalid(format!("{}", e)))?;

    let path = obj
        .get("path")
        .and_then(|p| p.as_str())
        .ok_or_else(|| invalid("'path' must be a string".to_string()))?;

    let payload = obj.get("data").cloned().map(TreeValue::from_value);

    Action::from_raw(kind, path, payload).map_err(|e| invalid(e.to_string()))
}

/// Remove a surrounding ```` ``` ```` or ```` ```json ```` fence, if any.
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string (e.g. "json"), which may run straight into the body
    let rest = match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        None => rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric()),
    };
    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}

fn kind_of(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
