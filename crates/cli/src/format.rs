//! Output → human/json/raw string formatting.
//!
//! Three modes:
//! - **Human** (default on TTY): e.g. `"dark"`, `1) "users"`, `(nil)`
//! - **JSON** (`--json`): `serde_json::to_string_pretty`
//! - **Raw** (`--raw`): Bare values, no quotes, no decoration

use serde_json::json;

use canopy_core::{ActionPlan, TreeValue, VisibleNode};
use canopy_executor::{Error, Output, PlanReport};
use canopy_store::Connection;

/// Output formatting mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Human,
    Json,
    Raw,
}

/// Format a successful output.
pub fn format_output(output: &Output, mode: OutputMode) -> String {
    match mode {
        OutputMode::Json => pretty(&json!(output)),
        OutputMode::Raw => format_raw(output),
        OutputMode::Human => format_human(output),
    }
}

/// Format an error.
pub fn format_error(err: &Error, mode: OutputMode) -> String {
    match mode {
        OutputMode::Json => pretty(&json!({ "error": err.to_string() })),
        OutputMode::Raw => err.to_string(),
        OutputMode::Human => format!("(error) {}", err),
    }
}

/// Format a plain status message (e.g. "OK").
pub fn format_message(message: &str, mode: OutputMode) -> String {
    match mode {
        OutputMode::Json => pretty(&json!({ "message": message })),
        OutputMode::Raw | OutputMode::Human => message.to_string(),
    }
}

/// Format the current connection.
pub fn format_status(connection: Option<&Connection>, mode: OutputMode) -> String {
    match (connection, mode) {
        (Some(conn), OutputMode::Json) => pretty(&json!({
            "connected": conn.is_connected(),
            "location": conn.base_url(),
            "auth": conn.auth().is_some(),
        })),
        (None, OutputMode::Json) => pretty(&json!({ "connected": false })),
        (Some(conn), OutputMode::Raw) => conn.base_url().to_string(),
        (None, OutputMode::Raw) => String::new(),
        (Some(conn), OutputMode::Human) => {
            let auth = if conn.auth().is_some() { " (with token)" } else { "" };
            format!("connected to {}{}", conn.base_url(), auth)
        }
        (None, OutputMode::Human) => "not connected".to_string(),
    }
}

/// Format rendered tree rows.
pub fn format_tree(rows: &[VisibleNode], mode: OutputMode) -> String {
    match mode {
        OutputMode::Json => pretty(&serde_json::Value::Array(
            rows.iter()
                .map(|row| {
                    json!({
                        "path": row.path.to_path_string(),
                        "depth": row.depth,
                        "kind": row.kind,
                        "value": row.scalar.as_ref().map(|v| v.as_inner().clone()),
                        "children": row.child_count,
                        "expanded": row.expanded,
                        "truncated": row.truncated,
                    })
                })
                .collect(),
        )),
        OutputMode::Raw => rows
            .iter()
            .map(|row| match &row.scalar {
                Some(value) => format!("{}\t{}", row.path, value_raw(value)),
                None => format!("{}\t{}", row.path, row.kind),
            })
            .collect::<Vec<_>>()
            .join("\n"),
        OutputMode::Human => {
            let null_root = matches!(rows, [row] if row.key.is_none()
                && row.scalar.as_ref().is_some_and(|v| v.is_null()));
            if rows.is_empty() || null_root {
                return "(empty tree)".to_string();
            }
            rows.iter().map(tree_line).collect::<Vec<_>>().join("\n")
        }
    }
}

fn tree_line(row: &VisibleNode) -> String {
    let indent = "  ".repeat(row.depth);
    let marker = match (row.expandable, row.expanded) {
        (true, true) => "- ",
        (true, false) => "+ ",
        (false, _) => "  ",
    };
    let key = row.key.as_deref().unwrap_or("/");
    let body = match &row.scalar {
        Some(value) => format!("{}: {}", key, value_human(value)),
        None if row.kind == "array" => format!("{} [{}]", key, row.child_count),
        None => format!("{} {{{}}}", key, row.child_count),
    };
    let mut line = format!("{}{}{}", indent, marker, body);
    if row.truncated {
        line.push_str(" ...");
    }
    if row.editing {
        line.push_str("  (editing)");
    }
    line
}

/// Format a proposed plan.
pub fn format_plan(plan: &ActionPlan, mode: OutputMode) -> String {
    match mode {
        OutputMode::Json => pretty(&json!(plan)),
        OutputMode::Raw => plan
            .actions
            .iter()
            .map(|a| a.to_string())
            .collect::<Vec<_>>()
            .join("\n"),
        OutputMode::Human => {
            let mut lines = vec![plan.message.clone()];
            if plan.is_empty() {
                lines.push("(no actions)".to_string());
            }
            for (i, action) in plan.actions.iter().enumerate() {
                lines.push(format!("{}) {}", i + 1, action));
            }
            lines.join("\n")
        }
    }
}

/// Format the result of an applied plan.
pub fn format_report(report: &PlanReport, mode: OutputMode) -> String {
    match mode {
        OutputMode::Json => pretty(&json!({ "completed": report.completed })),
        OutputMode::Raw => report.completed.to_string(),
        OutputMode::Human => match report.completed {
            1 => "Applied 1 action".to_string(),
            n => format!("Applied {} actions", n),
        },
    }
}

fn pretty(value: &serde_json::Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| format!("{{\"error\": \"{}\"}}", e))
}

// =========================================================================
// Raw mode
// =========================================================================

fn format_raw(output: &Output) -> String {
    match output {
        Output::Unit => String::new(),
        Output::Value(v) if v.is_null() => String::new(),
        Output::Value(v) => value_raw(v),
        Output::Keys(keys) => keys.join("\n"),
        Output::Connected { location } => location.clone(),
    }
}

fn value_raw(v: &TreeValue) -> String {
    match v.as_inner() {
        serde_json::Value::String(s) => s.clone(),
        _ => v.to_json_string(),
    }
}

// =========================================================================
// Human mode
// =========================================================================

fn format_human(output: &Output) -> String {
    match output {
        Output::Unit => "OK".to_string(),
        Output::Value(v) => value_human(v),
        Output::Keys(keys) if keys.is_empty() => "(empty list)".to_string(),
        Output::Keys(keys) => keys
            .iter()
            .enumerate()
            .map(|(i, k)| format!("{}) \"{}\"", i + 1, k))
            .collect::<Vec<_>>()
            .join("\n"),
        Output::Connected { location } => format!("PONG {}", location),
    }
}

fn value_human(v: &TreeValue) -> String {
    if v.is_null() {
        "(nil)".to_string()
    } else if v.is_container() {
        v.to_json_string_pretty()
    } else {
        v.to_json_string()
    }
}
