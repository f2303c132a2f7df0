//! Prompt template for plan generation

use super::{PlanContext, PlanRequest};

/// Context values longer than this are cut before they are sent.
pub const MAX_CONTEXT_CHARS: usize = 16_000;

/// System prompt for plan generation via an LLM.
///
/// Instructs the model to answer with a single JSON object describing the
/// mutations.
pub const SYSTEM_PROMPT: &str = "\
You are an assistant for a hierarchical JSON document store. Data is addressed \
by slash-separated paths such as users/42/name.

Turn the user's instruction into a list of operations on the tree.

Output format (a single JSON object, no other text):
{\"message\": \"<short explanation for the user>\",
 \"actions\": [{\"type\": \"SET\" | \"UPDATE\" | \"DELETE\", \"path\": \"<path>\", \"data\": <json>}]}

Operation types:
- SET replaces the whole value at path with data
- UPDATE merges the top-level keys of data into the object at path
- DELETE removes the value at path and everything under it (no data)

Rules:
- Use paths relative to the root, without a leading slash
- Use an empty actions list when the instruction needs no change or is a question
- Do NOT include markdown or commentary outside the JSON object";

/// Render the user message for a request.
pub fn user_message(request: &PlanRequest) -> String {
    let mut text = format!("Instruction: {}\n", request.instruction.trim());
    match &request.context {
        PlanContext::Subtree { path, value } => {
            let label = if path.is_root() {
                "/".to_string()
            } else {
                path.to_path_string()
            };
            text.push_str(&format!("Context path: {}\n", label));
            text.push_str("Current data at that path:\n");
            text.push_str(&truncate(&value.to_json_string_pretty(), MAX_CONTEXT_CHARS));
        }
        PlanContext::TopLevelKeys(keys) => {
            if keys.is_empty() {
                text.push_str("The tree is empty.");
            } else {
                text.push_str(&format!("Top-level keys: {}", keys.join(", ")));
            }
        }
    }
    text
}

/// Build the messages array for an OpenAI-compatible chat completions request.
pub fn build_messages(request: &PlanRequest) -> serde_json::Value {
    serde_json::json!([
        {"role": "system", "content": SYSTEM_PROMPT},
        {"role": "user", "content": user_message(request)}
    ])
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}\n... (truncated)", &text[..cut]),
        None => text.to_string(),
    }
}
