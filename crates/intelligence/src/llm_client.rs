//! Chat-completions client shared by the plan generators
//!
//! One call, one attempt: the caller decides what a failure means.

use std::fmt;
use std::time::Duration;

/// Errors that can occur when calling an external LLM endpoint
#[derive(Debug)]
pub enum LlmClientError {
    /// HTTP request failed (network unreachable, connection refused, etc.)
    Network(String),
    /// Response envelope did not have the chat-completions shape
    Parse(String),
    /// Model request timed out
    Timeout,
    /// Endpoint answered with a non-success status
    Status(u16),
}

impl fmt::Display for LlmClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LlmClientError::Network(msg) => write!(f, "network error: {}", msg),
            LlmClientError::Parse(msg) => write!(f, "parse error: {}", msg),
            LlmClientError::Timeout => write!(f, "model request timed out"),
            LlmClientError::Status(code) => write!(f, "model endpoint returned status {}", code),
        }
    }
}

impl std::error::Error for LlmClientError {}

/// Call an OpenAI-compatible chat completions endpoint and extract the response content.
///
/// Handles:
/// - ureq agent construction with timeout
/// - Bearer token auth header
/// - Sending the request body
/// - Parsing `choices[0].message.content` from the response
pub fn call_chat_completions(
    url: &str,
    api_key: Option<&str>,
    timeout: Duration,
    body: &serde_json::Value,
) -> Result<String, LlmClientError> {
    let body_bytes = serde_json::to_vec(body)
        .map_err(|e| LlmClientError::Parse(format!("failed to serialize request: {}", e)))?;

    let config = ureq::Agent::config_builder()
        .timeout_global(Some(timeout))
        .build();
    let agent = ureq::Agent::new_with_config(config);

    let mut request = agent.post(url).header("Content-Type", "application/json");

    if let Some(key) = api_key {
        request = request.header("Authorization", &format!("Bearer {}", key));
    }

    tracing::debug!(
        target: "canopy::llm_client",
        url,
        bytes = body_bytes.len(),
        "chat completion request"
    );

    let mut response = request.send(&body_bytes[..]).map_err(|e| match e {
        ureq::Error::StatusCode(code) => LlmClientError::Status(code),
        ureq::Error::Timeout(_) => LlmClientError::Timeout,
        other => {
            let msg = other.to_string();
            if msg.contains("timed out") || msg.contains("Timeout") {
                LlmClientError::Timeout
            } else {
                LlmClientError::Network(msg)
            }
        }
    })?;

    let response_text = response
        .body_mut()
        .read_to_string()
        .map_err(|e| LlmClientError::Network(format!("failed to read response: {}", e)))?;

    extract_content(&response_text)
}

/// Pull `choices[0].message.content` out of a chat-completions response.
pub fn extract_content(response_text: &str) -> Result<String, LlmClientError> {
    let json: serde_json::Value = serde_json::from_str(response_text)
        .map_err(|e| LlmClientError::Parse(format!("invalid JSON response: {}", e)))?;

    let content = json
        .get("choices")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("message"))
        .and_then(|m| m.get("content"))
        .and_then(|c| c.as_str())
        .ok_or_else(|| {
            LlmClientError::Parse(format!(
                "unexpected response format: {}",
                response_text.chars().take(200).collect::<String>()
            ))
        })?;

    Ok(content.to_string())
}
