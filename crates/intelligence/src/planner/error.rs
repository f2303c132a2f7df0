//! Error types for plan generation

use std::fmt;

use crate::llm_client::LlmClientError;

/// Errors that can occur while generating an action plan
#[derive(Debug)]
pub enum PlanError {
    /// HTTP request failed (network unreachable, connection refused, etc.)
    Network(String),
    /// Model request timed out
    Timeout,
    /// Model endpoint failed or answered outside the chat-completions shape
    Model(String),
    /// Model answered, but not with a valid plan
    InvalidResponse(String),
}

impl fmt::Display for PlanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanError::Network(msg) => write!(f, "network error: {}", msg),
            PlanError::Timeout => write!(f, "model request timed out"),
            PlanError::Model(msg) => write!(f, "model error: {}", msg),
            PlanError::InvalidResponse(msg) => write!(f, "invalid plan response: {}", msg),
        }
    }
}

impl std::error::Error for PlanError {}

impl From<LlmClientError> for PlanError {
    fn from(e: LlmClientError) -> Self {
        match e {
            LlmClientError::Network(msg) => PlanError::Network(msg),
            LlmClientError::Timeout => PlanError::Timeout,
            LlmClientError::Parse(msg) => PlanError::Model(msg),
            LlmClientError::Status(code) => {
                PlanError::Model(format!("endpoint returned status {}", code))
            }
        }
    }
}
