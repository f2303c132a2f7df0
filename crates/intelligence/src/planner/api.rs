//! API-based plan generator using an OpenAI-compatible endpoint
//!
//! Calls `{endpoint}/chat/completions` with the plan prompt and parses the
//! response into a validated plan. One attempt per instruction.

use super::parser::parse_plan_response;
use super::prompt::build_messages;
use super::{PlanError, PlanGenerator, PlanRequest};
use canopy_core::ActionPlan;

/// Plan generator that calls an OpenAI-compatible chat completions endpoint.
///
/// Works with Ollama, vLLM, llama.cpp server, OpenAI, and other compatible providers.
pub struct ApiPlanner {
    /// Full URL to the chat completions endpoint
    url: String,
    /// Model name to request
    model: String,
    /// Optional bearer token
    api_key: Option<String>,
    /// Request timeout
    timeout: std::time::Duration,
    /// Sampling temperature (default: 0.2)
    temperature: f32,
    /// Maximum response tokens (default: 1024)
    max_tokens: u32,
}

/// Low temperature: plans should be predictable, not creative.
const DEFAULT_PLAN_TEMPERATURE: f32 = 0.2;
/// Default max tokens for plan responses.
const DEFAULT_PLAN_MAX_TOKENS: u32 = 1024;

impl ApiPlanner {
    /// Create a new ApiPlanner.
    ///
    /// `endpoint` should be the base URL (e.g. "http://localhost:11434/v1").
    /// The `/chat/completions` path is appended automatically.
    pub fn new(endpoint: &str, model: &str, api_key: Option<&str>, timeout_ms: u64) -> Self {
        let base = endpoint.trim_end_matches('/');
        let url = format!("{}/chat/completions", base);
        Self {
            url,
            model: model.to_string(),
            api_key: api_key.map(|s| s.to_string()),
            timeout: std::time::Duration::from_millis(timeout_ms),
            temperature: DEFAULT_PLAN_TEMPERATURE,
            max_tokens: DEFAULT_PLAN_MAX_TOKENS,
        }
    }

    /// Override the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Override the maximum response tokens.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Full chat completions URL
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Request body for `request`
    fn request_body(&self, request: &PlanRequest) -> serde_json::Value {
        serde_json::json!({
            "model": self.model,
            "messages": build_messages(request),
            "temperature": self.temperature,
            "max_tokens": self.max_tokens,
        })
    }
}

impl PlanGenerator for ApiPlanner {
    fn generate(&self, request: &PlanRequest) -> Result<ActionPlan, PlanError> {
        let text = crate::llm_client::call_chat_completions(
            &self.url,
            self.api_key.as_deref(),
            self.timeout,
            &self.request_body(request),
        )?;
        let plan = parse_plan_response(&text)?;
        tracing::debug!(
            target: "canopy::plan",
            model = %self.model,
            actions = plan.len(),
            "plan generated"
        );
        Ok(plan)
    }
}
