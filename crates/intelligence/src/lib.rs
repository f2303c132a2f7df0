//! Intelligence layer for Canopy
//!
//! Turns free-text instructions into action plans by asking an
//! OpenAI-compatible model, and validates whatever comes back.
//!
//! This crate provides:
//! - PlanGenerator trait for pluggable generators
//! - PlanRequest / PlanContext describing what the model sees
//! - ApiPlanner calling `{endpoint}/chat/completions`
//! - parse_plan_response for untrusted model output
//!
//! # Usage
//!
//! ```ignore
//! use canopy_intelligence::{ApiPlanner, PlanContext, PlanGenerator, PlanRequest};
//!
//! let planner = ApiPlanner::new("http://localhost:11434/v1", "qwen3:1.7b", None, 30_000);
//! let request = PlanRequest::new("enable dark mode", PlanContext::TopLevelKeys(keys));
//! let plan = planner.generate(&request)?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod llm_client;
pub mod planner;

pub use llm_client::LlmClientError;
pub use planner::parser::parse_plan_response;
pub use planner::{ApiPlanner, PlanContext, PlanError, PlanGenerator, PlanRequest};
