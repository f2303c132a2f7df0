//! Plan Generator Tests
//!
//! Tests for the canopy-intelligence crate:
//! - parse_plan_response - untrusted model text to a validated plan
//! - ApiPlanner - chat completions wire contract against a mock endpoint

#[path = "../common/mod.rs"]
mod common;

mod api_planner;
mod response_parsing;
