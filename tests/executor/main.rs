//! Console Layer Tests
//!
//! Tests for the canopy-executor crate which provides:
//! - Console - connection, snapshot, and view state
//! - Node editor flows (edit, add child, two-step delete)
//! - execute_plan - ordered, stop-on-first-failure plan engine
//! - PlanSession - draft/propose/confirm lifecycle
//! - ConsoleConfig - canopy.toml loading

#[path = "../common/mod.rs"]
mod common;

mod config_files;
mod editor_flows;
mod plan_execution;
