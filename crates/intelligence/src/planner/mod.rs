//! Natural-language plan generation
//!
//! This module provides the `PlanGenerator` trait and the request types for
//! turning a free-text instruction into an [`ActionPlan`]. The generator is
//! an untrusted collaborator: its output goes through
//! [`parse_plan_response`](parser::parse_plan_response) before anything can
//! reach the store.
//!
//! # Context
//!
//! | Variant | Sent to the model |
//! |---------|-------------------|
//! | `Subtree` | path label plus the JSON found there |
//! | `TopLevelKeys` | the root's key list only |

pub mod api;
pub mod error;
pub mod parser;
pub mod prompt;

#[cfg(test)]
pub(crate) mod mock;

pub use api::ApiPlanner;
pub use error::PlanError;

use canopy_core::{ActionPlan, TreePath, TreeValue};

/// What the generator gets to see of the tree
#[derive(Debug, Clone, PartialEq)]
pub enum PlanContext {
    /// The value found at a user-chosen path
    Subtree {
        /// The chosen path
        path: TreePath,
        /// Value at that path (null when empty)
        value: TreeValue,
    },
    /// Structural hint: the keys directly under the root
    TopLevelKeys(Vec<String>),
}

/// One instruction for the generator
#[derive(Debug, Clone, PartialEq)]
pub struct PlanRequest {
    /// Free-text instruction
    pub instruction: String,
    /// Tree context
    pub context: PlanContext,
}

impl PlanRequest {
    /// Create a request
    pub fn new(instruction: impl Into<String>, context: PlanContext) -> Self {
        PlanRequest {
            instruction: instruction.into(),
            context,
        }
    }
}

/// Trait for plan generation implementations.
///
/// The trait is object-safe for use as `Box<dyn PlanGenerator>`.
///
/// # Implementations
///
/// - `ApiPlanner`: calls an OpenAI-compatible endpoint
pub trait PlanGenerator: Send + Sync {
    /// Produce a validated plan for `request`. Nothing is executed.
    fn generate(&self, request: &PlanRequest) -> Result<ActionPlan, PlanError>;
}
