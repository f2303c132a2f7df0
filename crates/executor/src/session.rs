//! Plan lifecycle for one console session.
//!
//! The [`PlanSession`] holds at most one plan and walks it through:
//!
//! ```text
//! Idle -> Drafting -> Proposed -> Executing -> Completed | Failed
//!             ^           |
//!             +- discard -+
//! ```
//!
//! Nothing reaches the store until [`PlanSession::confirm`]. A confirmed
//! plan cannot be confirmed again; drafting a new instruction starts over.
//!
//! # Usage
//!
//! ```ignore
//! use canopy_executor::{Console, PlanSession};
//!
//! let mut session = PlanSession::new();
//! session.draft("switch everyone to dark mode", None)?;
//! let plan = session.propose(&planner, &console)?;
//! println!("{}", plan.message);
//! let report = session.confirm(&mut console)?;
//! ```

use std::fmt;

use uuid::Uuid;

use canopy_core::{ActionPlan, TreePath};
use canopy_intelligence::{PlanGenerator, PlanRequest};

use crate::plan::PlanReport;
use crate::{Console, Error, Result};

/// Where the session's plan is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanState {
    /// No instruction yet
    Idle,
    /// Instruction recorded, no plan yet
    Drafting,
    /// Plan generated and awaiting confirmation
    Proposed,
    /// Plan is being applied
    Executing,
    /// Every action applied
    Completed,
    /// An action failed; earlier ones stay applied
    Failed,
}

impl fmt::Display for PlanState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PlanState::Idle => "idle",
            PlanState::Drafting => "drafting",
            PlanState::Proposed => "proposed",
            PlanState::Executing => "executing",
            PlanState::Completed => "completed",
            PlanState::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// The session's single plan slot
#[derive(Debug, Clone)]
pub struct PlanSession {
    state: PlanState,
    instruction: String,
    context_path: Option<TreePath>,
    plan: Option<ActionPlan>,
    plan_id: Option<Uuid>,
}

impl Default for PlanSession {
    fn default() -> Self {
        Self::new()
    }
}

impl PlanSession {
    /// Create an idle session
    pub fn new() -> Self {
        PlanSession {
            state: PlanState::Idle,
            instruction: String::new(),
            context_path: None,
            plan: None,
            plan_id: None,
        }
    }

    /// Current lifecycle state
    pub fn state(&self) -> PlanState {
        self.state
    }

    /// The recorded instruction
    pub fn instruction(&self) -> &str {
        &self.instruction
    }

    /// The recorded context path, if any
    pub fn context_path(&self) -> Option<&TreePath> {
        self.context_path.as_ref()
    }

    /// Id of the current plan, for log correlation
    pub fn plan_id(&self) -> Option<Uuid> {
        self.plan_id
    }

    /// The plan awaiting confirmation
    pub fn plan(&self) -> Option<&ActionPlan> {
        match self.state {
            PlanState::Proposed => self.plan.as_ref(),
            _ => None,
        }
    }

    /// Record a new instruction, dropping any unconfirmed plan.
    pub fn draft(&mut self, instruction: &str, context_path: Option<TreePath>) -> Result<()> {
        if self.state == PlanState::Executing {
            return Err(Error::invalid_state("a plan is executing"));
        }
        let instruction = instruction.trim();
        if instruction.is_empty() {
            return Err(Error::invalid_input("instruction must not be empty"));
        }
        self.instruction = instruction.to_string();
        self.context_path = context_path;
        self.plan = None;
        self.plan_id = None;
        self.state = PlanState::Drafting;
        Ok(())
    }

    /// Ask `generator` for a plan and hold it unexecuted.
    ///
    /// On failure the session stays in Drafting so the user can retry.
    pub fn propose(
        &mut self,
        generator: &dyn PlanGenerator,
        console: &Console,
    ) -> Result<&ActionPlan> {
        if self.state != PlanState::Drafting {
            return Err(Error::invalid_state(format!(
                "cannot generate a plan while {}",
                self.state
            )));
        }
        let context = console.plan_context(self.context_path.as_ref())?;
        let request = PlanRequest::new(self.instruction.clone(), context);
        let plan = generator.generate(&request)?;

        let id = Uuid::new_v4();
        tracing::info!(
            target: "canopy::plan",
            plan_id = %id,
            actions = plan.len(),
            "plan proposed"
        );
        self.plan_id = Some(id);
        self.state = PlanState::Proposed;
        Ok(self.plan.insert(plan))
    }

    /// Drop the proposed plan and go back to Drafting. Nothing is executed.
    pub fn discard(&mut self) -> Result<()> {
        if self.state != PlanState::Proposed {
            return Err(Error::invalid_state(format!(
                "no plan to discard while {}",
                self.state
            )));
        }
        tracing::info!(
            target: "canopy::plan",
            plan_id = %self.plan_id.unwrap_or_default(),
            "plan discarded"
        );
        self.plan = None;
        self.plan_id = None;
        self.state = PlanState::Drafting;
        Ok(())
    }

    /// Apply the proposed plan. Legal only in Proposed.
    ///
    /// Ends in Completed or Failed; the console snapshot is refreshed either
    /// way.
    pub fn confirm(&mut self, console: &mut Console) -> Result<PlanReport> {
        if self.state != PlanState::Proposed {
            return Err(Error::invalid_state(format!(
                "no plan awaiting confirmation while {}",
                self.state
            )));
        }
        let Some(plan) = self.plan.take() else {
            return Err(Error::invalid_state("proposed plan is missing"));
        };
        let id = self.plan_id.unwrap_or_default();
        self.state = PlanState::Executing;
        tracing::info!(target: "canopy::plan", plan_id = %id, actions = plan.len(), "executing plan");

        let result = console.apply_plan(&plan);
        self.state = match &result {
            Ok(report) => {
                tracing::info!(target: "canopy::plan", plan_id = %id, completed = report.completed, "plan completed");
                PlanState::Completed
            }
            Err(e) => {
                tracing::warn!(target: "canopy::plan", plan_id = %id, error = %e, "plan failed");
                PlanState::Failed
            }
        };
        result
    }
}
