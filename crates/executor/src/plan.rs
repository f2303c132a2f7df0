//! Action plan execution engine
//!
//! Runs a plan's actions strictly in order through the [`Executor`]. The
//! first failure stops the plan; earlier actions are not rolled back.

use canopy_core::ActionPlan;

use crate::{Command, Error, Executor, Result};

/// Outcome of a fully applied plan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlanReport {
    /// Actions applied (all of them)
    pub completed: usize,
}

/// Apply every action of `plan` in order.
///
/// # Errors
///
/// [`Error::PartialPlanExecution`] when an action fails, carrying how many
/// actions completed before it (0 when the first one fails) and the
/// underlying error.
pub fn execute_plan(executor: &Executor, plan: &ActionPlan) -> Result<PlanReport> {
    let total = plan.len();
    for (completed, action) in plan.actions.iter().enumerate() {
        tracing::debug!(
            target: "canopy::plan",
            index = completed,
            action = %action,
            "applying action"
        );
        if let Err(source) = executor.execute(Command::from(action.clone())) {
            tracing::warn!(
                target: "canopy::plan",
                completed,
                total,
                error = %source,
                "plan stopped"
            );
            return Err(Error::PartialPlanExecution {
                completed,
                total,
                source: Box::new(source),
            });
        }
    }
    Ok(PlanReport { completed: total })
}
