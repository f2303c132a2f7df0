//! Mock plan generator for deterministic testing

use super::{PlanError, PlanGenerator, PlanRequest};
use canopy_core::{Action, ActionPlan};

/// Mock generator that returns a fixed plan for any instruction.
pub struct MockPlanner {
    plan: ActionPlan,
}

impl MockPlanner {
    /// Always answer with `actions`
    pub fn new(message: &str, actions: Vec<Action>) -> Self {
        MockPlanner {
            plan: ActionPlan::new(message, actions),
        }
    }

    /// Always answer with no actions
    pub fn empty(message: &str) -> Self {
        Self::new(message, Vec::new())
    }
}

impl PlanGenerator for MockPlanner {
    fn generate(&self, _request: &PlanRequest) -> Result<ActionPlan, PlanError> {
        Ok(self.plan.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::PlanContext;
    use canopy_core::TreePath;

    #[test]
    fn test_mock_planner_returns_fixed_plan() {
        let planner = MockPlanner::new("drop it", vec![Action::remove(TreePath::root().child("a"))]);
        let request = PlanRequest::new("anything", PlanContext::TopLevelKeys(vec!["a".into()]));
        let plan = planner.generate(&request).unwrap();
        assert_eq!(plan.len(), 1);
        assert_eq!(plan.message, "drop it");
    }
}
