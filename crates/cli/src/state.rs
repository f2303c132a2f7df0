//! Session wrapper with connection, plan, and confirmation context.
//!
//! Holds the `Console` (connection, snapshot, view state), the session's
//! single `PlanSession`, and the plan generator built from `[model]`.

use canopy_core::{ActionPlan, TreePath};
use canopy_executor::{Command, Console, Error, Output, PlanReport, PlanSession, PlanState, Result};
use canopy_intelligence::PlanGenerator;
use canopy_store::{MemoryStore, MEMORY_LOCATION};

/// How destructive operations get their confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmMode {
    /// Ask on the terminal (REPL)
    Ask,
    /// `--yes` was given
    Assume,
    /// Non-interactive without `--yes`: refuse
    Refuse,
}

/// Wraps the console and tracks the plan in progress.
pub struct SessionState {
    console: Console,
    plans: PlanSession,
    planner: Option<Box<dyn PlanGenerator>>,
    confirm: ConfirmMode,
}

impl SessionState {
    /// Create a new SessionState around a console.
    pub fn new(
        console: Console,
        planner: Option<Box<dyn PlanGenerator>>,
        confirm: ConfirmMode,
    ) -> Self {
        Self {
            console,
            plans: PlanSession::new(),
            planner,
            confirm,
        }
    }

    /// Execute a read-only command against the connected store.
    pub fn execute(&self, cmd: Command) -> Result<Output> {
        self.console.execute(cmd)
    }

    /// Connect to `target`; `memory:` opens an empty in-memory tree.
    pub fn connect(&mut self, target: &str, auth: Option<&str>) -> Result<()> {
        let connected = if target.trim() == MEMORY_LOCATION {
            self.console.connect_memory(Box::new(MemoryStore::new()))
        } else {
            self.console.connect_url(target, auth)
        };
        connected?;
        // A plan drafted against another tree means nothing here
        self.plans = PlanSession::new();
        Ok(())
    }

    /// Drop the connection and any plan in progress.
    pub fn disconnect(&mut self) {
        self.console.disconnect();
        self.plans = PlanSession::new();
    }

    /// The console.
    pub fn console(&self) -> &Console {
        &self.console
    }

    /// The console, mutably.
    pub fn console_mut(&mut self) -> &mut Console {
        &mut self.console
    }

    /// The plan session.
    pub fn plans(&self) -> &PlanSession {
        &self.plans
    }

    /// Confirmation policy for deletions and plans.
    pub fn confirm_mode(&self) -> ConfirmMode {
        self.confirm
    }

    /// Draft `instruction` and ask the generator for a plan.
    pub fn propose_plan(&mut self, instruction: &str, at: Option<TreePath>) -> Result<&ActionPlan> {
        let Some(planner) = self.planner.as_deref() else {
            return Err(Error::Config {
                reason: "no [model] section configured; plans are unavailable".into(),
            });
        };
        self.console.executor()?;
        self.plans.draft(instruction, at)?;
        self.plans.propose(planner, &self.console)
    }

    /// Apply the proposed plan.
    pub fn confirm_plan(&mut self) -> Result<PlanReport> {
        self.plans.confirm(&mut self.console)
    }

    /// Drop the proposed plan.
    pub fn discard_plan(&mut self) -> Result<()> {
        self.plans.discard()
    }

    /// Generate the REPL prompt string.
    pub fn prompt(&self) -> String {
        let plan = if self.plans.state() == PlanState::Proposed {
            "(plan)"
        } else {
            ""
        };
        match self.console.connection() {
            Some(conn) => format!("canopy:{}{}> ", conn.base_url(), plan),
            None => "canopy> ".to_string(),
        }
    }
}
