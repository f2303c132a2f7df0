//! Console session: connection, snapshot, and view state
//!
//! A [`Console`] ties one store connection to the last full read of the tree
//! (the snapshot) and the per-node view state. Every successful mutation
//! re-reads the root and replaces the snapshot; nothing is patched locally.

use canopy_core::{ActionPlan, TreePath, TreeValue, TreeView, VisibleNode};
use canopy_intelligence::PlanContext;
use canopy_store::{Connection, RestStore, TreeStore};

use crate::plan::{execute_plan, PlanReport};
use crate::{Command, Error, Executor, Output, Result};

/// One console session
pub struct Console {
    connection: Option<Connection>,
    executor: Option<Executor>,
    snapshot: TreeValue,
    view: TreeView,
}

impl Default for Console {
    fn default() -> Self {
        Console::new(TreeView::default())
    }
}

impl Console {
    /// Create a disconnected console with the given view settings
    pub fn new(view: TreeView) -> Self {
        Console {
            connection: None,
            executor: None,
            snapshot: TreeValue::null(),
            view,
        }
    }

    /// Probe `store` and, if it answers, make it the session's store.
    ///
    /// On failure the current connection (if any) is left as it was.
    pub fn connect(&mut self, mut connection: Connection, store: Box<dyn TreeStore>) -> Result<()> {
        let executor = Executor::new(store);
        if let Err(e) = executor.execute(Command::Probe) {
            tracing::warn!(
                target: "canopy::console",
                location = connection.base_url(),
                error = %e,
                "probe failed"
            );
            return Err(e);
        }
        connection.mark_connected();
        tracing::info!(target: "canopy::console", location = connection.base_url(), "connected");

        self.disconnect();
        self.connection = Some(connection);
        self.executor = Some(executor);
        self.refresh()?;
        Ok(())
    }

    /// Connect to a remote store by URL or project id
    pub fn connect_url(&mut self, input: &str, auth: Option<&str>) -> Result<()> {
        let connection = Connection::new(input, auth)?;
        let store = RestStore::from_connection(&connection);
        self.connect(connection, Box::new(store))
    }

    /// Connect to an in-process store
    pub fn connect_memory(&mut self, store: Box<dyn TreeStore>) -> Result<()> {
        self.connect(Connection::memory(), store)
    }

    /// Drop the connection, the snapshot, and all view state
    pub fn disconnect(&mut self) {
        if let Some(connection) = self.connection.take() {
            tracing::info!(target: "canopy::console", location = connection.base_url(), "disconnected");
        }
        self.executor = None;
        self.snapshot = TreeValue::null();
        self.view.reset();
    }

    /// Whether a store is connected
    pub fn is_connected(&self) -> bool {
        self.connection.as_ref().is_some_and(Connection::is_connected)
    }

    /// Current connection
    pub fn connection(&self) -> Option<&Connection> {
        self.connection.as_ref()
    }

    /// The executor, or [`Error::NotConnected`]
    pub fn executor(&self) -> Result<&Executor> {
        self.executor.as_ref().ok_or(Error::NotConnected)
    }

    /// Execute one command against the connected store
    pub fn execute(&self, cmd: Command) -> Result<Output> {
        self.executor()?.execute(cmd)
    }

    /// Read a subtree straight from the store
    pub fn read(&self, path: &TreePath) -> Result<TreeValue> {
        match self.execute(Command::Read { path: path.clone() })? {
            Output::Value(value) => Ok(value),
            other => Err(unexpected("read", &other)),
        }
    }

    /// Keys directly under a path
    pub fn keys(&self, path: &TreePath) -> Result<Vec<String>> {
        match self.execute(Command::Keys { path: path.clone() })? {
            Output::Keys(keys) => Ok(keys),
            other => Err(unexpected("keys", &other)),
        }
    }

    /// Re-read the whole tree into the snapshot
    pub fn refresh(&mut self) -> Result<&TreeValue> {
        let root = self.read(&TreePath::root())?;
        tracing::debug!(
            target: "canopy::console",
            top_level = root.child_count(),
            "snapshot refreshed"
        );
        self.snapshot = root;
        Ok(&self.snapshot)
    }

    /// Last full read of the tree
    pub fn snapshot(&self) -> &TreeValue {
        &self.snapshot
    }

    /// View state
    pub fn view(&self) -> &TreeView {
        &self.view
    }

    /// Mutable view state
    pub fn view_mut(&mut self) -> &mut TreeView {
        &mut self.view
    }

    /// Rows to render for the current snapshot
    pub fn visible_nodes(&self) -> Vec<VisibleNode> {
        self.view.visible_nodes(&self.snapshot)
    }

    /// Replace the subtree at `path`, then refresh
    pub fn write(&mut self, path: &TreePath, value: TreeValue) -> Result<()> {
        self.mutate(Command::Write {
            path: path.clone(),
            value,
        })
    }

    /// Merge into the subtree at `path`, then refresh
    pub fn merge(&mut self, path: &TreePath, value: TreeValue) -> Result<()> {
        self.mutate(Command::Merge {
            path: path.clone(),
            value,
        })
    }

    /// Context for the plan generator.
    ///
    /// With a path, the generator sees the value stored there; without one it
    /// only gets the root's key list.
    pub fn plan_context(&self, path: Option<&TreePath>) -> Result<PlanContext> {
        match path {
            Some(path) => Ok(PlanContext::Subtree {
                path: path.clone(),
                value: self.read(path)?,
            }),
            None => Ok(PlanContext::TopLevelKeys(self.keys(&TreePath::root())?)),
        }
    }

    /// Run `plan` and refresh the snapshot whatever the outcome.
    ///
    /// A refresh failure is logged; it never replaces the plan's own result.
    pub fn apply_plan(&mut self, plan: &ActionPlan) -> Result<PlanReport> {
        let result = execute_plan(self.executor()?, plan);
        if let Err(e) = self.refresh() {
            tracing::warn!(
                target: "canopy::console",
                error = %e,
                plan_ok = result.is_ok(),
                "refresh after plan failed"
            );
        }
        let completed = match &result {
            Ok(report) => report.completed,
            Err(Error::PartialPlanExecution { completed, .. }) => *completed,
            Err(_) => 0,
        };
        for action in plan.actions.iter().take(completed) {
            self.forget_if_gone(action.path());
        }
        result
    }

    /// Execute a mutation and refresh the snapshot
    pub(crate) fn mutate(&mut self, cmd: Command) -> Result<()> {
        let name = cmd.name();
        self.execute(cmd)?;
        tracing::debug!(target: "canopy::console", command = name, "mutation applied");
        self.refresh()?;
        Ok(())
    }

    /// Drop view state for a path that no longer exists in the snapshot
    pub(crate) fn forget_if_gone(&mut self, path: &TreePath) {
        if canopy_core::get_at_path(&self.snapshot, path).is_none() {
            self.view.forget_subtree(path);
        }
    }
}

fn unexpected(op: &str, output: &Output) -> Error {
    Error::InvalidState {
        reason: format!("{} returned unexpected output {:?}", op, output),
    }
}
