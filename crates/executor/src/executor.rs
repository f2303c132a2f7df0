//! The Executor is the command dispatcher.
//!
//! It owns the store handle and routes each [`Command`] to the matching
//! [`TreeStore`] call. It keeps no other state, so the same command against
//! the same tree always produces the same output.

use canopy_core::TreePath;
use canopy_store::TreeStore;

use crate::{Command, Output, Result};

/// Command dispatcher over one store
pub struct Executor {
    store: Box<dyn TreeStore>,
}

impl Executor {
    /// Create a new executor wrapping a store.
    pub fn new(store: Box<dyn TreeStore>) -> Self {
        Self { store }
    }

    /// Location of the underlying store
    pub fn location(&self) -> String {
        self.store.location()
    }

    /// Execute a single command.
    ///
    /// Returns the command result or an error.
    pub fn execute(&self, cmd: Command) -> Result<Output> {
        tracing::trace!(target: "canopy::console", command = cmd.name(), "execute");
        match cmd {
            Command::Read { path } => Ok(Output::Value(self.store.read(&path)?)),
            Command::Keys { path } => Ok(Output::Keys(self.keys(&path)?)),
            Command::Write { path, value } => {
                self.store.write(&path, &value)?;
                Ok(Output::Unit)
            }
            Command::Merge { path, value } => {
                self.store.merge(&path, &value)?;
                Ok(Output::Unit)
            }
            Command::Remove { path } => {
                self.store.remove(&path)?;
                Ok(Output::Unit)
            }
            Command::Probe => {
                self.store.probe()?;
                Ok(Output::Connected {
                    location: self.store.location(),
                })
            }
        }
    }

    fn keys(&self, path: &TreePath) -> Result<Vec<String>> {
        let shallow = self.store.read_shallow(path)?;
        Ok(shallow.child_keys())
    }
}
