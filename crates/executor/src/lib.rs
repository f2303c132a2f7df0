//! # Canopy Executor
//!
//! The console layer of Canopy: everything a front end needs to browse,
//! edit, and plan changes against a remote JSON tree.
//!
//! - [`Console`] - connection, tree snapshot, view state, and node editor
//! - [`Command`]/[`Output`] - the store instruction set and its results
//! - [`PlanSession`] - the action plan lifecycle (draft, propose, confirm)
//! - [`ConsoleConfig`] - `canopy.toml`
//!
//! ## Quick Start
//!
//! ```text
//! use canopy_executor::Console;
//!
//! let mut console = Console::default();
//! console.connect_url("my-project", None)?;
//!
//! for row in console.visible_nodes() {
//!     println!("{}{}", "  ".repeat(row.depth), row.key.unwrap_or_default());
//! }
//!
//! console.commit_edit(&"settings/theme".parse()?, "dark")?;
//! ```
//!
//! ## Mutations
//!
//! | Flow | Store operation |
//! |------|-----------------|
//! | inline edit | Replace at the node |
//! | add child | Replace at `path/key` |
//! | delete subtree | Remove (after confirmation) |
//! | confirmed plan | one operation per action, in order |
//!
//! Every successful mutation re-reads the root into the snapshot.

#![warn(missing_docs)]

mod command;
mod config;
mod console;
mod editor;
mod error;
mod executor;
mod output;
mod plan;
mod session;

pub use command::Command;
pub use config::{ConsoleConfig, ModelConfig, StoreConfig, ViewConfig, CONFIG_FILE_NAME};
pub use console::Console;
pub use editor::PendingDelete;
pub use error::Error;
pub use executor::Executor;
pub use output::Output;
pub use plan::{execute_plan, PlanReport};
pub use session::{PlanSession, PlanState};

/// Result type for executor operations
pub type Result<T> = std::result::Result<T, Error>;
