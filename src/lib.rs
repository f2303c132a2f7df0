//! Canopy - console for a remote JSON tree
//!
//! Canopy browses, edits, and plans changes against a tree-shaped JSON
//! store reached over REST. Every node is addressed by a slash-separated
//! path, and every change is one of three operations on that path:
//! Replace, Merge, or Remove.
//!
//! # Quick Start
//!
//! ```ignore
//! use canopy::{Console, TreePath};
//!
//! let mut console = Console::default();
//! console.connect_url("my-project", None)?;
//!
//! let theme: TreePath = "settings/theme".parse()?;
//! console.commit_edit(&theme, "dark")?;
//! ```
//!
//! # Architecture
//!
//! | Crate | Role |
//! |-------|------|
//! | `canopy-core` | tree values, paths, actions, view state |
//! | `canopy-store` | REST and in-memory stores |
//! | `canopy-intelligence` | instruction → action plan |
//! | `canopy-executor` | console, commands, plan lifecycle, config |
//!
//! Only the executor API and the core data types are re-exported here.

// Re-export the public API from canopy-executor
pub use canopy_executor::*;

pub use canopy_core::{Action, ActionKind, ActionPlan, TreePath, TreeValue, TreeView, VisibleNode};
pub use canopy_intelligence::{ApiPlanner, PlanContext, PlanGenerator, PlanRequest};
pub use canopy_store::{MemoryStore, RestStore, TreeStore};
