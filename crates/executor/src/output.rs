//! Output enum for command execution results.
//!
//! Every command produces exactly one output type. This mapping is deterministic:
//! the same command always produces the same output variant.

use serde::{Deserialize, Serialize};

use canopy_core::TreeValue;

/// Successful command execution results.
///
/// Each [`Command`](crate::Command) variant maps to exactly one `Output` variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Output {
    /// No return value (write, merge, remove)
    Unit,

    /// A subtree (null when empty)
    Value(TreeValue),

    /// Keys directly under a path
    Keys(Vec<String>),

    /// Probe succeeded
    Connected {
        /// Base URL, or `memory:` for the in-memory store
        location: String,
    },
}
