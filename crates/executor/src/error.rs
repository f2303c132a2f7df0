//! Error types for console operations.
//!
//! Every failure that reaches the user is one [`Error`] variant. Lower
//! crates keep their own error types (`StoreError`, `PathError`,
//! `ActionError`, `PlanError`); they convert into this one with `From`, so
//! handlers can use `?` throughout.
//!
//! Errors are:
//! - **Structured**: Each variant has typed fields for error details
//! - **Serializable**: Can be converted to/from JSON for `--json` output

use serde::{Deserialize, Serialize};

use canopy_core::{ActionError, PathError};
use canopy_intelligence::PlanError;
use canopy_store::StoreError;

/// Console errors.
///
/// # Categories
///
/// | Category | Variants | Description |
/// |----------|----------|-------------|
/// | Store | `PermissionDenied`, `NotFound`, `MalformedRequest`, `RequestFailed`, `InvalidResponse` | Store refused or garbled the request |
/// | Transport | `Timeout`, `NetworkFailure` | Store unreachable |
/// | Plan | `InvalidPlanResponse`, `ModelError`, `PartialPlanExecution` | Generator or engine failure |
/// | Validation | `InvalidPath`, `InvalidInput` | Bad input |
/// | State | `InvalidState`, `NotConnected` | Operation not legal right now |
/// | System | `Config` | Configuration file problems |
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, thiserror::Error)]
pub enum Error {
    // ==================== Store ====================
    /// Refused by the store's security rules
    #[error("permission denied at {path}")]
    PermissionDenied {
        /// Path the store refused
        path: String,
    },

    /// Nothing at this address
    #[error("not found: {path}")]
    NotFound {
        /// Missing path, or the base URL when the database itself is missing
        path: String,
    },

    /// The store rejected the request, or the URL is unusable
    #[error("malformed request: {reason}")]
    MalformedRequest {
        /// Store error text or URL problem
        reason: String,
    },

    /// Any other non-success status
    #[error("request failed with status {status}: {reason}")]
    RequestFailed {
        /// HTTP status code
        status: u16,
        /// Store error text, possibly empty
        reason: String,
    },

    /// A success response whose body is not JSON
    #[error("invalid response: {reason}")]
    InvalidResponse {
        /// Why the body was rejected
        reason: String,
    },

    // ==================== Transport ====================
    /// No response within the deadline
    #[error("request timed out after {after_ms} ms")]
    Timeout {
        /// Deadline that expired, in milliseconds
        after_ms: u64,
    },

    /// Connection-level failure
    #[error("network failure: {reason}")]
    NetworkFailure {
        /// Transport error text
        reason: String,
    },

    // ==================== Plan ====================
    /// Generator answered, but not with a valid plan
    #[error("invalid plan response: {reason}")]
    InvalidPlanResponse {
        /// What was wrong with the response
        reason: String,
    },

    /// Generator endpoint failed
    #[error("model error: {reason}")]
    ModelError {
        /// Endpoint error text
        reason: String,
    },

    /// An action failed; earlier actions stay applied
    #[error("plan stopped after {completed} of {total} actions: {source}")]
    PartialPlanExecution {
        /// Actions applied before the failure
        completed: usize,
        /// Actions in the plan
        total: usize,
        /// Failure of the action that stopped the plan
        source: Box<Error>,
    },

    // ==================== Validation ====================
    /// Invalid tree path
    #[error("invalid path: {reason}")]
    InvalidPath {
        /// Parse failure
        reason: String,
    },

    /// Invalid input
    #[error("invalid input: {reason}")]
    InvalidInput {
        /// What was rejected
        reason: String,
    },

    // ==================== State ====================
    /// Operation not legal in the current state
    #[error("invalid state: {reason}")]
    InvalidState {
        /// Why the operation is not allowed now
        reason: String,
    },

    /// No store connected
    #[error("not connected (use 'connect <url>' first)")]
    NotConnected,

    // ==================== System ====================
    /// Configuration file could not be read, parsed or written
    #[error("config error: {reason}")]
    Config {
        /// File and parse details
        reason: String,
    },
}

impl Error {
    /// Shorthand for [`Error::InvalidInput`]
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Error::InvalidInput {
            reason: reason.into(),
        }
    }

    /// Shorthand for [`Error::InvalidState`]
    pub fn invalid_state(reason: impl Into<String>) -> Self {
        Error::InvalidState {
            reason: reason.into(),
        }
    }
}

impl From<StoreError> for Error {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::PermissionDenied { path } => Error::PermissionDenied { path },
            StoreError::NotFound { path } => Error::NotFound { path },
            StoreError::MalformedRequest { reason } => Error::MalformedRequest { reason },
            StoreError::Timeout { after_ms } => Error::Timeout { after_ms },
            StoreError::NetworkFailure { reason } => Error::NetworkFailure { reason },
            StoreError::RequestFailed { status, reason } => Error::RequestFailed { status, reason },
            StoreError::InvalidResponse { reason } => Error::InvalidResponse { reason },
        }
    }
}

impl From<PathError> for Error {
    fn from(e: PathError) -> Self {
        Error::InvalidPath {
            reason: e.to_string(),
        }
    }
}

impl From<ActionError> for Error {
    fn from(e: ActionError) -> Self {
        match e {
            ActionError::InvalidPath(inner) => inner.into(),
            slash @ ActionError::ExtraLeadingSlash(_) => Error::InvalidPath {
                reason: slash.to_string(),
            },
            other => Error::InvalidInput {
                reason: other.to_string(),
            },
        }
    }
}

impl From<PlanError> for Error {
    fn from(e: PlanError) -> Self {
        match e {
            PlanError::Network(reason) => Error::NetworkFailure { reason },
            PlanError::Timeout => Error::ModelError {
                reason: "model request timed out".to_string(),
            },
            PlanError::Model(reason) => Error::ModelError { reason },
            PlanError::InvalidResponse(reason) => Error::InvalidPlanResponse { reason },
        }
    }
}
