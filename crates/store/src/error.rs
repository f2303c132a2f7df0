//! Store error types

use canopy_core::TreePath;
use thiserror::Error;

/// Errors returned by [`TreeStore`](crate::TreeStore) implementations
///
/// Each variant maps to one failure class of the store protocol; nothing is
/// retried, so every error reaches the caller as-is.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Access refused by the store's security rules (HTTP 401)
    #[error("permission denied at {path}")]
    PermissionDenied {
        /// Path (or database URL for a probe) that was refused
        path: String,
    },

    /// Nothing answers at this address (HTTP 404)
    #[error("not found: {path}")]
    NotFound {
        /// Path, or the database URL when probing
        path: String,
    },

    /// The store rejected the request shape, or the URL is unusable (HTTP 400)
    #[error("malformed request: {reason}")]
    MalformedRequest {
        /// Explanation from the store or the client
        reason: String,
    },

    /// No response within the deadline
    #[error("request timed out after {after_ms} ms")]
    Timeout {
        /// The deadline that expired
        after_ms: u64,
    },

    /// Connection-level failure (DNS, refused, reset)
    #[error("network failure: {reason}")]
    NetworkFailure {
        /// Transport error text
        reason: String,
    },

    /// Any other non-success status
    #[error("request failed with status {status}: {reason}")]
    RequestFailed {
        /// HTTP status code
        status: u16,
        /// Error text from the response body
        reason: String,
    },

    /// A success response whose body is not JSON
    #[error("invalid response: {reason}")]
    InvalidResponse {
        /// Parse error
        reason: String,
    },
}

/// Render a path for error messages; the root shows as `/`.
pub fn display_path(path: &TreePath) -> String {
    if path.is_root() {
        "/".to_string()
    } else {
        path.to_path_string()
    }
}
