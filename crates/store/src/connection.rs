//! Session connection descriptor

use crate::error::StoreError;
use crate::url::normalize_base_url;

/// Location used by the in-memory store
pub const MEMORY_LOCATION: &str = "memory:";

/// Where the session points and whether the probe succeeded
///
/// Normalized once on creation and dropped on disconnect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    base_url: String,
    auth: Option<String>,
    connected: bool,
}

impl Connection {
    /// Normalize `input` into a connection that has not been probed yet
    pub fn new(input: &str, auth: Option<&str>) -> Result<Self, StoreError> {
        Ok(Connection {
            base_url: normalize_base_url(input)?,
            auth: auth.filter(|t| !t.is_empty()).map(str::to_string),
            connected: false,
        })
    }

    /// Connection for an in-memory session
    pub fn memory() -> Self {
        Connection {
            base_url: MEMORY_LOCATION.to_string(),
            auth: None,
            connected: false,
        }
    }

    /// Normalized base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Access token, if any
    pub fn auth(&self) -> Option<&str> {
        self.auth.as_deref()
    }

    /// Probe succeeded
    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Record the probe result
    pub fn mark_connected(&mut self) {
        self.connected = true;
    }
}
