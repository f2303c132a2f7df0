//! REST store client
//!
//! Talks to the remote tree over HTTPS with a blocking `ureq` agent:
//!
//! | Operation | Request |
//! |-----------|---------|
//! | read | `GET {endpoint}` |
//! | read_shallow / probe | `GET {endpoint}?shallow=true` |
//! | write | `PUT {endpoint}` with a JSON body |
//! | merge | `PATCH {endpoint}` with a JSON body |
//! | remove | `DELETE {endpoint}` |
//!
//! Status codes are classified by hand (the agent never turns a status into
//! an error). Nothing is retried.

use std::time::Duration;

use canopy_core::{TreePath, TreeValue};

use crate::client::TreeStore;
use crate::connection::Connection;
use crate::endpoint::endpoint_url;
use crate::error::{display_path, StoreError};
use crate::url::normalize_base_url;

/// Hard deadline for the connectivity probe
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(8);

/// Default deadline for reads and mutations
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Largest response body accepted (a full-tree read can be large)
const MAX_BODY_BYTES: u64 = 512 * 1024 * 1024;

#[derive(Debug, Clone, Copy)]
enum Method {
    Get,
    Put,
    Patch,
    Delete,
}

impl Method {
    fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

/// Store client for the remote tree
pub struct RestStore {
    base_url: String,
    auth: Option<String>,
    timeout: Duration,
    agent: ureq::Agent,
    probe_agent: ureq::Agent,
}

impl RestStore {
    /// Create a client; `base_url` is normalized first.
    pub fn new(base_url: &str, auth: Option<&str>) -> Result<Self, StoreError> {
        let base_url = normalize_base_url(base_url)?;
        Ok(RestStore {
            base_url,
            auth: auth.filter(|t| !t.is_empty()).map(str::to_string),
            timeout: DEFAULT_TIMEOUT,
            agent: build_agent(DEFAULT_TIMEOUT),
            probe_agent: build_agent(PROBE_TIMEOUT),
        })
    }

    /// Create a client for an already-normalized connection
    pub fn from_connection(connection: &Connection) -> Self {
        RestStore {
            base_url: connection.base_url().to_string(),
            auth: connection.auth().map(str::to_string),
            timeout: DEFAULT_TIMEOUT,
            agent: build_agent(DEFAULT_TIMEOUT),
            probe_agent: build_agent(PROBE_TIMEOUT),
        }
    }

    /// Override the deadline for reads and mutations.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self.agent = build_agent(timeout);
        self
    }

    /// Normalized base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn send(
        &self,
        agent: &ureq::Agent,
        timeout: Duration,
        method: Method,
        path: &TreePath,
        body: Option<&TreeValue>,
        shallow: bool,
    ) -> Result<String, StoreError> {
        let url = endpoint_url(&self.base_url, path);
        tracing::debug!(
            target: "canopy::store",
            method = method.as_str(),
            url = %url,
            shallow,
            "request"
        );

        let mut query: Vec<(&str, &str)> = Vec::new();
        if shallow {
            query.push(("shallow", "true"));
        }
        if let Some(token) = &self.auth {
            query.push(("auth", token.as_str()));
        }

        let result = match method {
            Method::Get => with_query(agent.get(&url), &query).call(),
            Method::Delete => with_query(agent.delete(&url), &query).call(),
            Method::Put | Method::Patch => {
                let bytes = body
                    .map(|v| v.to_json_string())
                    .unwrap_or_else(|| "null".to_string());
                let builder = match method {
                    Method::Put => agent.put(&url),
                    _ => agent.patch(&url),
                };
                with_query(builder, &query)
                    .header("Content-Type", "application/json")
                    .send(bytes.as_bytes())
            }
        };

        let mut response = result.map_err(|e| transport_error(e, timeout))?;
        let status = response.status().as_u16();
        let text = response
            .body_mut()
            .with_config()
            .limit(MAX_BODY_BYTES)
            .read_to_string()
            .map_err(|e| transport_error(e, timeout))?;

        tracing::debug!(
            target: "canopy::store",
            method = method.as_str(),
            status,
            bytes = text.len(),
            "response"
        );

        if (200..300).contains(&status) {
            Ok(text)
        } else {
            Err(classify_status(status, &display_path(path), &text))
        }
    }

    fn get(&self, path: &TreePath, shallow: bool) -> Result<TreeValue, StoreError> {
        let text = self.send(&self.agent, self.timeout, Method::Get, path, None, shallow)?;
        parse_body(&text)
    }
}

impl TreeStore for RestStore {
    fn read(&self, path: &TreePath) -> Result<TreeValue, StoreError> {
        self.get(path, false)
    }

    fn read_shallow(&self, path: &TreePath) -> Result<TreeValue, StoreError> {
        self.get(path, true)
    }

    fn write(&self, path: &TreePath, value: &TreeValue) -> Result<(), StoreError> {
        self.send(&self.agent, self.timeout, Method::Put, path, Some(value), false)
            .map(|_| ())
    }

    fn merge(&self, path: &TreePath, value: &TreeValue) -> Result<(), StoreError> {
        self.send(&self.agent, self.timeout, Method::Patch, path, Some(value), false)
            .map(|_| ())
    }

    fn remove(&self, path: &TreePath) -> Result<(), StoreError> {
        self.send(&self.agent, self.timeout, Method::Delete, path, None, false)
            .map(|_| ())
    }

    fn probe(&self) -> Result<(), StoreError> {
        let root = TreePath::root();
        match self.send(&self.probe_agent, PROBE_TIMEOUT, Method::Get, &root, None, true) {
            Ok(text) => parse_body(&text).map(|_| ()),
            // A missing root means the database itself does not exist
            Err(StoreError::NotFound { .. }) => Err(StoreError::NotFound {
                path: self.base_url.clone(),
            }),
            Err(e) => Err(e),
        }
    }

    fn location(&self) -> String {
        self.base_url.clone()
    }
}

fn build_agent(timeout: Duration) -> ureq::Agent {
    let config = ureq::Agent::config_builder()
        .timeout_global(Some(timeout))
        .http_status_as_error(false)
        .build();
    ureq::Agent::new_with_config(config)
}

fn with_query<B>(mut builder: ureq::RequestBuilder<B>, query: &[(&str, &str)]) -> ureq::RequestBuilder<B> {
    for (key, value) in query {
        builder = builder.query(*key, *value);
    }
    builder
}

/// Empty body and `null` both mean nothing is stored.
fn parse_body(text: &str) -> Result<TreeValue, StoreError> {
    if text.trim().is_empty() {
        return Ok(TreeValue::null());
    }
    text.parse::<TreeValue>()
        .map_err(|e| StoreError::InvalidResponse {
            reason: e.to_string(),
        })
}

/// Map a non-success status to an error.
pub(crate) fn classify_status(status: u16, path: &str, body: &str) -> StoreError {
    match status {
        401 | 403 => StoreError::PermissionDenied {
            path: path.to_string(),
        },
        404 => StoreError::NotFound {
            path: path.to_string(),
        },
        400 => StoreError::MalformedRequest {
            reason: error_text(body).unwrap_or_else(|| format!("bad request at {}", path)),
        },
        _ => StoreError::RequestFailed {
            status,
            reason: error_text(body).unwrap_or_default(),
        },
    }
}

/// The store reports errors as `{"error": "..."}`; fall back to the raw body.
fn error_text(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }
    match serde_json::from_str::<serde_json::Value>(trimmed) {
        Ok(json) => json
            .get("error")
            .and_then(|e| e.as_str())
            .map(str::to_string)
            .or_else(|| Some(trimmed.to_string())),
        Err(_) => Some(trimmed.chars().take(200).collect()),
    }
}

fn transport_error(e: ureq::Error, timeout: Duration) -> StoreError {
    match e {
        ureq::Error::Timeout(_) => StoreError::Timeout {
            after_ms: timeout.as_millis() as u64,
        },
        ureq::Error::BadUri(reason) => StoreError::MalformedRequest { reason },
        other => {
            let reason = other.to_string();
            if reason.contains("timed out") || reason.contains("Timeout") {
                StoreError::Timeout {
                    after_ms: timeout.as_millis() as u64,
                }
            } else {
                StoreError::NetworkFailure { reason }
            }
        }
    }
}
