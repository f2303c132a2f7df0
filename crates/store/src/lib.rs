//! Store client for Canopy
//!
//! Everything that talks to the document store lives here:
//! - `normalize_base_url`: connection string to base URL
//! - `endpoint_url`: tree path to REST endpoint
//! - `TreeStore`: the five store primitives plus the probe
//! - `RestStore`: the remote store over HTTPS
//! - `MemoryStore`: an in-process store with the same semantics
//! - `Connection`: the session's normalized connection

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod client;
pub mod connection;
pub mod endpoint;
pub mod error;
pub mod memory;
pub mod rest;
pub mod url;

pub use client::{shallow_of, TreeStore};
pub use connection::{Connection, MEMORY_LOCATION};
pub use endpoint::{encode_segment, endpoint_url};
pub use error::{display_path, StoreError};
pub use memory::MemoryStore;
pub use rest::{RestStore, DEFAULT_TIMEOUT, PROBE_TIMEOUT};
pub use url::normalize_base_url;
