//! Store Client Tests
//!
//! Tests for the canopy-store crate:
//! - RestStore wire contract (methods, paths, query parameters, statuses)
//! - MemoryStore Replace/Merge/Remove semantics
//! - URL normalization and endpoint encoding properties

#[path = "../common/mod.rs"]
mod common;

mod memory_semantics;
mod rest_wire;
