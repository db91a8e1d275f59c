//! Strongly-typed identifiers for plan entities
//!
//! Node identifiers are uuid-backed but wrapped in a newtype so graph
//! handles cannot be confused with arbitrary strings. Identifiers read
//! from an injected YAML tree are adopted verbatim.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a plan node
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(String);

impl NodeId {
    /// Generate a fresh node id
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Adopt an existing identifier (e.g. one injected into a YAML tree)
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}
