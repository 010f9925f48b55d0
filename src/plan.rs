//! Build plan provenance records
//!
//! The plan is a caller-owned, ordered record of what was (or would be)
//! contributed. Contributors append to it at construction time, independent
//! of the later cache decision; nothing in this crate removes or reorders
//! entries.

use serde::{Deserialize, Serialize};

/// Ordered sequence of contribution provenance records
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BuildPlan {
    /// Entries in append order
    #[serde(default)]
    pub entries: Vec<PlanEntry>,
}

/// A single provenance record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanEntry {
    /// What was contributed (dependency id or helper file name)
    pub name: String,

    /// Version of the contribution
    pub version: String,

    /// Descriptor details (uri, sha256, stacks, licenses, ...)
    #[serde(default)]
    pub metadata: toml::Table,
}

impl BuildPlan {
    /// Create an empty plan
    pub fn new() -> Self {
        Self::default()
    }
}
