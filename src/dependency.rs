//! Dependency descriptors and the artifact cache collaborator
//!
//! A `BuildpackDependency` describes a fetchable artifact. How the artifact
//! is downloaded and checksum-verified is owned by the `DependencyCache`
//! implementation, not this crate.

use serde::{Deserialize, Serialize};
use std::fs::File;

use crate::error::BoxedError;

/// Immutable descriptor of a fetchable artifact
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildpackDependency {
    /// Stable identifier (e.g., "node")
    pub id: String,

    /// Human-readable name (e.g., "Node.js")
    pub name: String,

    /// Version of the artifact
    pub version: String,

    /// Where the artifact is fetched from
    pub uri: String,

    /// Expected SHA256 of the artifact (verified by the cache, not here)
    pub sha256: String,

    /// Stacks the artifact is valid for
    pub stacks: Vec<String>,

    /// Licenses in a stable, caller-defined order
    pub licenses: Vec<BuildpackLicense>,
}

/// A single license attached to a dependency
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildpackLicense {
    /// SPDX identifier or similar
    #[serde(rename = "type")]
    pub license_type: String,

    /// Where the license text lives
    pub uri: String,
}

/// Artifact cache collaborator
///
/// Resolves a dependency descriptor to a readable artifact stream. Fetching,
/// local caching, and SHA256 verification all live behind this trait. The
/// returned handle is closed by RAII on every exit path of the build
/// callback it is handed to.
pub trait DependencyCache {
    /// Get the artifact backing `dependency`, opened for reading
    fn artifact(&self, dependency: &BuildpackDependency) -> Result<File, BoxedError>;
}
