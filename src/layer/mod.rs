//! Layer contribution system
//!
//! A layer is one unit of contributed build content: a directory plus a
//! metadata record describing what produced it. The generic contributor
//! compares that record against the metadata a rebuild would produce and
//! either reuses the directory untouched or wipes and repopulates it.

pub mod contributor;
pub mod dependency;
pub mod helper;

pub use contributor::LayerContributor;
pub use dependency::{DependencyLayerContributor, DependencyLayerMetadata, LicenseMetadata};
pub use helper::{HelperInfo, HelperLayerContributor, HelperLayerMetadata};

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A layer directory plus its persisted metadata record
///
/// Owned by the host pipeline, which persists `metadata` between builds.
/// Contributors may delete and recreate the directory, and rewrite
/// `metadata` on every successful rebuild.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    /// Directory location of the layer content
    pub path: PathBuf,

    /// Metadata record from the previous contribution, if any
    #[serde(default)]
    pub metadata: toml::Table,
}

impl Layer {
    /// Create a layer with no prior metadata
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            metadata: toml::Table::new(),
        }
    }
}
