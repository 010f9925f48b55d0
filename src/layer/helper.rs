//! Helper binary layer contribution
//!
//! Structurally the same adaptation as the dependency contributor, but the
//! artifact source is a local file rather than a remote cache.

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::{Path, PathBuf};

use crate::error::{StratumError, StratumResult};
use crate::layer::{Layer, LayerContributor};
use crate::plan::{BuildPlan, PlanEntry};
use crate::ui::Logger;

/// Descriptor of the buildpack shipping the helper binary
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HelperInfo {
    /// Buildpack identifier
    pub id: String,

    /// Buildpack name
    pub name: String,

    /// Buildpack version
    pub version: String,

    /// Whether the helper runs with a cleared environment
    pub clear_environment: bool,
}

/// Canonical metadata recorded for a helper layer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HelperLayerMetadata {
    pub id: String,
    pub name: String,
    pub version: String,
    #[serde(rename = "clear-env")]
    pub clear_env: bool,
}

/// Contributes a local helper binary to a layer
#[derive(Debug)]
pub struct HelperLayerContributor {
    /// Path to the helper binary
    pub path: PathBuf,

    /// The contained contributor used for the actual contribution
    pub contributor: LayerContributor<HelperLayerMetadata>,
}

impl HelperLayerContributor {
    /// Create a contributor and record the helper in the build plan
    ///
    /// The plan entry is keyed by the helper's file name and appended
    /// unconditionally, independent of the later cache decision.
    pub fn new(
        path: impl Into<PathBuf>,
        name: impl Into<String>,
        info: &HelperInfo,
        layer: Layer,
        plan: &mut BuildPlan,
    ) -> Self {
        let path = path.into();

        let mut metadata = toml::Table::new();
        metadata.insert("id".to_string(), toml::Value::String(info.id.clone()));
        metadata.insert(
            "version".to_string(),
            toml::Value::String(info.version.clone()),
        );
        plan.entries.push(PlanEntry {
            name: file_name(&path),
            version: info.version.clone(),
            metadata,
        });

        let expected = HelperLayerMetadata {
            id: info.id.clone(),
            name: info.name.clone(),
            version: info.version.clone(),
            clear_env: info.clear_environment,
        };

        let display = format!("{} {}", name.into(), info.version);

        Self {
            path,
            contributor: LayerContributor::new(display, expected, layer),
        }
    }

    /// Replace the status sink of the contained contributor
    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.contributor = self.contributor.with_logger(logger);
        self
    }

    /// Reuse the layer or rebuild it from the helper binary
    pub fn contribute<F>(&mut self, build: F) -> StratumResult<Layer>
    where
        F: FnOnce(File, Layer) -> StratumResult<Layer>,
    {
        let path = &self.path;

        self.contributor.contribute(|layer| {
            let artifact = File::open(path).map_err(|e| StratumError::ArtifactOpen {
                path: path.clone(),
                source: e,
            })?;

            build(artifact, layer)
        })
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
