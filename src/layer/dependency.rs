//! Dependency layer contribution
//!
//! Adapts a `BuildpackDependency` plus an artifact cache into the generic
//! contributor contract: canonical metadata is derived from the descriptor,
//! provenance is recorded in the build plan at construction time, and the
//! artifact stream is fetched only inside the rebuild branch.

use serde::{Deserialize, Serialize};
use std::fs::File;

use crate::dependency::{BuildpackDependency, DependencyCache};
use crate::error::{StratumError, StratumResult};
use crate::layer::{Layer, LayerContributor};
use crate::plan::{BuildPlan, PlanEntry};
use crate::ui::Logger;

/// Canonical metadata recorded for a dependency layer
///
/// The field set is the cache key: any single-field difference invalidates
/// the layer. Licenses are order-sensitive. Missing fields decode to their
/// defaults so records written by an older field set compare unequal
/// instead of failing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DependencyLayerMetadata {
    pub id: String,
    pub name: String,
    pub version: String,
    pub uri: String,
    pub sha256: String,
    pub stacks: Vec<String>,
    pub licenses: Vec<LicenseMetadata>,
}

/// A license flattened into its two canonical fields
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LicenseMetadata {
    #[serde(rename = "type")]
    pub license_type: String,
    pub uri: String,
}

/// Contributes a fetched dependency artifact to a layer
#[derive(Debug)]
pub struct DependencyLayerContributor<C> {
    /// The dependency being contributed
    pub dependency: BuildpackDependency,

    /// Cache resolving the dependency to an artifact stream
    pub cache: C,

    /// The contained contributor used for the actual contribution
    pub contributor: LayerContributor<DependencyLayerMetadata>,
}

impl<C: DependencyCache> DependencyLayerContributor<C> {
    /// Create a contributor and record the dependency in the build plan
    ///
    /// The plan entry is appended here, unconditionally: provenance is
    /// independent of the later cache decision.
    pub fn new(
        dependency: BuildpackDependency,
        cache: C,
        layer: Layer,
        plan: &mut BuildPlan,
    ) -> Self {
        plan.entries.push(PlanEntry {
            name: dependency.id.clone(),
            version: dependency.version.clone(),
            metadata: plan_metadata(&dependency),
        });

        let expected = DependencyLayerMetadata {
            id: dependency.id.clone(),
            name: dependency.name.clone(),
            version: dependency.version.clone(),
            uri: dependency.uri.clone(),
            sha256: dependency.sha256.clone(),
            stacks: dependency.stacks.clone(),
            licenses: dependency
                .licenses
                .iter()
                .map(|l| LicenseMetadata {
                    license_type: l.license_type.clone(),
                    uri: l.uri.clone(),
                })
                .collect(),
        };

        let name = format!("{} {}", dependency.name, dependency.version);

        Self {
            dependency,
            cache,
            contributor: LayerContributor::new(name, expected, layer),
        }
    }

    /// Replace the status sink of the contained contributor
    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.contributor = self.contributor.with_logger(logger);
        self
    }

    /// Reuse the layer or rebuild it from the fetched artifact
    ///
    /// The artifact is fetched only after the directory has been cleared; a
    /// fetch failure therefore leaves an empty layer whose metadata was
    /// never rewritten, so the next invocation is again a miss and retries.
    pub fn contribute<F>(&mut self, build: F) -> StratumResult<Layer>
    where
        F: FnOnce(File, Layer) -> StratumResult<Layer>,
    {
        let dependency = &self.dependency;
        let cache = &self.cache;

        self.contributor.contribute(|layer| {
            let artifact =
                cache
                    .artifact(dependency)
                    .map_err(|e| StratumError::ArtifactFetch {
                        id: dependency.id.clone(),
                        source: e,
                    })?;

            build(artifact, layer)
        })
    }
}

/// Descriptor details recorded in the build plan
fn plan_metadata(dependency: &BuildpackDependency) -> toml::Table {
    let mut metadata = toml::Table::new();
    metadata.insert(
        "name".to_string(),
        toml::Value::String(dependency.name.clone()),
    );
    metadata.insert(
        "uri".to_string(),
        toml::Value::String(dependency.uri.clone()),
    );
    metadata.insert(
        "sha256".to_string(),
        toml::Value::String(dependency.sha256.clone()),
    );
    metadata.insert(
        "stacks".to_string(),
        toml::Value::Array(
            dependency
                .stacks
                .iter()
                .map(|s| toml::Value::String(s.clone()))
                .collect(),
        ),
    );
    metadata.insert(
        "licenses".to_string(),
        toml::Value::Array(
            dependency
                .licenses
                .iter()
                .map(|l| {
                    let mut license = toml::Table::new();
                    license.insert(
                        "type".to_string(),
                        toml::Value::String(l.license_type.clone()),
                    );
                    license.insert("uri".to_string(), toml::Value::String(l.uri.clone()));
                    toml::Value::Table(license)
                })
                .collect(),
        ),
    );
    metadata
}
