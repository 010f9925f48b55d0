//! Generic reuse-or-rebuild engine
//!
//! The contributor never needs to understand *why* a rebuild is necessary:
//! any difference between the expected metadata and the layer's recorded
//! metadata is sufficient and uniform across all layer kinds. On a miss the
//! directory is replaced wholesale rather than patched, so no stale files
//! survive a metadata change.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io;
use tracing::debug;

use crate::error::{StratumError, StratumResult};
use crate::layer::Layer;
use crate::ui::Logger;

/// Contributes content to a layer, reusing it when its recorded metadata
/// already matches the expected canonical metadata
///
/// `M` is the canonical metadata shape: a declared structure with a fixed
/// field set, compared with `PartialEq` after decoding the layer's record
/// into the same shape. Unknown extra keys in the record are ignored;
/// they are reserved for non-cache-key data.
#[derive(Debug)]
pub struct LayerContributor<M> {
    /// Metadata a rebuild would produce, compared against the layer record
    pub expected: M,

    /// The layer being contributed
    pub layer: Layer,

    /// Display name of the contribution (e.g., "Node.js 14.0.0")
    pub name: String,

    logger: Logger,
}

impl<M> LayerContributor<M>
where
    M: Serialize + DeserializeOwned + PartialEq,
{
    /// Create a contributor reporting status to stdout
    pub fn new(name: impl Into<String>, expected: M, layer: Layer) -> Self {
        Self {
            expected,
            layer,
            name: name.into(),
            logger: Logger::stdout(),
        }
    }

    /// Replace the status sink
    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = logger;
        self
    }

    /// Reuse the layer or wipe and rebuild it via `build`
    ///
    /// On a cache hit the layer is returned untouched and `build` is never
    /// invoked. On a miss the directory is fully cleared and recreated
    /// before `build` runs, and the expected metadata is merged over the
    /// returned layer's record only after `build` succeeds — expected keys
    /// win, keys the build step added survive. A failed build leaves the
    /// record unchanged and the next invocation is again a miss.
    pub fn contribute<F>(&mut self, build: F) -> StratumResult<Layer>
    where
        F: FnOnce(Layer) -> StratumResult<Layer>,
    {
        if self.is_cached()? {
            self.logger.reusing(&self.name);
            debug!(layer = %self.name, "metadata unchanged, reusing existing layer");
            return Ok(self.layer.clone());
        }

        self.logger.contributing(&self.name);
        debug!(
            layer = %self.name,
            path = %self.layer.path.display(),
            "metadata changed, rebuilding layer"
        );

        if let Err(e) = fs::remove_dir_all(&self.layer.path) {
            // A missing directory is a fresh layer, not a failure
            if e.kind() != io::ErrorKind::NotFound {
                return Err(StratumError::LayerRemove {
                    path: self.layer.path.clone(),
                    source: e,
                });
            }
        }

        fs::create_dir_all(&self.layer.path).map_err(|e| StratumError::LayerCreate {
            path: self.layer.path.clone(),
            source: e,
        })?;

        let mut layer = build(self.layer.clone())?;

        let expected =
            toml::Table::try_from(&self.expected).map_err(|e| StratumError::MetadataEncode {
                layer: self.name.clone(),
                source: e,
            })?;
        for (key, value) in expected {
            layer.metadata.insert(key, value);
        }

        Ok(layer)
    }

    /// Decode the layer record into the canonical shape and compare
    ///
    /// An empty record is always a miss and skips the decoder entirely, so
    /// fresh layers work with expected types that have required fields.
    fn is_cached(&self) -> StratumResult<bool> {
        if self.layer.metadata.is_empty() {
            return Ok(false);
        }

        let actual: M =
            self.layer
                .metadata
                .clone()
                .try_into()
                .map_err(|e| StratumError::MetadataDecode {
                    layer: self.name.clone(),
                    source: e,
                })?;

        Ok(actual == self.expected)
    }
}
