//! Error types for Stratum
//!
//! All modules use `StratumResult<T>` as their return type. Every error
//! carries the layer name, dependency id, or path needed to act on it
//! without re-deriving state.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for Stratum operations
pub type StratumResult<T> = Result<T, StratumError>;

/// Boxed error type used for collaborator and caller-supplied failures
pub type BoxedError = Box<dyn std::error::Error + Send + Sync>;

/// All errors that can occur in Stratum
///
/// Every variant is terminal for the current contribution; nothing is
/// retried internally. Retry, if any, belongs to the host pipeline on its
/// next invocation.
#[derive(Error, Debug)]
pub enum StratumError {
    // Metadata errors
    #[error("unable to decode metadata for layer {layer}: {source}")]
    MetadataDecode {
        layer: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("unable to encode metadata for layer {layer}: {source}")]
    MetadataEncode {
        layer: String,
        #[source]
        source: toml::ser::Error,
    },

    // Layer directory errors
    #[error("unable to remove existing layer directory {path}: {source}")]
    LayerRemove {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("unable to create layer directory {path}: {source}")]
    LayerCreate {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    // Artifact errors
    #[error("unable to get dependency {id}: {source}")]
    ArtifactFetch {
        id: String,
        #[source]
        source: BoxedError,
    },

    #[error("unable to open {path}: {source}")]
    ArtifactOpen {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    // Caller build errors, passed through verbatim
    #[error(transparent)]
    Build(BoxedError),
}

impl StratumError {
    /// Wrap a caller-supplied build failure
    pub fn build(source: impl Into<BoxedError>) -> Self {
        Self::Build(source.into())
    }
}
