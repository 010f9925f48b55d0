//! Stratum - Layer Contribution & Cache Avoidance
//!
//! Decides deterministically whether an on-disk layer (a directory of
//! installed build content plus a metadata record) can be reused or must
//! be wiped and rebuilt, with consistent status reporting and provenance
//! recording into a build plan.

pub mod dependency;
pub mod error;
pub mod layer;
pub mod plan;
pub mod ui;

pub use error::{BoxedError, StratumError, StratumResult};
