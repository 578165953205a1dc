//! Compute layer: projection math, viewport fitting and input validation.
//!
//! Nothing in here knows about cluster levels; the cluster module builds on
//! these pieces.

pub mod fit;
#[cfg(feature = "geojson")]
pub mod geojson;
pub mod projection;
pub mod validation;
