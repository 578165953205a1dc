//! Hierarchical point clustering.
//!
//! [`ClusterIndex`] holds one level per zoom. Each level is a flat node list
//! with a k-d tree over it; clusters formed at a level record which nodes of the
//! level above they were merged from, which is all navigation needs.

pub mod index;
pub mod navigation;
pub mod node;
pub mod query;

pub use index::{ClusterIndex, IndexStats, LevelStats};
pub use navigation::Leaves;
pub use node::{ClusterDescriptor, ClusterId, abbreviate_count};
pub use query::{Feature, PointFeature};
