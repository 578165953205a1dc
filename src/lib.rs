//! Multi-resolution point clustering for interactive maps, plus viewport fitting.
//!
//! ```rust
//! use spatio_cluster::{BoundingBox2D, Clusterer, GeoPoint};
//!
//! let mut clusterer = Clusterer::default();
//! clusterer.load(vec![
//!     GeoPoint::new("a", 0.0, 0.0, "first"),
//!     GeoPoint::new("b", 0.001, 0.001, "second"),
//!     GeoPoint::new("c", 50.0, 50.0, "third"),
//! ])?;
//!
//! let world = BoundingBox2D::world();
//! let top = clusterer.get_clusters(&world, 0.0);
//! assert_eq!(top.len(), 2);
//!
//! let cluster = top.iter().find(|f| f.is_cluster()).unwrap();
//! let zoom = clusterer.get_cluster_expansion_zoom(cluster.id())?;
//! assert_eq!(clusterer.get_clusters(&world, zoom as f64).len(), 3);
//! # Ok::<(), spatio_cluster::ClusterError>(())
//! ```

pub mod builder;
pub mod cluster;
pub mod compute;
pub mod config;
pub mod engine;
pub mod error;
pub mod geocoding;
pub mod render;
pub mod store;

pub use builder::ClustererBuilder;
pub use engine::Clusterer;
#[cfg(feature = "sync")]
pub use engine::SyncClusterer;
pub use error::{ClusterError, Result};

pub use cluster::{
    ClusterDescriptor, ClusterId, ClusterIndex, Feature, IndexStats, Leaves, LevelStats,
    PointFeature, abbreviate_count,
};
pub use compute::fit::fit_zoom;
pub use compute::validation;
pub use config::{BoundingBox2D, ClusterConfig, FitOptions, GeoPoint};
pub use store::PointStore;

#[cfg(feature = "geojson")]
pub use compute::geojson::{features_to_feature_collection, features_to_geojson};

pub use geo::{Point, Rect};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common imports
pub mod prelude {

    pub use crate::{ClusterError, Clusterer, ClustererBuilder, Result};

    pub use crate::{BoundingBox2D, ClusterConfig, FitOptions, GeoPoint};

    pub use crate::{ClusterId, Feature, fit_zoom};

    #[cfg(feature = "sync")]
    pub use crate::SyncClusterer;

    pub use geo::{Point, Rect};
}
