//! Marker render pass.
//!
//! Turns query results into markers for a map layer. Clusters are rendered by a
//! caller-supplied callback and anchored so a [`MARKER_SIZE`] pixel marker sits
//! centered above its position; points pass their payload through untouched.

use crate::cluster::{ClusterDescriptor, Feature};
use crate::config::GeoPoint;

/// Pixel size of a cluster marker.
pub const MARKER_SIZE: f64 = 28.0;

/// One marker to place on the map.
#[derive(Debug, Clone, PartialEq)]
pub enum Marker<'a, M, P> {
    Cluster {
        /// Stable key, `cluster-{id}`
        key: String,
        longitude: f64,
        latitude: f64,
        offset_left: f64,
        offset_top: f64,
        element: M,
    },
    Point(&'a GeoPoint<P>),
}

impl<M, P> Marker<'_, M, P> {
    pub fn is_cluster(&self) -> bool {
        matches!(self, Marker::Cluster { .. })
    }
}

/// Key under which a cluster marker is rendered.
pub fn cluster_key(cluster: &ClusterDescriptor) -> String {
    format!("cluster-{}", cluster.id)
}

/// Build markers for `features`, rendering each cluster with `element`.
///
/// ```rust
/// use spatio_cluster::render::{Marker, render_markers};
/// use spatio_cluster::{BoundingBox2D, Clusterer, GeoPoint};
///
/// let mut clusterer = Clusterer::default();
/// clusterer.load(vec![
///     GeoPoint::new("a", 0.0, 0.0, "cafe"),
///     GeoPoint::new("b", 0.001, 0.0, "bakery"),
///     GeoPoint::new("c", 60.0, 10.0, "museum"),
/// ])?;
///
/// let features = clusterer.get_clusters(&BoundingBox2D::world(), 0.0);
/// let markers = render_markers(&features, |c| format!("({})", c.point_count_abbreviated));
///
/// for marker in &markers {
///     match marker {
///         Marker::Cluster { element, .. } => assert_eq!(element, "(2)"),
///         Marker::Point(point) => assert_eq!(point.payload, "museum"),
///     }
/// }
/// # Ok::<(), spatio_cluster::ClusterError>(())
/// ```
pub fn render_markers<'a, M, P>(
    features: &[Feature<'a, P>],
    mut element: impl FnMut(&ClusterDescriptor) -> M,
) -> Vec<Marker<'a, M, P>> {
    features
        .iter()
        .map(|feature| match feature {
            Feature::Cluster(cluster) => Marker::Cluster {
                key: cluster_key(cluster),
                longitude: cluster.longitude,
                latitude: cluster.latitude,
                offset_left: -MARKER_SIZE / 2.0,
                offset_top: -MARKER_SIZE,
                element: element(cluster),
            },
            Feature::Point(point) => Marker::Point(point.point),
        })
        .collect()
}
