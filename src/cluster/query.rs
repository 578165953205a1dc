//! Viewport queries.

use rustc_hash::FxHashSet;

use crate::cluster::index::ClusterIndex;
use crate::cluster::node::{ClusterDescriptor, ClusterId, Level, NodeKind};
use crate::compute::projection::{lat_to_y, lon_to_x};
use crate::config::{BoundingBox2D, GeoPoint};

/// A single feature in query or navigation results.
#[derive(Debug)]
pub enum Feature<'a, P> {
    /// Several points merged into one
    Cluster(ClusterDescriptor),
    /// One original point, unchanged
    Point(PointFeature<'a, P>),
}

/// An original point as it appears in results.
#[derive(Debug)]
pub struct PointFeature<'a, P> {
    pub id: ClusterId,
    pub point: &'a GeoPoint<P>,
}

impl<P> Clone for PointFeature<'_, P> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<P> Copy for PointFeature<'_, P> {}

impl<P> Clone for Feature<'_, P> {
    fn clone(&self) -> Self {
        match self {
            Feature::Cluster(c) => Feature::Cluster(c.clone()),
            Feature::Point(p) => Feature::Point(*p),
        }
    }
}

impl<'a, P> Feature<'a, P> {
    /// Id for follow-up navigation calls.
    pub fn id(&self) -> ClusterId {
        match self {
            Feature::Cluster(c) => c.id,
            Feature::Point(p) => p.id,
        }
    }

    pub fn is_cluster(&self) -> bool {
        matches!(self, Feature::Cluster(_))
    }

    /// Number of original points the feature stands for.
    pub fn point_count(&self) -> usize {
        match self {
            Feature::Cluster(c) => c.point_count,
            Feature::Point(_) => 1,
        }
    }

    pub fn longitude(&self) -> f64 {
        match self {
            Feature::Cluster(c) => c.longitude,
            Feature::Point(p) => p.point.longitude(),
        }
    }

    pub fn latitude(&self) -> f64 {
        match self {
            Feature::Cluster(c) => c.latitude,
            Feature::Point(p) => p.point.latitude(),
        }
    }

    pub fn as_cluster(&self) -> Option<&ClusterDescriptor> {
        match self {
            Feature::Cluster(c) => Some(c),
            Feature::Point(_) => None,
        }
    }

    pub fn as_point(&self) -> Option<&'a GeoPoint<P>> {
        match self {
            Feature::Cluster(_) => None,
            Feature::Point(p) => Some(p.point),
        }
    }
}

/// Wrap a longitude into `[-180, 180)`.
fn normalize_lon(lon: f64) -> f64 {
    (lon + 180.0).rem_euclid(360.0) - 180.0
}

impl<P> ClusterIndex<P> {
    /// All features visible inside `bbox` at `zoom`.
    ///
    /// The zoom is floored and clamped to `[min_zoom, max_zoom + 1]`; at
    /// `max_zoom + 1` every point is returned individually. A box whose western
    /// edge lies east of its eastern edge crosses the antimeridian and is
    /// queried as two halves. A box with non-finite edges matches nothing.
    pub fn get_clusters(&self, bbox: &BoundingBox2D, zoom: f64) -> Vec<Feature<'_, P>> {
        if !bbox.is_finite() {
            log::warn!("ignoring query with non-finite bounding box {:?}", bbox.to_array());
            return Vec::new();
        }

        let zoom = self.limit_zoom(zoom);
        let Some(level) = self.level(zoom) else {
            return Vec::new();
        };

        let (mut south, mut north) = (bbox.min_lat, bbox.max_lat);
        if south > north {
            std::mem::swap(&mut south, &mut north);
        }
        let south = south.clamp(-90.0, 90.0);
        let north = north.clamp(-90.0, 90.0);

        let (west, east) = if bbox.max_lon - bbox.min_lon >= 360.0 {
            (-180.0, 180.0)
        } else {
            let west = normalize_lon(bbox.min_lon);
            let east = if bbox.max_lon == 180.0 {
                180.0
            } else {
                normalize_lon(bbox.max_lon)
            };
            // A box that starts and ends on the antimeridian is a sliver, not the world
            if west == -180.0 && east == 180.0 && bbox.min_lon != -180.0 {
                (180.0, 180.0)
            } else {
                (west, east)
            }
        };

        let ids = if west > east {
            let mut ids = self.range_ids(level, west, south, 180.0, north);
            let mut seen: FxHashSet<u32> = ids.iter().copied().collect();
            for id in self.range_ids(level, -180.0, south, east, north) {
                if seen.insert(id) {
                    ids.push(id);
                }
            }
            ids
        } else {
            self.range_ids(level, west, south, east, north)
        };

        log::trace!(
            "query at zoom {} matched {} of {} nodes",
            zoom,
            ids.len(),
            level.nodes.len()
        );

        ids.into_iter()
            .filter_map(|i| self.feature_at(level, i))
            .collect()
    }

    fn range_ids(&self, level: &Level, west: f64, south: f64, east: f64, north: f64) -> Vec<u32> {
        level.range(
            lon_to_x(west),
            lat_to_y(north),
            lon_to_x(east),
            lat_to_y(south),
        )
    }

    /// The public view of node `index` at `level`.
    pub(crate) fn feature_at(&self, level: &Level, index: u32) -> Option<Feature<'_, P>> {
        let node = level.nodes.get(index as usize)?;
        let id = ClusterId::new(self.generation, level.zoom, index);
        match node.kind {
            NodeKind::Cluster { .. } => Some(Feature::Cluster(ClusterDescriptor::from_node(id, node))),
            NodeKind::Leaf { point } => self
                .store
                .points()
                .get(point as usize)
                .map(|point| Feature::Point(PointFeature { id, point })),
        }
    }
}
