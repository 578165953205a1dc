//! Multi-resolution cluster index: one k-d tree per zoom level.
//!
//! The index is built top-down. The level at `max_zoom + 1` holds every point as
//! a leaf; each level below is produced by greedily merging the level above it:
//! nodes are swept in insertion order and every node that is not yet part of a
//! cluster absorbs all still-free neighbours within the cluster radius. The
//! radius is fixed in tile pixels, so it covers twice the ground distance with
//! every zoom step down.

use bytes::Bytes;
use smallvec::{SmallVec, smallvec};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::cluster::node::{Level, Node, NodeKind};
use crate::compute::projection::{lat_to_y, lon_to_x, radius_at_zoom};
use crate::config::{ClusterConfig, GeoPoint};
use crate::error::{ClusterError, Result};
use crate::store::PointStore;

static NEXT_GENERATION: AtomicU64 = AtomicU64::new(1);

fn next_generation() -> u64 {
    NEXT_GENERATION.fetch_add(1, Ordering::Relaxed)
}

/// An immutable, fully built cluster index over one point set.
///
/// Build once, then query from as many threads as needed; nothing in the index
/// changes after [`ClusterIndex::build`] returns. A changed point set or
/// configuration means building a new index.
///
/// ```rust
/// use spatio_cluster::{BoundingBox2D, ClusterConfig, ClusterIndex, GeoPoint, PointStore};
///
/// let store = PointStore::load(vec![
///     GeoPoint::new("a", 0.0, 0.0, ()),
///     GeoPoint::new("b", 0.001, 0.001, ()),
///     GeoPoint::new("c", 50.0, 50.0, ()),
/// ])?;
/// let index = ClusterIndex::build(&store, &ClusterConfig::default())?;
///
/// let world = BoundingBox2D::world();
/// assert_eq!(index.get_clusters(&world, 16.0).len(), 3);
/// assert_eq!(index.get_clusters(&world, 0.0).len(), 2);
/// # Ok::<(), spatio_cluster::ClusterError>(())
/// ```
#[derive(Debug)]
pub struct ClusterIndex<P = Bytes> {
    pub(crate) generation: u64,
    pub(crate) config: ClusterConfig,
    pub(crate) store: PointStore<P>,
    /// Levels from `min_zoom` up to `max_zoom + 1`, ascending
    pub(crate) levels: Vec<Level>,
}

/// Node counts of one level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelStats {
    pub zoom: u8,
    /// Features visible at this zoom (clusters and single points)
    pub nodes: usize,
    /// How many of them are clusters
    pub clusters: usize,
}

/// Statistics about a built index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexStats {
    pub generation: u64,
    pub total_points: usize,
    /// One entry per level, ascending by zoom
    pub levels: Vec<LevelStats>,
}

impl<P> ClusterIndex<P> {
    /// Build an index over `store` with `config`.
    ///
    /// Fails with [`ClusterError::Configuration`] when the configuration is
    /// invalid; the store is already known to be valid.
    pub fn build(store: &PointStore<P>, config: &ClusterConfig) -> Result<Self> {
        config.validate()?;

        let generation = next_generation();
        let leaf_zoom = config.max_zoom + 1;

        let leaves: Vec<Node> = store
            .points()
            .iter()
            .enumerate()
            .map(|(i, p)| leaf_node(i, p, leaf_zoom))
            .collect();

        let mut levels = Vec::with_capacity((leaf_zoom - config.min_zoom) as usize + 1);
        levels.push(Level::new(leaf_zoom, leaves, Vec::new(), config.node_size));

        for zoom in (config.min_zoom..=config.max_zoom).rev() {
            let above = levels
                .last()
                .ok_or_else(|| ClusterError::Configuration("empty level stack".to_string()))?;
            let level = cluster_level(above, zoom, config);

            log::debug!(
                "generation {}: zoom {} has {} nodes ({} new clusters)",
                generation,
                zoom,
                level.nodes.len(),
                level.merges.len()
            );

            levels.push(level);
        }

        levels.reverse();

        Ok(Self {
            generation,
            config: config.clone(),
            store: store.clone(),
            levels,
        })
    }

    /// Build generation; every build gets a fresh one.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn config(&self) -> &ClusterConfig {
        &self.config
    }

    /// The point set this index was built from.
    pub fn store(&self) -> &PointStore<P> {
        &self.store
    }

    /// Number of loaded points.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Per-level node counts.
    pub fn stats(&self) -> IndexStats {
        IndexStats {
            generation: self.generation,
            total_points: self.store.len(),
            levels: self
                .levels
                .iter()
                .map(|level| LevelStats {
                    zoom: level.zoom,
                    nodes: level.nodes.len(),
                    clusters: level
                        .nodes
                        .iter()
                        .filter(|n| matches!(n.kind, NodeKind::Cluster { .. }))
                        .count(),
                })
                .collect(),
        }
    }

    /// Clamp a requested zoom to the range of built levels.
    pub(crate) fn limit_zoom(&self, zoom: f64) -> u8 {
        let min = self.config.min_zoom as f64;
        let max = self.config.max_zoom as f64 + 1.0;
        if zoom.is_nan() {
            return self.config.min_zoom;
        }
        zoom.floor().max(min).min(max) as u8
    }

    /// The level built for `zoom`, if it is in range.
    pub(crate) fn level(&self, zoom: u8) -> Option<&Level> {
        let offset = zoom.checked_sub(self.config.min_zoom)?;
        self.levels.get(offset as usize)
    }
}

fn leaf_node<P>(index: usize, point: &GeoPoint<P>, leaf_zoom: u8) -> Node {
    Node {
        x: lon_to_x(point.longitude()),
        y: lat_to_y(point.latitude()),
        point_count: 1,
        formed_at: leaf_zoom,
        kind: NodeKind::Leaf {
            point: index as u32,
        },
    }
}

/// Merge the nodes of `above` into the level for `zoom`.
fn cluster_level(above: &Level, zoom: u8, config: &ClusterConfig) -> Level {
    let r = radius_at_zoom(config.radius, config.extent, zoom);
    let mut taken = vec![false; above.nodes.len()];
    let mut nodes = Vec::with_capacity(above.nodes.len());
    let mut merges: Vec<SmallVec<[u32; 4]>> = Vec::new();

    for (i, seed) in above.nodes.iter().enumerate() {
        if taken[i] {
            continue;
        }
        taken[i] = true;

        let mut neighbors = above.within(seed.x, seed.y, r);
        neighbors.sort_unstable();

        let mut children: SmallVec<[u32; 4]> = smallvec![i as u32];
        let mut count = seed.point_count as f64;
        let mut wx = seed.x * count;
        let mut wy = seed.y * count;

        for k in neighbors {
            let k = k as usize;
            if taken[k] {
                continue;
            }
            taken[k] = true;

            let n = &above.nodes[k];
            let weight = n.point_count as f64;
            count += weight;
            wx += n.x * weight;
            wy += n.y * weight;
            children.push(k as u32);
        }

        if children.len() == 1 {
            nodes.push(*seed);
            continue;
        }

        let point_count = children
            .iter()
            .map(|&c| above.nodes[c as usize].point_count)
            .sum();

        merges.push(children);
        nodes.push(Node {
            x: wx / count,
            y: wy / count,
            point_count,
            formed_at: zoom,
            kind: NodeKind::Cluster {
                merge: (merges.len() - 1) as u32,
            },
        });
    }

    Level::new(zoom, nodes, merges, config.node_size)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(coords: &[(f64, f64)]) -> PointStore<()> {
        PointStore::load(
            coords
                .iter()
                .enumerate()
                .map(|(i, &(lon, lat))| GeoPoint::new(format!("p{}", i), lon, lat, ())),
        )
        .unwrap()
    }

    #[test]
    fn test_levels_cover_zoom_range() {
        let config = ClusterConfig::default().with_min_zoom(2).with_max_zoom(6);
        let index = ClusterIndex::build(&store(&[(0.0, 0.0)]), &config).unwrap();
        let zooms: Vec<u8> = index.levels.iter().map(|l| l.zoom).collect();
        assert_eq!(zooms, vec![2, 3, 4, 5, 6, 7]);
        assert!(index.level(1).is_none());
        assert!(index.level(8).is_none());
        assert_eq!(index.level(7).unwrap().zoom, 7);
    }

    #[test]
    fn test_build_rejects_bad_config() {
        let bad = ClusterConfig::default().with_radius(0.0);
        assert!(matches!(
            ClusterIndex::build(&store(&[(0.0, 0.0)]), &bad),
            Err(ClusterError::Configuration(_))
        ));
    }

    #[test]
    fn test_point_counts_are_conserved_per_level() {
        let coords: Vec<(f64, f64)> = (0..200)
            .map(|i| ((i % 20) as f64 * 0.5, (i / 20) as f64 * 0.5))
            .collect();
        let index = ClusterIndex::build(&store(&coords), &ClusterConfig::default()).unwrap();

        for level in &index.levels {
            let total: u32 = level.nodes.iter().map(|n| n.point_count).sum();
            assert_eq!(total, 200, "zoom {}", level.zoom);
        }
    }

    #[test]
    fn test_centroid_is_weighted_average() {
        let index = ClusterIndex::build(
            &store(&[(0.0, 0.0), (0.001, 0.0), (0.002, 0.0)]),
            &ClusterConfig::default(),
        )
        .unwrap();

        let top = index.level(0).unwrap();
        assert_eq!(top.nodes.len(), 1);
        let node = top.nodes[0];
        assert_eq!(node.point_count, 3);
        assert!((node.longitude() - 0.001).abs() < 1e-9);
    }

    #[test]
    fn test_generations_are_unique() {
        let s = store(&[(0.0, 0.0)]);
        let a = ClusterIndex::build(&s, &ClusterConfig::default()).unwrap();
        let b = ClusterIndex::build(&s, &ClusterConfig::default()).unwrap();
        assert_ne!(a.generation(), b.generation());
    }

    #[test]
    fn test_limit_zoom() {
        let config = ClusterConfig::default().with_min_zoom(3).with_max_zoom(10);
        let index = ClusterIndex::build(&store(&[(0.0, 0.0)]), &config).unwrap();
        assert_eq!(index.limit_zoom(0.0), 3);
        assert_eq!(index.limit_zoom(5.7), 5);
        assert_eq!(index.limit_zoom(30.0), 11);
        assert_eq!(index.limit_zoom(-2.0), 3);
        assert_eq!(index.limit_zoom(f64::NAN), 3);
    }

    #[test]
    fn test_stats() {
        let index = ClusterIndex::build(
            &store(&[(0.0, 0.0), (0.001, 0.001), (50.0, 50.0)]),
            &ClusterConfig::default(),
        )
        .unwrap();
        let stats = index.stats();
        assert_eq!(stats.total_points, 3);
        assert_eq!(stats.levels.len(), 18);

        let top = &stats.levels[0];
        assert_eq!(top.zoom, 0);
        assert_eq!(top.nodes, 2);
        assert_eq!(top.clusters, 1);

        let leaves = stats.levels.last().unwrap();
        assert_eq!(leaves.zoom, 17);
        assert_eq!(leaves.nodes, 3);
        assert_eq!(leaves.clusters, 0);
    }

    #[test]
    fn test_empty_store_builds() {
        let index = ClusterIndex::build(&store(&[]), &ClusterConfig::default()).unwrap();
        assert!(index.is_empty());
        assert!(index.levels.iter().all(|l| l.nodes.is_empty()));
    }

    #[test]
    fn test_node_size_does_not_change_clusters() {
        let coords: Vec<(f64, f64)> = (0..600)
            .map(|i| {
                let i = i as f64;
                ((i * 37.0) % 300.0 - 150.0, (i * 11.0) % 140.0 - 70.0)
            })
            .collect();
        let store = store(&coords);

        let shapes: Vec<Vec<Vec<(u64, u64, u32)>>> = [1, 8, 64]
            .into_iter()
            .map(|node_size| {
                let config = ClusterConfig::default().with_node_size(node_size);
                let index = ClusterIndex::build(&store, &config).unwrap();
                index
                    .levels
                    .iter()
                    .map(|level| {
                        level
                            .nodes
                            .iter()
                            .map(|n| (n.x.to_bits(), n.y.to_bits(), n.point_count))
                            .collect()
                    })
                    .collect()
            })
            .collect();

        assert_eq!(shapes[0], shapes[1]);
        assert_eq!(shapes[1], shapes[2]);
    }
}
