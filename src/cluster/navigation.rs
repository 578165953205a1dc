//! Navigation from a returned feature into the levels above it.

use crate::cluster::index::ClusterIndex;
use crate::cluster::node::{ClusterId, Level, Node, NodeKind};
use crate::cluster::query::Feature;
use crate::config::GeoPoint;
use crate::error::{ClusterError, Result};

impl<P> ClusterIndex<P> {
    /// Look up the node an id refers to.
    pub(crate) fn resolve(&self, id: ClusterId) -> Result<(&Level, &Node)> {
        if id.generation != self.generation {
            log::warn!(
                "cluster id {} belongs to generation {}, current is {}",
                id,
                id.generation,
                self.generation
            );
            return Err(ClusterError::UnknownCluster(format!(
                "{} is from a previous build",
                id
            )));
        }

        let level = self
            .level(id.zoom)
            .ok_or_else(|| ClusterError::UnknownCluster(format!("{}: no level at zoom {}", id, id.zoom)))?;
        let node = level
            .nodes
            .get(id.index as usize)
            .ok_or_else(|| ClusterError::UnknownCluster(format!("{}: no such node", id)))?;

        Ok((level, node))
    }

    /// Child indices of `node` and the level they live in. Empty for leaves.
    fn child_slots(&self, node: &Node) -> Result<(Option<&Level>, &[u32])> {
        match node.kind {
            NodeKind::Leaf { .. } => Ok((None, &[][..])),
            NodeKind::Cluster { merge } => {
                let formed = self.level(node.formed_at).ok_or_else(|| {
                    ClusterError::UnknownCluster(format!("no level at zoom {}", node.formed_at))
                })?;
                let children = formed
                    .merges
                    .get(merge as usize)
                    .ok_or_else(|| ClusterError::UnknownCluster(format!("no merge {}", merge)))?;
                let above = self.level(node.formed_at + 1).ok_or_else(|| {
                    ClusterError::UnknownCluster(format!("no level at zoom {}", node.formed_at + 1))
                })?;
                Ok((Some(above), children.as_slice()))
            }
        }
    }

    /// The clusters and points a cluster was merged from.
    ///
    /// Children are returned from the level one zoom above the cluster's
    /// formation zoom and carry ids of that level. A single point has no
    /// children.
    pub fn get_children(&self, id: ClusterId) -> Result<Vec<Feature<'_, P>>> {
        let (_, node) = self.resolve(id)?;
        let (above, slots) = self.child_slots(node)?;
        let Some(above) = above else {
            return Ok(Vec::new());
        };

        Ok(slots
            .iter()
            .filter_map(|&i| self.feature_at(above, i))
            .collect())
    }

    /// Lazy depth-first iterator over the original points beneath `id`.
    pub fn leaves(&self, id: ClusterId) -> Result<Leaves<'_, P>> {
        self.resolve(id)?;
        Ok(Leaves {
            index: self,
            stack: vec![(id.zoom, id.index)],
            skip: 0,
        })
    }

    /// Up to `limit` original points beneath `id`, starting at `offset`.
    ///
    /// ```rust
    /// use spatio_cluster::{BoundingBox2D, ClusterConfig, ClusterIndex, GeoPoint, PointStore};
    ///
    /// let points = (0..25).map(|i| GeoPoint::new(format!("p{}", i), i as f64 * 0.001, 0.0, ()));
    /// let index = ClusterIndex::build(&PointStore::load(points)?, &ClusterConfig::default())?;
    ///
    /// let top = index.get_clusters(&BoundingBox2D::world(), 0.0);
    /// let page = index.get_leaves(top[0].id(), 10, 20)?;
    /// assert_eq!(page.len(), 5);
    /// # Ok::<(), spatio_cluster::ClusterError>(())
    /// ```
    pub fn get_leaves(&self, id: ClusterId, limit: usize, offset: usize) -> Result<Vec<&GeoPoint<P>>> {
        Ok(self.leaves(id)?.skip_points(offset).take(limit).collect())
    }

    /// Zoom at which the cluster splits into more than one feature.
    ///
    /// Capped at `max_zoom + 1`. For a single point this is the zoom of the
    /// level the id was returned from.
    pub fn get_cluster_expansion_zoom(&self, id: ClusterId) -> Result<u8> {
        let (_, node) = self.resolve(id)?;
        match node.kind {
            NodeKind::Leaf { .. } => Ok(id.zoom),
            // Every merge has at least two children, so the next level up already splits it
            NodeKind::Cluster { .. } => Ok((node.formed_at + 1).min(self.config.max_zoom + 1)),
        }
    }
}

/// Depth-first walk over the points beneath one node.
///
/// Created by [`ClusterIndex::leaves`]. Whole subtrees are skipped while
/// consuming an offset, so paging deep into a large cluster does not visit the
/// skipped points.
pub struct Leaves<'a, P> {
    index: &'a ClusterIndex<P>,
    stack: Vec<(u8, u32)>,
    skip: usize,
}

impl<'a, P> Leaves<'a, P> {
    /// Skip the first `n` points.
    pub fn skip_points(mut self, n: usize) -> Self {
        self.skip += n;
        self
    }
}

impl<'a, P> Iterator for Leaves<'a, P> {
    type Item = &'a GeoPoint<P>;

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.index;
        while let Some((zoom, slot)) = self.stack.pop() {
            let Some(node) = index.level(zoom).and_then(|l| l.nodes.get(slot as usize)) else {
                continue;
            };

            let count = node.point_count as usize;
            if self.skip >= count {
                self.skip -= count;
                continue;
            }

            match node.kind {
                NodeKind::Leaf { point } => return index.store.points().get(point as usize),
                NodeKind::Cluster { .. } => {
                    let Ok((Some(above), children)) = index.child_slots(node) else {
                        continue;
                    };
                    for &child in children.iter().rev() {
                        self.stack.push((above.zoom, child));
                    }
                }
            }
        }
        None
    }
}
