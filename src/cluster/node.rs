//! Node and identifier types shared by the build, query and navigation code.

use geo_index::kdtree::{KDTree, KDTreeBuilder, KDTreeIndex};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

use crate::compute::projection::{x_to_lon, y_to_lat};

/// Identifier of a feature returned by the index.
///
/// An id names one node at one zoom level of one build. The `generation` is
/// unique per build, so ids taken from a previous build are rejected instead of
/// silently resolving to an unrelated node. Ids must not be stored across
/// reloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ClusterId {
    /// Build the id belongs to
    pub generation: u64,
    /// Zoom level the node was returned from
    pub zoom: u8,
    /// Position of the node within that level
    pub index: u32,
}

impl ClusterId {
    pub(crate) fn new(generation: u64, zoom: u8, index: u32) -> Self {
        Self {
            generation,
            zoom,
            index,
        }
    }
}

impl fmt::Display for ClusterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.generation, self.zoom, self.index)
    }
}

/// What a node stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NodeKind {
    /// An original point, by position in the point store
    Leaf { point: u32 },
    /// A merge recorded in the `merges` table of the level the node was formed at
    Cluster { merge: u32 },
}

/// One node of one level. Survivors are copied verbatim into the next level down.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Node {
    /// Normalized Web Mercator x
    pub x: f64,
    /// Normalized Web Mercator y
    pub y: f64,
    pub point_count: u32,
    /// Zoom the node was formed at; leaves carry `max_zoom + 1`
    pub formed_at: u8,
    pub kind: NodeKind,
}

impl Node {
    pub fn longitude(&self) -> f64 {
        x_to_lon(self.x)
    }

    pub fn latitude(&self) -> f64 {
        y_to_lat(self.y)
    }
}

/// All nodes active at one zoom plus the k-d tree over them.
pub(crate) struct Level {
    pub zoom: u8,
    pub nodes: Vec<Node>,
    /// Children of every cluster formed at this zoom, as indices into the level
    /// at `zoom + 1`
    pub merges: Vec<SmallVec<[u32; 4]>>,
    /// `None` when the level has no nodes
    tree: Option<KDTree<f64>>,
}

impl Level {
    /// Index `nodes` with leaf buckets of `node_size` entries.
    pub fn new(zoom: u8, nodes: Vec<Node>, merges: Vec<SmallVec<[u32; 4]>>, node_size: usize) -> Self {
        let tree = (!nodes.is_empty()).then(|| {
            // geo-index needs buckets of at least two entries
            let node_size = node_size.clamp(2, u16::MAX as usize) as u16;
            let mut builder = KDTreeBuilder::<f64>::new_with_node_size(nodes.len() as u32, node_size);
            for node in &nodes {
                builder.add(node.x, node.y);
            }
            builder.finish()
        });

        Self {
            zoom,
            nodes,
            merges,
            tree,
        }
    }

    /// Positions of the nodes inside the projected rectangle, edges inclusive.
    pub fn range(&self, min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Vec<u32> {
        self.tree
            .as_ref()
            .map(|tree| {
                tree.range(min_x, min_y, max_x, max_y)
                    .into_iter()
                    .map(|i| i as u32)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Positions of the nodes within projected distance `r` of `(x, y)`.
    pub fn within(&self, x: f64, y: f64, r: f64) -> Vec<u32> {
        self.tree
            .as_ref()
            .map(|tree| tree.within(x, y, r).into_iter().map(|i| i as u32).collect())
            .unwrap_or_default()
    }
}

impl fmt::Debug for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Level")
            .field("zoom", &self.zoom)
            .field("nodes", &self.nodes.len())
            .field("merges", &self.merges.len())
            .finish()
    }
}

/// Public view of a cluster in query results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterDescriptor {
    pub id: ClusterId,
    pub longitude: f64,
    pub latitude: f64,
    /// Number of original points beneath the cluster
    pub point_count: usize,
    /// Short label for the point count, e.g. `"1.2k"`
    pub point_count_abbreviated: String,
    /// Zoom at which the cluster was formed
    pub zoom: u8,
}

impl ClusterDescriptor {
    pub(crate) fn from_node(id: ClusterId, node: &Node) -> Self {
        let point_count = node.point_count as usize;
        Self {
            id,
            longitude: node.longitude(),
            latitude: node.latitude(),
            point_count,
            point_count_abbreviated: abbreviate_count(point_count),
            zoom: node.formed_at,
        }
    }
}

/// Short label for a point count: `"950"`, `"1.5k"`, `"12k"`.
///
/// # Examples
///
/// ```
/// use spatio_cluster::abbreviate_count;
///
/// assert_eq!(abbreviate_count(950), "950");
/// assert_eq!(abbreviate_count(1_540), "1.5k");
/// assert_eq!(abbreviate_count(12_345), "12k");
/// ```
pub fn abbreviate_count(count: usize) -> String {
    if count >= 10_000 {
        format!("{}k", (count as f64 / 1000.0).round())
    } else if count >= 1_000 {
        format!("{}k", (count as f64 / 100.0).round() / 10.0)
    } else {
        count.to_string()
    }
}
