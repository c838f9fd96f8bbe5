//! R-tree node index for snapping on larger networks.
//!
//! [`RoadNetwork::snap_to_node`] is a linear scan, which is fine for a single
//! bounding-box worth of roads.  [`NodeIndex`] answers the same question in
//! O(log N) after an O(N log N) bulk load.
//!
//! # Geometry
//!
//! Entries are stored as unit-sphere vectors (see
//! [`GeoPoint::unit_vector`]).  Chord length on the unit sphere is
//! `2·sin(θ/2)` for central angle θ, which is monotonic on `[0, π]`, so the
//! Euclidean nearest neighbour is also the great-circle nearest neighbour.
//! Among exactly equidistant nodes the choice is up to the R-tree.

use rstar::{AABB, PointDistance, RTree, RTreeObject};

use rr_core::{GeoPoint, NodeId};

use crate::RoadNetwork;

// ── R-tree node entry ─────────────────────────────────────────────────────────

#[derive(Clone)]
struct NodeEntry {
    point: [f64; 3], // unit-sphere [x, y, z]
    id: NodeId,
}

impl RTreeObject for NodeEntry {
    type Envelope = AABB<[f64; 3]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for NodeEntry {
    /// Squared chord distance on the unit sphere.
    fn distance_2(&self, point: &[f64; 3]) -> f64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        let dz = self.point[2] - point[2];
        dx * dx + dy * dy + dz * dz
    }
}

// ── NodeIndex ─────────────────────────────────────────────────────────────────

/// Spatial index over the nodes of one [`RoadNetwork`].
pub struct NodeIndex {
    tree: RTree<NodeEntry>,
}

impl NodeIndex {
    /// Bulk-load an index over every node of `network`.
    pub fn build(network: &RoadNetwork) -> Self {
        let entries: Vec<NodeEntry> = network
            .node_pos
            .iter()
            .enumerate()
            .map(|(i, &pos)| NodeEntry { point: pos.unit_vector(), id: NodeId(i as u32) })
            .collect();
        Self { tree: RTree::bulk_load(entries) }
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// Nearest node to `pos`, or `None` if the index is empty.
    pub fn nearest(&self, pos: GeoPoint) -> Option<NodeId> {
        self.tree.nearest_neighbor(&pos.unit_vector()).map(|e| e.id)
    }

    /// Up to `k` nearest nodes to `pos`, sorted by ascending distance.
    pub fn k_nearest(&self, pos: GeoPoint, k: usize) -> Vec<NodeId> {
        self.tree
            .nearest_neighbor_iter(&pos.unit_vector())
            .take(k)
            .map(|e| e.id)
            .collect()
    }
}

// ── SnapStrategy ──────────────────────────────────────────────────────────────

/// How route endpoints are snapped onto the network.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum SnapStrategy {
    /// Linear scan; first-added node wins ties.
    #[default]
    Linear,
    /// R-tree built once per network; ties are implementation-defined.
    RTree,
}

impl SnapStrategy {
    /// Snap both route endpoints, building at most one index.
    pub fn snap_pair(
        self,
        network: &RoadNetwork,
        start: GeoPoint,
        end: GeoPoint,
    ) -> (Option<NodeId>, Option<NodeId>) {
        match self {
            SnapStrategy::Linear => (network.snap_to_node(start), network.snap_to_node(end)),
            SnapStrategy::RTree => {
                let index = NodeIndex::build(network);
                (index.nearest(start), index.nearest(end))
            }
        }
    }
}
