//! Road network representation and builder.
//!
//! # Data layout
//!
//! The graph uses **Compressed Sparse Row (CSR)** format for outgoing edges.
//! Given a `NodeId n`, its outgoing edges occupy the slice:
//!
//! ```text
//! edge_to[ node_out_start[n] .. node_out_start[n+1] ]
//! ```
//!
//! All edge arrays (`edge_from`, `edge_to`, `edge_length_m`) are sorted by
//! source node (then destination) and indexed by `EdgeId`.
//!
//! The network is undirected: every road is stored as two directed edges of
//! equal length, and the builder never emits one without the other.
//!
//! # Node lookup
//!
//! Nodes are numbered densely in the order their points were first added.
//! `node_pos` and `node_osm_id` are indexed by `NodeId`; the provider id maps
//! back through [`RoadNetwork::node_by_osm`].

use rustc_hash::FxHashMap;
use tracing::debug;

use rr_core::{EdgeId, GeoPoint, NodeId, OsmId};

use crate::RoadElement;

// ── Duplicate-edge policy ─────────────────────────────────────────────────────

/// What to do when the same node pair is inserted more than once (e.g. two
/// overlapping segments).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum DuplicateEdgePolicy {
    /// Keep the smallest length seen for the pair.
    #[default]
    KeepMinimum,
    /// Overwrite with the most recently inserted length.
    LastWrite,
}

// ── RoadNetwork ───────────────────────────────────────────────────────────────

/// Undirected road graph in CSR format plus the node coordinate lookup.
///
/// All fields except the id map are `pub` for direct indexed access on hot
/// paths.  Do not construct directly; use [`RoadNetworkBuilder`].
pub struct RoadNetwork {
    // ── Node data ─────────────────────────────────────────────────────────
    /// Geographic position of each node.  Indexed by `NodeId`.
    pub node_pos: Vec<GeoPoint>,

    /// Provider id of each node.  Indexed by `NodeId`.
    pub node_osm_id: Vec<OsmId>,

    // ── CSR edge adjacency ────────────────────────────────────────────────
    /// CSR row pointer.  Outgoing edges of node `n` are at EdgeIds
    /// `node_out_start[n] .. node_out_start[n+1]`.
    /// Length = `node_count + 1`.
    pub node_out_start: Vec<u32>,

    // ── Edge data (indexed by EdgeId = position in sorted order) ──────────
    /// Source node of each edge.
    pub edge_from: Vec<NodeId>,

    /// Destination node of each edge.
    pub edge_to: Vec<NodeId>,

    /// Great-circle length of each edge in metres.  Used as Dijkstra cost.
    pub edge_length_m: Vec<f64>,

    osm_lookup: FxHashMap<OsmId, NodeId>,
}

impl RoadNetwork {
    /// Construct an empty network with no nodes or edges.
    ///
    /// Snapping against an empty network always yields `None`.
    pub fn empty() -> Self {
        RoadNetworkBuilder::new().build()
    }

    /// Build a network from provider records in one call.
    pub fn from_elements<I>(elements: I, policy: DuplicateEdgePolicy) -> Self
    where
        I: IntoIterator<Item = RoadElement>,
    {
        let mut b = RoadNetworkBuilder::with_policy(policy);
        b.ingest(elements);
        b.build()
    }

    // ── Graph dimensions ──────────────────────────────────────────────────

    pub fn node_count(&self) -> usize {
        self.node_pos.len()
    }

    /// Number of **directed** edges (twice the number of roads).
    pub fn edge_count(&self) -> usize {
        self.edge_to.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_pos.is_empty()
    }

    #[inline]
    pub fn contains(&self, node: NodeId) -> bool {
        node.index() < self.node_pos.len()
    }

    // ── Node lookup ───────────────────────────────────────────────────────

    #[inline]
    pub fn position(&self, node: NodeId) -> Option<GeoPoint> {
        self.node_pos.get(node.index()).copied()
    }

    #[inline]
    pub fn osm_id(&self, node: NodeId) -> Option<OsmId> {
        self.node_osm_id.get(node.index()).copied()
    }

    pub fn node_by_osm(&self, id: OsmId) -> Option<NodeId> {
        self.osm_lookup.get(&id).copied()
    }

    // ── Graph traversal ───────────────────────────────────────────────────

    /// Iterator over the `EdgeId`s of all outgoing edges from `node`.
    ///
    /// This is a contiguous index range — no heap allocation.
    ///
    /// # Panics
    ///
    /// If `node` is not part of the network (see [`RoadNetwork::contains`]).
    #[inline]
    pub fn out_edges(&self, node: NodeId) -> impl Iterator<Item = EdgeId> + '_ {
        debug_assert!(self.contains(node), "{node} is not in the network");
        let start = self.node_out_start[node.index()] as usize;
        let end   = self.node_out_start[node.index() + 1] as usize;
        (start..end).map(|i| EdgeId(i as u32))
    }

    /// Out-degree of `node` (number of neighbours).
    ///
    /// # Panics
    ///
    /// If `node` is not part of the network.
    #[inline]
    pub fn out_degree(&self, node: NodeId) -> usize {
        debug_assert!(self.contains(node), "{node} is not in the network");
        let start = self.node_out_start[node.index()] as usize;
        let end   = self.node_out_start[node.index() + 1] as usize;
        end - start
    }

    /// Length of the edge `from → to`, if the two nodes are adjacent.
    pub fn edge_weight(&self, from: NodeId, to: NodeId) -> Option<f64> {
        if !self.contains(from) {
            return None;
        }
        self.out_edges(from)
            .find(|e| self.edge_to[e.index()] == to)
            .map(|e| self.edge_length_m[e.index()])
    }

    // ── Spatial queries ───────────────────────────────────────────────────

    /// Return the `NodeId` of the node nearest to `pos` by great-circle
    /// distance.
    ///
    /// Linear scan in `NodeId` order with a strict `<` comparison, so among
    /// equidistant nodes the one added first wins.  Returns `None` only if
    /// the network has no nodes.
    pub fn snap_to_node(&self, pos: GeoPoint) -> Option<NodeId> {
        let mut best: Option<(NodeId, f64)> = None;
        for (i, &p) in self.node_pos.iter().enumerate() {
            let d = pos.distance_m(p);
            match best {
                Some((_, best_d)) if d >= best_d => {}
                _ => best = Some((NodeId(i as u32), d)),
            }
        }
        best.map(|(id, _)| id)
    }
}

// ── RoadNetworkBuilder ────────────────────────────────────────────────────────

/// Construct a [`RoadNetwork`] incrementally, then call [`build`](Self::build).
///
/// Points must be added before the segments that refer to them; a segment
/// pair whose endpoints are not both known is skipped silently.
/// [`ingest`](Self::ingest) takes care of the ordering for mixed input.
///
/// # Example
///
/// ```
/// use rr_core::{GeoPoint, OsmId};
/// use rr_spatial::RoadNetworkBuilder;
///
/// let mut b = RoadNetworkBuilder::new();
/// b.add_point(OsmId(1), GeoPoint::new(30.69, -88.04));
/// b.add_point(OsmId(2), GeoPoint::new(30.70, -88.03));
/// b.add_segment(&[OsmId(1), OsmId(2)]);
/// let net = b.build();
/// assert_eq!(net.node_count(), 2);
/// assert_eq!(net.edge_count(), 2); // bidirectional
/// ```
pub struct RoadNetworkBuilder {
    policy:     DuplicateEdgePolicy,
    nodes:      Vec<GeoPoint>,
    osm_ids:    Vec<OsmId>,
    osm_lookup: FxHashMap<OsmId, NodeId>,
    /// Undirected roads keyed by `(min, max)` node pair.
    roads:      FxHashMap<(NodeId, NodeId), f64>,
    skipped:    usize,
}

impl RoadNetworkBuilder {
    pub fn new() -> Self {
        Self::with_policy(DuplicateEdgePolicy::default())
    }

    pub fn with_policy(policy: DuplicateEdgePolicy) -> Self {
        Self {
            policy,
            nodes:      Vec::new(),
            osm_ids:    Vec::new(),
            osm_lookup: FxHashMap::default(),
            roads:      FxHashMap::default(),
            skipped:    0,
        }
    }

    /// Add a point and return its `NodeId` (sequential from 0).
    ///
    /// A repeated `id` keeps its first position and returns the existing
    /// `NodeId`.
    pub fn add_point(&mut self, id: OsmId, pos: GeoPoint) -> NodeId {
        if let Some(&existing) = self.osm_lookup.get(&id) {
            return existing;
        }
        let node = NodeId(self.nodes.len() as u32);
        self.nodes.push(pos);
        self.osm_ids.push(id);
        self.osm_lookup.insert(id, node);
        node
    }

    /// Decompose a segment into roads between consecutive points.
    ///
    /// Returns the number of pairs inserted.  Pairs with an unknown endpoint
    /// are skipped without affecting the rest of the segment.
    pub fn add_segment(&mut self, ids: &[OsmId]) -> usize {
        let mut inserted = 0;
        for pair in ids.windows(2) {
            let (Some(&a), Some(&b)) =
                (self.osm_lookup.get(&pair[0]), self.osm_lookup.get(&pair[1]))
            else {
                self.skipped += 1;
                continue;
            };
            let len_m = self.nodes[a.index()].distance_m(self.nodes[b.index()]);
            self.add_road(a, b, len_m);
            inserted += 1;
        }
        inserted
    }

    /// Add an undirected road of `length_m` metres between `a` and `b`.
    ///
    /// Both directions share one entry, so they can never disagree.  A road
    /// from a node to itself is ignored.
    pub fn add_road(&mut self, a: NodeId, b: NodeId, length_m: f64) {
        if a == b {
            return;
        }
        let key = if a < b { (a, b) } else { (b, a) };
        match self.policy {
            DuplicateEdgePolicy::LastWrite => {
                self.roads.insert(key, length_m);
            }
            DuplicateEdgePolicy::KeepMinimum => {
                self.roads
                    .entry(key)
                    .and_modify(|w| *w = w.min(length_m))
                    .or_insert(length_m);
            }
        }
    }

    /// Add a batch of provider records.
    ///
    /// All points are registered before any segment is decomposed, so the
    /// relative order of points and segments in `elements` does not matter.
    pub fn ingest<I>(&mut self, elements: I)
    where
        I: IntoIterator<Item = RoadElement>,
    {
        let mut segments = Vec::new();
        for element in elements {
            match element {
                RoadElement::Point { id, pos } => {
                    self.add_point(id, pos);
                }
                RoadElement::Segment { nodes } => segments.push(nodes),
            }
        }
        for nodes in &segments {
            self.add_segment(nodes);
        }
        debug!(
            points = self.nodes.len(),
            segments = segments.len(),
            roads = self.road_count(),
            skipped_pairs = self.skipped,
            "ingested road elements"
        );
    }

    /// Look up the position of a point added earlier.
    pub fn node_pos(&self, id: NodeId) -> GeoPoint {
        self.nodes[id.index()]
    }

    pub fn node_count(&self) -> usize { self.nodes.len() }
    pub fn road_count(&self) -> usize { self.roads.len() }
    /// Segment pairs dropped so far because an endpoint was unknown.
    pub fn skipped_pairs(&self) -> usize { self.skipped }

    /// Consume the builder and produce a [`RoadNetwork`].
    ///
    /// Time complexity: O(E log E) for the edge sort, where E = roads.
    pub fn build(self) -> RoadNetwork {
        let node_count = self.nodes.len();

        // Expand each road into its two directed edges, sorted for CSR.
        let mut raw: Vec<(NodeId, NodeId, f64)> = Vec::with_capacity(self.roads.len() * 2);
        for (&(a, b), &len_m) in &self.roads {
            raw.push((a, b, len_m));
            raw.push((b, a, len_m));
        }
        raw.sort_unstable_by_key(|&(from, to, _)| (from, to));
        let edge_count = raw.len();

        let edge_from:     Vec<NodeId> = raw.iter().map(|e| e.0).collect();
        let edge_to:       Vec<NodeId> = raw.iter().map(|e| e.1).collect();
        let edge_length_m: Vec<f64>    = raw.iter().map(|e| e.2).collect();

        // Build CSR row pointer (node_out_start).
        let mut node_out_start = vec![0u32; node_count + 1];
        for e in &raw {
            node_out_start[e.0.index() + 1] += 1;
        }
        for i in 1..=node_count {
            node_out_start[i] += node_out_start[i - 1];
        }
        debug_assert_eq!(node_out_start[node_count] as usize, edge_count);

        RoadNetwork {
            node_pos: self.nodes,
            node_osm_id: self.osm_ids,
            node_out_start,
            edge_from,
            edge_to,
            edge_length_m,
            osm_lookup: self.osm_lookup,
        }
    }
}

impl Default for RoadNetworkBuilder {
    fn default() -> Self {
        Self::new()
    }
}
