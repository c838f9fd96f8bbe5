//! Routing trait and default Dijkstra implementation.
//!
//! # Pluggability
//!
//! Callers route through the [`Router`] trait, so a different algorithm (A*,
//! bidirectional search) can be dropped in without touching the planner.
//! Routers hold no state: the network is passed explicitly on every call.
//!
//! # Cost units
//!
//! Edge costs are great-circle lengths in metres (`f64`), taken from
//! `RoadNetwork::edge_length_m`.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use ordered_float::OrderedFloat;

use rr_core::NodeId;

use crate::network::RoadNetwork;
use crate::{SpatialError, SpatialResult};

// ── Path ──────────────────────────────────────────────────────────────────────

/// The result of a routing query: the nodes visited from source to
/// destination inclusive, each consecutive pair joined by an edge.
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    pub nodes: Vec<NodeId>,
    /// Sum of edge costs along `nodes`, in metres.
    pub total_cost_m: f64,
}

impl Path {
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Start and end snapped to the same node.
    pub fn is_trivial(&self) -> bool {
        self.nodes.len() == 1
    }
}

// ── Router trait ──────────────────────────────────────────────────────────────

/// Pluggable shortest-path engine.
pub trait Router: Send + Sync {
    /// Compute a minimum-cost path from `from` to `to`.
    ///
    /// `from == to` yields a one-node path.  Returns
    /// [`SpatialError::NoRoute`] when the two nodes lie in different
    /// components and [`SpatialError::NodeNotFound`] when either id is not
    /// part of `network`.
    fn route(&self, network: &RoadNetwork, from: NodeId, to: NodeId) -> SpatialResult<Path>;
}

// ── DijkstraRouter ────────────────────────────────────────────────────────────

/// Single-source, single-target Dijkstra over the CSR road graph.
///
/// Terminates as soon as the target is popped from the heap.
/// O((V + E) log V).
pub struct DijkstraRouter;

impl Router for DijkstraRouter {
    fn route(&self, network: &RoadNetwork, from: NodeId, to: NodeId) -> SpatialResult<Path> {
        dijkstra(network, from, to)
    }
}

// ── Dijkstra internals ────────────────────────────────────────────────────────

fn dijkstra(network: &RoadNetwork, from: NodeId, to: NodeId) -> SpatialResult<Path> {
    for node in [from, to] {
        if !network.contains(node) {
            return Err(SpatialError::NodeNotFound(node));
        }
    }

    if from == to {
        return Ok(Path { nodes: vec![from], total_cost_m: 0.0 });
    }

    let n = network.node_count();
    // dist[v] = best known cost (m) to reach v.
    let mut dist = vec![f64::INFINITY; n];
    // prev[v] = node that reached v; NodeId::INVALID for unreached nodes.
    let mut prev = vec![NodeId::INVALID; n];

    dist[from.index()] = 0.0;

    // Reverse turns the max-heap into a min-heap on (metres, node); equal
    // costs pop in NodeId order.
    let mut heap: BinaryHeap<Reverse<(OrderedFloat<f64>, NodeId)>> = BinaryHeap::new();
    heap.push(Reverse((OrderedFloat(0.0), from)));

    while let Some(Reverse((OrderedFloat(cost), node))) = heap.pop() {
        if node == to {
            return Ok(reconstruct(prev, from, to, cost));
        }

        // Superseded entry; a cheaper one was already settled.
        if cost > dist[node.index()] {
            continue;
        }

        for edge in network.out_edges(node) {
            let neighbor = network.edge_to[edge.index()];
            let new_cost = cost + network.edge_length_m[edge.index()];

            if new_cost < dist[neighbor.index()] {
                dist[neighbor.index()] = new_cost;
                prev[neighbor.index()] = node;
                heap.push(Reverse((OrderedFloat(new_cost), neighbor)));
            }
        }
    }

    Err(SpatialError::NoRoute { from, to })
}

fn reconstruct(prev: Vec<NodeId>, from: NodeId, to: NodeId, total_cost_m: f64) -> Path {
    let mut nodes = vec![to];
    let mut cur = to;
    while cur != from {
        let p = prev[cur.index()];
        if p == NodeId::INVALID {
            break;
        }
        nodes.push(p);
        cur = p;
    }
    nodes.reverse();
    Path { nodes, total_cost_m }
}
