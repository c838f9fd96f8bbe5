//! End-to-end route planning over an already-built network.
//!
//! ```text
//! (start, end) ──snap×2──▶ (NodeId, NodeId) ──Router──▶ Path ──▶ RouteSummary
//! ```
//!
//! The two "not found" outcomes are separate [`PlanError`] variants so
//! callers can tell "no roads here" from "roads, but not connected".

use thiserror::Error;
use tracing::debug;

use rr_core::{GeoPoint, NodeId, OsmId};

use crate::{Path, RoadNetwork, RouteSummary, Router, SnapStrategy, SpatialError};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum PlanError {
    /// The network has no nodes to snap onto.
    #[error("no road network near the requested points")]
    NoNearbyRoad,

    /// Both endpoints snapped, but they lie in different components.
    #[error("no path between node {from} and node {to}")]
    NoPath { from: OsmId, to: OsmId },

    #[error(transparent)]
    Spatial(#[from] SpatialError),
}

/// A solved route and the graph nodes its endpoints snapped to.
#[derive(Debug, Clone)]
pub struct PlannedRoute {
    pub start_node: OsmId,
    pub end_node: OsmId,
    pub path: Path,
    pub summary: RouteSummary,
}

/// Snap `start` and `end` onto `network`, route between them with `router`,
/// and summarise the result.
pub fn plan_route<R: Router + ?Sized>(
    network: &RoadNetwork,
    router: &R,
    snap: SnapStrategy,
    start: GeoPoint,
    end: GeoPoint,
) -> Result<PlannedRoute, PlanError> {
    let (Some(from), Some(to)) = snap.snap_pair(network, start, end) else {
        return Err(PlanError::NoNearbyRoad);
    };
    let start_node = osm_id_of(network, from)?;
    let end_node = osm_id_of(network, to)?;
    debug!(%start, %end, %start_node, %end_node, "snapped endpoints");

    let path = match router.route(network, from, to) {
        Ok(path) => path,
        Err(SpatialError::NoRoute { .. }) => {
            return Err(PlanError::NoPath { from: start_node, to: end_node });
        }
        Err(e) => return Err(e.into()),
    };

    let summary = RouteSummary::from_path(&path, network);
    debug!(nodes = summary.node_count, distance_m = summary.distance_m, "route planned");

    Ok(PlannedRoute { start_node, end_node, path, summary })
}

fn osm_id_of(network: &RoadNetwork, node: NodeId) -> Result<OsmId, PlanError> {
    network.osm_id(node).ok_or(PlanError::Spatial(SpatialError::NodeNotFound(node)))
}
