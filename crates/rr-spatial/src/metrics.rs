//! Derived path metrics: total length and a renderable coordinate trace.

use rr_core::GeoPoint;

use crate::{Path, RoadNetwork};

/// Positions of the path's nodes, in path order.
///
/// Ids the network cannot resolve are dropped rather than reported; a path
/// produced by a [`Router`](crate::Router) over the same network never
/// contains any.
pub fn path_coordinates(path: &Path, network: &RoadNetwork) -> Vec<GeoPoint> {
    path.nodes.iter().filter_map(|&n| network.position(n)).collect()
}

/// Sum of great-circle distances between consecutive path nodes, in metres.
///
/// A path of fewer than two nodes has length zero.
pub fn path_length_m(path: &Path, network: &RoadNetwork) -> f64 {
    length_of(&path_coordinates(path, network))
}

fn length_of(points: &[GeoPoint]) -> f64 {
    points.windows(2).map(|w| w[0].distance_m(w[1])).sum()
}

// ── RouteSummary ──────────────────────────────────────────────────────────────

/// Everything a client needs to draw and label a computed route.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RouteSummary {
    pub distance_m: f64,
    /// Number of nodes on the path (not edges).
    pub node_count: usize,
    pub coordinates: Vec<GeoPoint>,
}

impl RouteSummary {
    pub fn from_path(path: &Path, network: &RoadNetwork) -> Self {
        let coordinates = path_coordinates(path, network);
        Self {
            distance_m: length_of(&coordinates),
            node_count: path.len(),
            coordinates,
        }
    }

    /// Distance in kilometres with two decimals, e.g. `"1.23"`.
    pub fn distance_km_text(&self) -> String {
        format!("{:.2}", self.distance_m / 1_000.0)
    }

    /// Coordinates as `[lat, lon]` pairs.
    pub fn lat_lon_pairs(&self) -> Vec<[f64; 2]> {
        self.coordinates.iter().map(|p| [p.lat, p.lon]).collect()
    }
}
