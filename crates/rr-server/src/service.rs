//! Route calculation: provider fan-out plus the spatial pipeline.

use tracing::{info, warn};

use rr_core::{BoundingBox, GeoPoint};
use rr_providers::{
    DirectionsRoute, DirectionsSource, FileRoadSource, GoogleDirectionsClient, OverpassClient,
    ProviderResult, RoadDataSource,
};
use rr_spatial::{
    DijkstraRouter, DuplicateEdgePolicy, PlannedRoute, RoadElement, RoadNetwork, SnapStrategy,
    plan_route,
};

use crate::{ApiError, ServerConfig};

// ── Road source selection ─────────────────────────────────────────────────────

/// The road-data provider chosen by configuration.
pub enum RoadSource {
    Overpass(OverpassClient),
    File(FileRoadSource),
}

impl RoadDataSource for RoadSource {
    async fn fetch_elements(&self, bbox: BoundingBox) -> ProviderResult<Vec<RoadElement>> {
        match self {
            RoadSource::Overpass(client) => client.fetch_elements(bbox).await,
            RoadSource::File(file) => file.fetch_elements(bbox).await,
        }
    }
}

// ── RouteService ──────────────────────────────────────────────────────────────

/// A computed route plus the optional comparison route.
#[derive(Debug, Clone)]
pub struct RouteOutcome {
    pub route: PlannedRoute,
    pub comparison: Option<DirectionsRoute>,
}

/// Stateless per-request orchestrator.
///
/// Holds only provider handles and routing options; every call builds its
/// own network and discards it afterwards.
pub struct RouteService<R, D> {
    roads:           R,
    directions:      D,
    bbox_margin_deg: f64,
    snap:            SnapStrategy,
    duplicate_edges: DuplicateEdgePolicy,
}

impl RouteService<RoadSource, Option<GoogleDirectionsClient>> {
    /// Wire up the real providers described by `config`.
    pub fn from_config(config: &ServerConfig) -> anyhow::Result<Self> {
        let roads = match &config.road_data.file {
            Some(path) => {
                info!(path = %path.display(), "serving road data from file");
                RoadSource::File(FileRoadSource::new(path))
            }
            None => {
                info!(url = %config.road_data.overpass.url, "serving road data from Overpass");
                RoadSource::Overpass(OverpassClient::new(config.road_data.overpass.clone())?)
            }
        };

        let directions = GoogleDirectionsClient::from_config(&config.directions)?;
        if directions.is_none() {
            warn!("no directions API key configured; comparison routes are disabled");
        }

        Ok(RouteService::new(roads, directions)
            .bbox_margin_deg(config.road_data.bbox_margin_deg)
            .snap(config.routing.snap)
            .duplicate_edges(config.routing.duplicate_edges))
    }
}

impl<R, D> RouteService<R, D>
where
    R: RoadDataSource,
    D: DirectionsSource,
{
    pub fn new(roads: R, directions: D) -> Self {
        Self {
            roads,
            directions,
            bbox_margin_deg: 0.01,
            snap: SnapStrategy::default(),
            duplicate_edges: DuplicateEdgePolicy::default(),
        }
    }

    pub fn bbox_margin_deg(mut self, margin: f64) -> Self {
        self.bbox_margin_deg = margin;
        self
    }

    pub fn snap(mut self, snap: SnapStrategy) -> Self {
        self.snap = snap;
        self
    }

    pub fn duplicate_edges(mut self, policy: DuplicateEdgePolicy) -> Self {
        self.duplicate_edges = policy;
        self
    }

    /// Compute the shortest road route from `start` to `end`.
    ///
    /// Road data and the comparison route are fetched concurrently.  A road
    /// data failure fails the whole call; a directions failure only empties
    /// [`RouteOutcome::comparison`].
    pub async fn calculate(&self, start: GeoPoint, end: GeoPoint) -> Result<RouteOutcome, ApiError> {
        let bbox = BoundingBox::around(start, end, self.bbox_margin_deg);

        let (roads, directions) = tokio::join!(
            self.roads.fetch_elements(bbox),
            self.directions.directions(start, end),
        );

        let elements = roads.map_err(ApiError::DataFetch)?;
        let comparison = match directions {
            Ok(route) => route,
            Err(e) => {
                warn!(error = %e, "comparison route unavailable");
                None
            }
        };

        let snap = self.snap;
        let policy = self.duplicate_edges;
        let route = tokio::task::spawn_blocking(move || {
            let network = RoadNetwork::from_elements(elements, policy);
            info!(
                nodes = network.node_count(),
                edges = network.edge_count(),
                "road network built"
            );
            plan_route(&network, &DijkstraRouter, snap, start, end)
        })
        .await
        .map_err(|e| ApiError::Internal(format!("route task failed: {e}")))??;

        info!(
            start = %route.start_node,
            end = %route.end_node,
            nodes = route.summary.node_count,
            distance_m = route.summary.distance_m,
            comparison = comparison.is_some(),
            "route calculated"
        );
        Ok(RouteOutcome { route, comparison })
    }
}
