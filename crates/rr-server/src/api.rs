//! HTTP routes and JSON bodies.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use rr_core::{GeoPoint, OsmId};
use rr_providers::{DirectionsRoute, DirectionsSource, RoadDataSource};

use crate::{ApiError, RouteOutcome, RouteService};

/// Build the application router around a shared [`RouteService`].
pub fn router<R, D>(service: Arc<RouteService<R, D>>) -> Router
where
    R: RoadDataSource + 'static,
    D: DirectionsSource + 'static,
{
    Router::new()
        .route("/api/calculate-route", post(calculate_route::<R, D>))
        .route("/api/health", get(health))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(service)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn calculate_route<R, D>(
    State(service): State<Arc<RouteService<R, D>>>,
    body: Result<Json<RouteRequest>, JsonRejection>,
) -> Result<Json<RouteResponse>, ApiError>
where
    R: RoadDataSource + 'static,
    D: DirectionsSource + 'static,
{
    let Json(request) = body.map_err(|e| ApiError::InvalidInput(e.body_text()))?;
    let (start, end) = request.endpoints()?;
    let outcome = service.calculate(start, end).await?;
    Ok(Json(RouteResponse::from(outcome)))
}

// ── Request ───────────────────────────────────────────────────────────────────

/// A coordinate as sent by clients: a JSON number or a numeric string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum CoordValue {
    Number(f64),
    Text(String),
}

impl CoordValue {
    fn as_f64(&self) -> Option<f64> {
        match self {
            CoordValue::Number(n) => Some(*n),
            CoordValue::Text(s) => s.trim().parse().ok(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteRequest {
    pub start_lat: Option<CoordValue>,
    pub start_lon: Option<CoordValue>,
    pub end_lat: Option<CoordValue>,
    pub end_lon: Option<CoordValue>,
}

impl RouteRequest {
    /// Validate all four coordinates and return `(start, end)`.
    pub fn endpoints(&self) -> Result<(GeoPoint, GeoPoint), ApiError> {
        let fields = [
            ("startLat", &self.start_lat),
            ("startLon", &self.start_lon),
            ("endLat", &self.end_lat),
            ("endLon", &self.end_lon),
        ];

        let mut values = [0.0; 4];
        let mut bad = Vec::new();
        for (i, (name, field)) in fields.iter().enumerate() {
            match field.as_ref().and_then(CoordValue::as_f64) {
                Some(v) => values[i] = v,
                None => bad.push(*name),
            }
        }
        if !bad.is_empty() {
            return Err(ApiError::InvalidInput(format!(
                "missing or non-numeric coordinates: {}",
                bad.join(", ")
            )));
        }

        let [start_lat, start_lon, end_lat, end_lon] = values;
        let start = GeoPoint::try_new(start_lat, start_lon)
            .map_err(|e| ApiError::InvalidInput(format!("start: {e}")))?;
        let end = GeoPoint::try_new(end_lat, end_lon)
            .map_err(|e| ApiError::InvalidInput(format!("end: {e}")))?;
        Ok((start, end))
    }
}

// ── Response ──────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteResponse {
    pub success: bool,
    pub dijkstra: DijkstraBody,
    /// `null` when the comparison provider is disabled or failed.
    pub google_maps: Option<GoogleMapsBody>,
    pub start_node: OsmId,
    pub end_node: OsmId,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DijkstraBody {
    /// Metres.
    pub distance: f64,
    pub distance_km: String,
    /// Number of nodes on the path.
    pub nodes: usize,
    /// `[lat, lon]` pairs in path order.
    pub coordinates: Vec<[f64; 2]>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleMapsBody {
    /// Seconds.
    pub travel_time: u64,
    /// Metres.
    pub distance: u64,
    pub travel_time_text: String,
    pub distance_text: String,
    pub polyline: String,
}

impl From<DirectionsRoute> for GoogleMapsBody {
    fn from(r: DirectionsRoute) -> Self {
        Self {
            travel_time: r.travel_time_s,
            distance: r.distance_m,
            travel_time_text: r.travel_time_text,
            distance_text: r.distance_text,
            polyline: r.polyline,
        }
    }
}

impl From<RouteOutcome> for RouteResponse {
    fn from(outcome: RouteOutcome) -> Self {
        let summary = &outcome.route.summary;
        Self {
            success: true,
            dijkstra: DijkstraBody {
                distance: summary.distance_m,
                distance_km: summary.distance_km_text(),
                nodes: summary.node_count,
                coordinates: summary.lat_lon_pairs(),
            },
            google_maps: outcome.comparison.map(GoogleMapsBody::from),
            start_node: outcome.route.start_node,
            end_node: outcome.route.end_node,
        }
    }
}
