//! Unit tests for rr-server.
//!
//! Providers are replaced by in-memory stubs; the HTTP layer is driven with
//! `tower::ServiceExt::oneshot` so no socket is opened.

#[cfg(test)]
mod stubs {
    use rr_core::{BoundingBox, GeoPoint};
    use rr_providers::{DirectionsRoute, DirectionsSource, ProviderError, ProviderResult, RoadDataSource};
    use rr_spatial::RoadElement;

    pub struct StubRoads(pub Vec<RoadElement>);

    impl RoadDataSource for StubRoads {
        async fn fetch_elements(&self, _bbox: BoundingBox) -> ProviderResult<Vec<RoadElement>> {
            Ok(self.0.clone())
        }
    }

    pub struct FailingRoads;

    impl RoadDataSource for FailingRoads {
        async fn fetch_elements(&self, _bbox: BoundingBox) -> ProviderResult<Vec<RoadElement>> {
            Err(ProviderError::Status { provider: "overpass", status: 504 })
        }
    }

    pub struct StubDirections(pub Option<DirectionsRoute>);

    impl DirectionsSource for StubDirections {
        async fn directions(
            &self,
            _origin: GeoPoint,
            _destination: GeoPoint,
        ) -> ProviderResult<Option<DirectionsRoute>> {
            Ok(self.0.clone())
        }
    }

    pub struct FailingDirections;

    impl DirectionsSource for FailingDirections {
        async fn directions(
            &self,
            _origin: GeoPoint,
            _destination: GeoPoint,
        ) -> ProviderResult<Option<DirectionsRoute>> {
            Err(ProviderError::Timeout { provider: "google directions" })
        }
    }

    /// Three points along the equator, ~111 m apart, joined by one segment.
    pub fn line_elements() -> Vec<RoadElement> {
        vec![
            RoadElement::point(1, 0.0, 0.0),
            RoadElement::point(2, 0.0, 0.001),
            RoadElement::point(3, 0.0, 0.002),
            RoadElement::segment([1, 2, 3]),
        ]
    }

    /// Two unconnected two-node roads.
    pub fn split_elements() -> Vec<RoadElement> {
        vec![
            RoadElement::point(1, 0.0, 0.0),
            RoadElement::point(2, 0.0, 0.001),
            RoadElement::point(3, 0.01, 0.0),
            RoadElement::point(4, 0.01, 0.001),
            RoadElement::segment([1, 2]),
            RoadElement::segment([3, 4]),
        ]
    }

    pub fn comparison() -> DirectionsRoute {
        DirectionsRoute {
            travel_time_s: 42,
            distance_m: 230,
            travel_time_text: "1 min".into(),
            distance_text: "0.2 km".into(),
            polyline: "abc".into(),
        }
    }
}

// ── RouteService ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod service {
    use rr_core::{GeoPoint, OsmId};
    use crate::{ApiError, RouteService};
    use super::stubs::*;

    fn start() -> GeoPoint { GeoPoint::new(0.0, 0.0) }
    fn end() -> GeoPoint { GeoPoint::new(0.0, 0.002) }

    #[tokio::test]
    async fn line_route_with_comparison() {
        let service = RouteService::new(
            StubRoads(line_elements()),
            StubDirections(Some(comparison())),
        );
        let out = service.calculate(start(), end()).await.unwrap();

        assert_eq!(out.route.start_node, OsmId(1));
        assert_eq!(out.route.end_node, OsmId(3));
        assert_eq!(out.route.summary.node_count, 3);
        let expected = start().distance_m(end());
        assert!((out.route.summary.distance_m - expected).abs() < 1e-6);
        assert_eq!(out.comparison, Some(comparison()));
    }

    #[tokio::test]
    async fn directions_failure_is_soft() {
        let service = RouteService::new(StubRoads(line_elements()), FailingDirections);
        let out = service.calculate(start(), end()).await.unwrap();
        assert_eq!(out.route.summary.node_count, 3);
        assert!(out.comparison.is_none());
    }

    #[tokio::test]
    async fn disabled_directions_yield_none() {
        let service = RouteService::new(StubRoads(line_elements()), None::<StubDirections>);
        let out = service.calculate(start(), end()).await.unwrap();
        assert!(out.comparison.is_none());
    }

    #[tokio::test]
    async fn empty_road_data_is_no_nearby_road() {
        let service = RouteService::new(StubRoads(Vec::new()), StubDirections(None));
        let err = service.calculate(start(), end()).await.unwrap_err();
        assert!(matches!(err, ApiError::NoNearbyRoad));
    }

    #[tokio::test]
    async fn disconnected_roads_are_no_path() {
        let service = RouteService::new(StubRoads(split_elements()), StubDirections(None));
        let err = service
            .calculate(GeoPoint::new(0.0, 0.0), GeoPoint::new(0.01, 0.001))
            .await
            .unwrap_err();
        match err {
            ApiError::NoPath { from, to } => {
                assert_eq!(from, OsmId(1));
                assert_eq!(to, OsmId(4));
            }
            other => panic!("expected NoPath, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn road_failure_is_fatal() {
        let service = RouteService::new(FailingRoads, StubDirections(Some(comparison())));
        let err = service.calculate(start(), end()).await.unwrap_err();
        assert!(matches!(err, ApiError::DataFetch(_)));
    }

    #[tokio::test]
    async fn same_point_is_single_node_route() {
        let service = RouteService::new(StubRoads(line_elements()), StubDirections(None));
        let p = GeoPoint::new(0.0, 0.001);
        let out = service.calculate(p, p).await.unwrap();
        assert_eq!(out.route.start_node, OsmId(2));
        assert_eq!(out.route.end_node, OsmId(2));
        assert_eq!(out.route.summary.node_count, 1);
        assert_eq!(out.route.summary.distance_m, 0.0);
    }
}

// ── HTTP ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod api {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use rr_providers::{DirectionsSource, RoadDataSource};
    use crate::{RouteService, router};
    use super::stubs::*;

    async fn call<R, D>(service: RouteService<R, D>, request: Request<Body>) -> (StatusCode, Value)
    where
        R: RoadDataSource + 'static,
        D: DirectionsSource + 'static,
    {
        let response = router(Arc::new(service)).oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn post(body: impl Into<Body>) -> Request<Body> {
        Request::post("/api/calculate-route")
            .header(header::CONTENT_TYPE, "application/json")
            .body(body.into())
            .unwrap()
    }

    fn line_body() -> String {
        json!({ "startLat": 0.0, "startLon": 0.0, "endLat": 0.0, "endLon": 0.002 }).to_string()
    }

    #[tokio::test]
    async fn route_success_body() {
        let service = RouteService::new(StubRoads(line_elements()), None::<StubDirections>);
        let (status, body) = call(service, post(line_body())).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], json!(true));
        assert_eq!(body["startNode"], json!(1));
        assert_eq!(body["endNode"], json!(3));
        assert_eq!(body["dijkstra"]["nodes"], json!(3));
        assert_eq!(body["dijkstra"]["distanceKm"], json!("0.22"));
        assert_eq!(body["dijkstra"]["coordinates"][1], json!([0.0, 0.001]));
        assert!(body["dijkstra"]["distance"].as_f64().unwrap() > 222.0);
        // present but null when no comparison is available
        assert!(body.as_object().unwrap().contains_key("googleMaps"));
        assert!(body["googleMaps"].is_null());
    }

    #[tokio::test]
    async fn failing_directions_still_return_route() {
        let service = RouteService::new(StubRoads(line_elements()), FailingDirections);
        let (status, body) = call(service, post(line_body())).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], json!(true));
        assert!(body.as_object().unwrap().contains_key("googleMaps"));
        assert!(body["googleMaps"].is_null());
        assert_eq!(body["dijkstra"]["nodes"], json!(3));
        assert_eq!(body["startNode"], json!(1));
        assert_eq!(body["endNode"], json!(3));
    }

    #[tokio::test]
    async fn comparison_fields_are_camel_case() {
        let service = RouteService::new(StubRoads(line_elements()), StubDirections(Some(comparison())));
        let (status, body) = call(service, post(line_body())).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["googleMaps"]["travelTime"], json!(42));
        assert_eq!(body["googleMaps"]["distance"], json!(230));
        assert_eq!(body["googleMaps"]["travelTimeText"], json!("1 min"));
        assert_eq!(body["googleMaps"]["distanceText"], json!("0.2 km"));
        assert_eq!(body["googleMaps"]["polyline"], json!("abc"));
    }

    #[tokio::test]
    async fn numeric_strings_are_accepted() {
        let service = RouteService::new(StubRoads(line_elements()), None::<StubDirections>);
        let request = post(
            json!({ "startLat": "0", "startLon": "0.0", "endLat": "0", "endLon": " 0.002 " }).to_string(),
        );
        let (status, body) = call(service, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["endNode"], json!(3));
    }

    #[tokio::test]
    async fn missing_coordinate_is_bad_request() {
        let service = RouteService::new(StubRoads(line_elements()), None::<StubDirections>);
        let request = post(json!({ "startLat": 0.0, "startLon": 0.0, "endLat": 0.0 }).to_string());
        let (status, body) = call(service, request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], json!(false));
        assert!(body["error"].as_str().unwrap().contains("endLon"));
    }

    #[tokio::test]
    async fn non_numeric_and_out_of_range_are_bad_request() {
        let service = Arc::new(RouteService::new(StubRoads(line_elements()), None::<StubDirections>));

        for payload in [
            json!({ "startLat": "north", "startLon": 0.0, "endLat": 0.0, "endLon": 0.002 }),
            json!({ "startLat": 91.0, "startLon": 0.0, "endLat": 0.0, "endLon": 0.002 }),
            json!({ "startLat": 0.0, "startLon": 0.0, "endLat": 0.0, "endLon": -181.0 }),
        ] {
            let response = router(service.clone()).oneshot(post(payload.to_string())).await.unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "payload {payload}");
        }
    }

    #[tokio::test]
    async fn malformed_json_is_bad_request() {
        let service = RouteService::new(StubRoads(line_elements()), None::<StubDirections>);
        let (status, body) = call(service, post("{ not json")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], json!(false));
    }

    #[tokio::test]
    async fn empty_network_is_not_found() {
        let service = RouteService::new(StubRoads(Vec::new()), None::<StubDirections>);
        let (status, body) = call(service, post(line_body())).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["success"], json!(false));
    }

    #[tokio::test]
    async fn disconnected_is_not_found() {
        let service = RouteService::new(StubRoads(split_elements()), None::<StubDirections>);
        let request = post(
            json!({ "startLat": 0.0, "startLon": 0.0, "endLat": 0.01, "endLon": 0.001 }).to_string(),
        );
        let (status, body) = call(service, request).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["error"].as_str().unwrap().contains("no path"));
    }

    #[tokio::test]
    async fn road_failure_is_bad_gateway() {
        let service = RouteService::new(FailingRoads, None::<StubDirections>);
        let (status, body) = call(service, post(line_body())).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["success"], json!(false));
    }

    #[tokio::test]
    async fn health_is_ok() {
        let service = RouteService::new(StubRoads(Vec::new()), None::<StubDirections>);
        let request = Request::get("/api/health").body(Body::empty()).unwrap();
        let (status, body) = call(service, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], json!("ok"));
    }
}

// ── Configuration ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod config {
    use std::path::PathBuf;

    use rr_spatial::{DuplicateEdgePolicy, SnapStrategy};
    use crate::{ConfigError, ServerConfig};

    #[test]
    fn defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.port, 3000);
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:3000");
        assert_eq!(config.road_data.bbox_margin_deg, 0.01);
        assert!(config.road_data.file.is_none());
        assert_eq!(config.road_data.overpass.timeout_secs, 30);
        assert_eq!(config.directions.timeout_secs, 10);
        assert_eq!(config.routing.snap, SnapStrategy::Linear);
        assert_eq!(config.routing.duplicate_edges, DuplicateEdgePolicy::KeepMinimum);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn empty_document_is_defaults() {
        let config = ServerConfig::from_toml("").unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.routing.snap, SnapStrategy::Linear);
    }

    #[test]
    fn partial_document_overrides() {
        let config = ServerConfig::from_toml(
            r#"
            port = 8080

            [road_data]
            bbox_margin_deg = 0.05
            file = "fixtures/mobile.json"

            [road_data.overpass]
            timeout_secs = 60

            [routing]
            snap = "rtree"
            duplicate_edges = "last_write"
            "#,
        )
        .unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.road_data.bbox_margin_deg, 0.05);
        assert_eq!(config.road_data.file, Some(PathBuf::from("fixtures/mobile.json")));
        assert_eq!(config.road_data.overpass.timeout_secs, 60);
        assert_eq!(config.directions.timeout_secs, 10);
        assert_eq!(config.routing.snap, SnapStrategy::RTree);
        assert_eq!(config.routing.duplicate_edges, DuplicateEdgePolicy::LastWrite);
    }

    #[test]
    fn negative_margin_is_rejected() {
        let err = ServerConfig::from_toml("[road_data]\nbbox_margin_deg = -1.0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let err = ServerConfig::from_toml("[directions]\ntimeout_secs = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn bad_toml_is_parse_error() {
        let err = ServerConfig::from_toml("port = \"many\"").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = ServerConfig::load(Some(std::path::Path::new("/nonexistent/rr.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn no_file_is_defaults() {
        let config = ServerConfig::load(None).unwrap();
        assert_eq!(config.port, 3000);
    }
}
