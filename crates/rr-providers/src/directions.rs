//! Google Directions comparison-route provider.
//!
//! Requests `departure_time=now` so the response carries a traffic-adjusted
//! `duration_in_traffic` where Google has one.  Only the first route's
//! first leg is used; origin and destination are single points, so there is
//! exactly one leg.

use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use rr_core::GeoPoint;

use crate::{DirectionsRoute, DirectionsSource, ProviderError, ProviderResult};

const PROVIDER: &str = "google directions";

// ── Configuration ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DirectionsConfig {
    /// API root, without the `/maps/api/directions/json` path.
    pub base_url: String,
    pub timeout_secs: u64,
    /// Without a key the provider is disabled.
    pub api_key: Option<String>,
}

impl Default for DirectionsConfig {
    fn default() -> Self {
        Self {
            base_url: "https://maps.googleapis.com".to_string(),
            timeout_secs: 10,
            api_key: None,
        }
    }
}

// ── Wire types ────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct DirectionsResponse {
    status: String,
    #[serde(default)]
    error_message: Option<String>,
    #[serde(default)]
    routes: Vec<WireRoute>,
}

#[derive(Debug, Deserialize)]
struct WireRoute {
    #[serde(default)]
    legs: Vec<WireLeg>,
    overview_polyline: WirePolyline,
}

#[derive(Debug, Deserialize)]
struct WireLeg {
    duration: TextValue,
    #[serde(default)]
    duration_in_traffic: Option<TextValue>,
    distance: TextValue,
}

#[derive(Debug, Deserialize)]
struct TextValue {
    text: String,
    value: u64,
}

#[derive(Debug, Deserialize)]
struct WirePolyline {
    points: String,
}

/// Decode a Directions API JSON body.
///
/// `ZERO_RESULTS` and an `OK` response without legs both mean "no route";
/// any other non-`OK` status is an upstream error.
pub fn parse_directions(body: &[u8]) -> ProviderResult<Option<DirectionsRoute>> {
    let response: DirectionsResponse = serde_json::from_slice(body)
        .map_err(|source| ProviderError::Decode { provider: PROVIDER, source })?;

    match response.status.as_str() {
        "OK" => {}
        "ZERO_RESULTS" | "NOT_FOUND" => return Ok(None),
        _ => {
            return Err(ProviderError::Upstream {
                provider: PROVIDER,
                message:  response.error_message.unwrap_or_default(),
                status:   response.status,
            });
        }
    }

    let Some(route) = response.routes.into_iter().next() else {
        return Ok(None);
    };
    let Some(leg) = route.legs.into_iter().next() else {
        return Ok(None);
    };

    let travel = leg.duration_in_traffic.unwrap_or(leg.duration);
    Ok(Some(DirectionsRoute {
        travel_time_s:    travel.value,
        distance_m:       leg.distance.value,
        travel_time_text: travel.text,
        distance_text:    leg.distance.text,
        polyline:         route.overview_polyline.points,
    }))
}

// ── Client ────────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct GoogleDirectionsClient {
    http:     reqwest::Client,
    endpoint: String,
    api_key:  String,
}

impl GoogleDirectionsClient {
    /// Build a client, or `Ok(None)` when no API key is configured.
    pub fn from_config(config: &DirectionsConfig) -> ProviderResult<Option<Self>> {
        let Some(api_key) = config.api_key.clone().filter(|k| !k.is_empty()) else {
            return Ok(None);
        };
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ProviderError::http(PROVIDER, e))?;
        let endpoint = format!(
            "{}/maps/api/directions/json",
            config.base_url.trim_end_matches('/')
        );
        Ok(Some(Self { http, endpoint, api_key }))
    }
}

impl DirectionsSource for GoogleDirectionsClient {
    async fn directions(
        &self,
        origin: GeoPoint,
        destination: GeoPoint,
    ) -> ProviderResult<Option<DirectionsRoute>> {
        let origin = format!("{},{}", origin.lat, origin.lon);
        let destination = format!("{},{}", destination.lat, destination.lon);
        debug!(%origin, %destination, "requesting comparison route");

        let response = self
            .http
            .get(&self.endpoint)
            .query(&[
                ("origin", origin.as_str()),
                ("destination", destination.as_str()),
                ("departure_time", "now"),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(|e| ProviderError::http(PROVIDER, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Status { provider: PROVIDER, status: status.as_u16() });
        }

        let body = response.bytes().await.map_err(|e| ProviderError::http(PROVIDER, e))?;
        parse_directions(&body)
    }
}
