//! Overpass API road-data provider.
//!
//! # Query
//!
//! One Overpass QL request per route: every drivable `highway=*` way inside
//! the bounding box, recursed down to its member nodes.
//!
//! ```text
//! [out:json][timeout:25];
//! way["highway"~"^(motorway|...|living_street)$"](south,west,north,east);
//! (._;>;);
//! out body;
//! ```
//!
//! # Response
//!
//! The JSON `elements` array mixes `node`, `way` and (rarely) other records.
//! Nodes and ways map onto [`RoadElement`]; everything else is ignored at
//! decode time.

use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, info};

use rr_core::{BoundingBox, GeoPoint, OsmId};
use rr_spatial::RoadElement;

use crate::{ProviderError, ProviderResult, RoadDataSource};

const PROVIDER: &str = "overpass";

/// Road classes requested from Overpass.  Footways, cycleways, tracks and
/// similar non-car ways are left out.
pub const HIGHWAY_FILTER: &str = "^(motorway|motorway_link|trunk|trunk_link|primary|primary_link|\
secondary|secondary_link|tertiary|tertiary_link|unclassified|residential|living_street|service)$";

// ── Configuration ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OverpassConfig {
    /// Interpreter endpoint.
    pub url: String,
    /// Whole-request timeout enforced on our side.
    pub timeout_secs: u64,
    /// Server-side `[timeout:N]` put into the query.
    pub query_timeout_secs: u64,
}

impl Default for OverpassConfig {
    fn default() -> Self {
        Self {
            url: "https://overpass-api.de/api/interpreter".to_string(),
            timeout_secs: 30,
            query_timeout_secs: 25,
        }
    }
}

// ── Query building ────────────────────────────────────────────────────────────

/// Overpass QL for all road ways (and their nodes) inside `bbox`.
pub fn build_query(bbox: &BoundingBox, query_timeout_secs: u64) -> String {
    format!(
        "[out:json][timeout:{query_timeout_secs}];\n\
         way[\"highway\"~\"{HIGHWAY_FILTER}\"]({bbox});\n\
         (._;>;);\n\
         out body;"
    )
}

// ── Wire types ────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct OverpassResponse {
    #[serde(default)]
    elements: Vec<OverpassElement>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum OverpassElement {
    Node { id: i64, lat: f64, lon: f64 },
    Way {
        #[serde(default)]
        nodes: Vec<i64>,
    },
    #[serde(other)]
    Other,
}

impl OverpassElement {
    fn into_road_element(self) -> Option<RoadElement> {
        match self {
            OverpassElement::Node { id, lat, lon } => {
                Some(RoadElement::Point { id: OsmId(id), pos: GeoPoint::new(lat, lon) })
            }
            OverpassElement::Way { nodes } => {
                Some(RoadElement::Segment { nodes: nodes.into_iter().map(OsmId).collect() })
            }
            OverpassElement::Other => None,
        }
    }
}

/// Decode an Overpass `[out:json]` document into road elements.
pub fn parse_elements(body: &[u8]) -> ProviderResult<Vec<RoadElement>> {
    let response: OverpassResponse = serde_json::from_slice(body)
        .map_err(|source| ProviderError::Decode { provider: PROVIDER, source })?;
    Ok(response
        .elements
        .into_iter()
        .filter_map(OverpassElement::into_road_element)
        .collect())
}

// ── Client ────────────────────────────────────────────────────────────────────

/// Fetches road elements from an Overpass API endpoint.
#[derive(Clone)]
pub struct OverpassClient {
    http:   reqwest::Client,
    config: OverpassConfig,
}

impl OverpassClient {
    pub fn new(config: OverpassConfig) -> ProviderResult<Self> {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(config.timeout_secs.min(10)))
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("rust_route/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ProviderError::http(PROVIDER, e))?;
        Ok(Self { http, config })
    }
}

impl RoadDataSource for OverpassClient {
    async fn fetch_elements(&self, bbox: BoundingBox) -> ProviderResult<Vec<RoadElement>> {
        let query = build_query(&bbox, self.config.query_timeout_secs);
        debug!("Overpass query:\n{}", query);

        let response = self
            .http
            .post(&self.config.url)
            .header(reqwest::header::CONTENT_TYPE, "text/plain")
            .body(query)
            .send()
            .await
            .map_err(|e| ProviderError::http(PROVIDER, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Status { provider: PROVIDER, status: status.as_u16() });
        }

        let body = response.bytes().await.map_err(|e| ProviderError::http(PROVIDER, e))?;
        let elements = parse_elements(&body)?;
        info!(%bbox, elements = elements.len(), bytes = body.len(), "fetched road data");
        Ok(elements)
    }
}
