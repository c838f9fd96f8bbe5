//! Server configuration.
//!
//! Sources, later ones winning:
//!
//! 1. Built-in defaults ([`ServerConfig::default`]).
//! 2. An optional TOML file.
//! 3. Command-line flags (applied by `main`).
//! 4. `GOOGLE_MAPS_API_KEY` from the environment (or a `.env` file).
//!
//! ```toml
//! port = 3000
//!
//! [road_data]
//! bbox_margin_deg = 0.01
//! # file = "fixtures/mobile.json"   # serve saved Overpass JSON instead
//!
//! [road_data.overpass]
//! url = "https://overpass-api.de/api/interpreter"
//! timeout_secs = 30
//!
//! [directions]
//! timeout_secs = 10
//!
//! [routing]
//! snap = "linear"                   # or "rtree"
//! duplicate_edges = "keep_minimum"  # or "last_write"
//! ```

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use rr_providers::{DirectionsConfig, OverpassConfig};
use rr_spatial::{DuplicateEdgePolicy, SnapStrategy};

/// Environment variable holding the Google Directions API key.
pub const API_KEY_ENV: &str = "GOOGLE_MAPS_API_KEY";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("configuration error: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: IpAddr,
    pub port: u16,
    pub road_data: RoadDataConfig,
    pub directions: DirectionsConfig,
    pub routing: RoutingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RoadDataConfig {
    /// Degrees added on every side of the endpoints' bounding box.
    pub bbox_margin_deg: f64,
    /// Serve this saved Overpass document instead of querying Overpass.
    pub file: Option<PathBuf>,
    pub overpass: OverpassConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RoutingConfig {
    pub snap: SnapStrategy,
    pub duplicate_edges: DuplicateEdgePolicy,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 3000,
            road_data: RoadDataConfig::default(),
            directions: DirectionsConfig::default(),
            routing: RoutingConfig::default(),
        }
    }
}

impl Default for RoadDataConfig {
    fn default() -> Self {
        Self {
            bbox_margin_deg: 0.01,
            file: None,
            overpass: OverpassConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Parse a TOML document; missing keys take their defaults.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let config: ServerConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path`, or return the defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => {
                let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })?;
                Self::from_toml(&text)
            }
            None => Ok(Self::default()),
        }
    }

    /// Fill the directions API key from the environment unless the file
    /// already set one.
    pub fn apply_env(&mut self) {
        if self.directions.api_key.is_none() {
            self.directions.api_key = std::env::var(API_KEY_ENV).ok().filter(|k| !k.is_empty());
        }
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.port)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let margin = self.road_data.bbox_margin_deg;
        if !(margin.is_finite() && margin >= 0.0) {
            return Err(ConfigError::Invalid(format!(
                "road_data.bbox_margin_deg must be a non-negative number, got {margin}"
            )));
        }
        if self.road_data.overpass.timeout_secs == 0 || self.directions.timeout_secs == 0 {
            return Err(ConfigError::Invalid("provider timeouts must be at least 1 second".into()));
        }
        Ok(())
    }
}
