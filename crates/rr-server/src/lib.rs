//! `rr-server` — HTTP surface for the rust_route engine.
//!
//! # Request flow
//!
//! ```text
//! POST /api/calculate-route
//!   ① validate {startLat, startLon, endLat, endLon}       → 400 on failure
//!   ② concurrently:
//!        road data   (Overpass or file)                    → 502 on failure
//!        directions  (Google, optional)                    → null on failure
//!   ③ build network → snap ×2 → Dijkstra → metrics         → 404 if no road / no path
//! ```
//!
//! # Crate layout
//!
//! | Module        | Contents                                              |
//! |---------------|-------------------------------------------------------|
//! | [`config`]    | `ServerConfig` (TOML file + CLI + environment)        |
//! | [`service`]   | `RouteService`, `RoadSource`, `RouteOutcome`          |
//! | [`api`]       | axum `Router`, request/response bodies                |
//! | [`error`]     | `ApiError` and its HTTP mapping                       |
//! | [`telemetry`] | `tracing-subscriber` initialisation                   |

pub mod api;
pub mod config;
pub mod error;
pub mod service;
pub mod telemetry;

#[cfg(test)]
mod tests;

pub use api::router;
pub use config::{ConfigError, ServerConfig};
pub use error::ApiError;
pub use service::{RoadSource, RouteOutcome, RouteService};
