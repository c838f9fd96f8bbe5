//! `rr-core` — foundational types for the `rust_route` routing engine.
//!
//! This crate is a dependency of every other `rr-*` crate.  It has no `rr-*`
//! dependencies and only `thiserror` (plus optional `serde`) externally.
//!
//! # What lives here
//!
//! | Module    | Contents                                                  |
//! |-----------|-----------------------------------------------------------|
//! | [`ids`]   | `NodeId`, `EdgeId` (dense indices), `OsmId` (provider id) |
//! | [`geo`]   | `GeoPoint`, haversine distance, `BoundingBox`             |
//! | [`error`] | `CoreError`, `CoreResult`                                 |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod error;
pub mod geo;
pub mod ids;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{CoreError, CoreResult};
pub use geo::{BoundingBox, EARTH_RADIUS_M, GeoPoint};
pub use ids::{EdgeId, NodeId, OsmId};
