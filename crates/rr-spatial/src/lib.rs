//! `rr-spatial` — road network, node snapping, routing, and route metrics.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                   |
//! |-------------|------------------------------------------------------------|
//! | [`element`] | `RoadElement` (point / segment input records)              |
//! | [`network`] | `RoadNetwork` (CSR), `RoadNetworkBuilder`, edge policies   |
//! | [`index`]   | `NodeIndex` (R-tree), `SnapStrategy`                       |
//! | [`router`]  | `Router` trait, `Path`, `DijkstraRouter`                   |
//! | [`metrics`] | `path_length_m`, `path_coordinates`, `RouteSummary`        |
//! | [`planner`] | `plan_route` (snap → route → metrics), `PlanError`         |
//! | [`error`]   | `SpatialError`, `SpatialResult<T>`                         |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on public types.           |

pub mod element;
pub mod error;
pub mod index;
pub mod metrics;
pub mod network;
pub mod planner;
pub mod router;


pub use element::RoadElement;
pub use error::{SpatialError, SpatialResult};
pub use index::{NodeIndex, SnapStrategy};
pub use metrics::{RouteSummary, path_coordinates, path_length_m};
pub use network::{DuplicateEdgePolicy, RoadNetwork, RoadNetworkBuilder};
pub use planner::{PlanError, PlannedRoute, plan_route};
pub use router::{DijkstraRouter, Path, Router};
