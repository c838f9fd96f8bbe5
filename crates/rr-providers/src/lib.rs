//! `rr-providers` — adapters for the two external services a route request
//! depends on.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                |
//! |----------------|---------------------------------------------------------|
//! | [`source`]     | `RoadDataSource`, `DirectionsSource`, `DirectionsRoute` |
//! | [`overpass`]   | `OverpassClient`, Overpass QL query + JSON decoding     |
//! | [`file`]       | `FileRoadSource` (saved Overpass JSON, offline use)     |
//! | [`directions`] | `GoogleDirectionsClient`                                |
//! | [`error`]      | `ProviderError`, `ProviderResult<T>`                    |
//!
//! Road data is mandatory for a route; directions are a best-effort
//! comparison.  The traits do not encode that policy — callers do.

pub mod directions;
pub mod error;
pub mod file;
pub mod overpass;
pub mod source;


pub use directions::{DirectionsConfig, GoogleDirectionsClient};
pub use error::{ProviderError, ProviderResult};
pub use file::FileRoadSource;
pub use overpass::{OverpassClient, OverpassConfig};
pub use source::{DirectionsRoute, DirectionsSource, RoadDataSource};
