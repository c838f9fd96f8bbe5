//! Provider traits.
//!
//! Both traits return `Send` futures so implementations can be driven from
//! a multi-threaded runtime (e.g. inside an axum handler).

use std::future::Future;

use rr_core::{BoundingBox, GeoPoint};
use rr_spatial::RoadElement;

use crate::ProviderResult;

/// Supplies raw road elements for a bounding box.
pub trait RoadDataSource: Send + Sync {
    fn fetch_elements(
        &self,
        bbox: BoundingBox,
    ) -> impl Future<Output = ProviderResult<Vec<RoadElement>>> + Send;
}

/// A comparison route from a commercial directions service.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectionsRoute {
    /// Travel time in seconds, traffic-adjusted when the provider offers it.
    pub travel_time_s: u64,
    pub distance_m: u64,
    pub travel_time_text: String,
    pub distance_text: String,
    /// Encoded polyline of the whole route.
    pub polyline: String,
}

/// Supplies a comparison route between two points.
///
/// `Ok(None)` means the provider answered but has no route (or is disabled);
/// `Err` means the call itself failed.
pub trait DirectionsSource: Send + Sync {
    fn directions(
        &self,
        origin: GeoPoint,
        destination: GeoPoint,
    ) -> impl Future<Output = ProviderResult<Option<DirectionsRoute>>> + Send;
}

/// An absent source is a disabled one: it always answers "no route".
impl<T: DirectionsSource> DirectionsSource for Option<T> {
    async fn directions(
        &self,
        origin: GeoPoint,
        destination: GeoPoint,
    ) -> ProviderResult<Option<DirectionsRoute>> {
        match self {
            Some(inner) => inner.directions(origin, destination).await,
            None => Ok(None),
        }
    }
}
