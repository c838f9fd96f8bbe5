//! Raw map-element records consumed by the network builder.

use rr_core::{GeoPoint, OsmId};

/// One record from a road-data provider.
///
/// Providers decode their own wire formats into this two-case variant; the
/// builder resolves it once during ingestion and nothing downstream sees it.
#[derive(Debug, Clone, PartialEq)]
pub enum RoadElement {
    /// A geographic point that road segments refer to by id.
    Point { id: OsmId, pos: GeoPoint },
    /// An ordered chain of point ids forming one contiguous stretch of road.
    Segment { nodes: Vec<OsmId> },
}

impl RoadElement {
    #[inline]
    pub fn point(id: i64, lat: f64, lon: f64) -> Self {
        RoadElement::Point { id: OsmId(id), pos: GeoPoint::new(lat, lon) }
    }

    #[inline]
    pub fn segment<I: IntoIterator<Item = i64>>(ids: I) -> Self {
        RoadElement::Segment { nodes: ids.into_iter().map(OsmId).collect() }
    }
}
