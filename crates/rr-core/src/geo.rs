//! Geographic coordinate type and great-circle geometry.
//!
//! `GeoPoint` uses `f64` latitude/longitude.  Road segments in the input data
//! are often a few metres long, and path lengths are summed over hundreds of
//! them, so single precision is not enough here.

use crate::{CoreError, CoreResult};

/// Mean Earth radius in metres (IUGG).
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A WGS-84 geographic coordinate.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    #[inline]
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Construct a point from untrusted input.
    ///
    /// Rejects non-finite values, latitudes outside `[-90, 90]` and
    /// longitudes outside `[-180, 180]`.
    pub fn try_new(lat: f64, lon: f64) -> CoreResult<Self> {
        let valid = lat.is_finite()
            && lon.is_finite()
            && (-90.0..=90.0).contains(&lat)
            && (-180.0..=180.0).contains(&lon);
        if valid {
            Ok(Self { lat, lon })
        } else {
            Err(CoreError::InvalidCoordinate { lat, lon })
        }
    }

    /// Haversine great-circle distance in metres.
    ///
    /// Symmetric in its arguments and exactly `0.0` for identical points.
    /// NaN inputs propagate; validating coordinates is the caller's job.
    pub fn distance_m(self, other: GeoPoint) -> f64 {
        let d_lat = (other.lat - self.lat).to_radians();
        let d_lon = (other.lon - self.lon).to_radians();

        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();

        let a = (d_lat * 0.5).sin().powi(2)
            + lat1.cos() * lat2.cos() * (d_lon * 0.5).sin().powi(2);

        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        EARTH_RADIUS_M * c
    }

    /// Position on the unit sphere as `[x, y, z]`.
    ///
    /// Straight-line (chord) distance between two such vectors grows
    /// monotonically with great-circle distance, which lets a Euclidean
    /// spatial index answer great-circle nearest-neighbour queries.
    pub fn unit_vector(self) -> [f64; 3] {
        let lat = self.lat.to_radians();
        let lon = self.lon.to_radians();
        [lat.cos() * lon.cos(), lat.cos() * lon.sin(), lat.sin()]
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lon)
    }
}

// ── BoundingBox ───────────────────────────────────────────────────────────────

/// Rectangular lat/lon region used to scope a road-data query.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoundingBox {
    pub min_lat: f64,
    pub min_lon: f64,
    pub max_lat: f64,
    pub max_lon: f64,
}

impl BoundingBox {
    /// The smallest box containing both `a` and `b`, grown by `margin_deg`
    /// degrees on every side and clamped to the valid WGS-84 range.
    pub fn around(a: GeoPoint, b: GeoPoint, margin_deg: f64) -> Self {
        Self {
            min_lat: (a.lat.min(b.lat) - margin_deg).max(-90.0),
            min_lon: (a.lon.min(b.lon) - margin_deg).max(-180.0),
            max_lat: (a.lat.max(b.lat) + margin_deg).min(90.0),
            max_lon: (a.lon.max(b.lon) + margin_deg).min(180.0),
        }
    }

    #[inline]
    pub fn contains(&self, p: GeoPoint) -> bool {
        (self.min_lat..=self.max_lat).contains(&p.lat)
            && (self.min_lon..=self.max_lon).contains(&p.lon)
    }
}

impl std::fmt::Display for BoundingBox {
    /// Overpass QL order: `south,west,north,east`.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:.6},{:.6},{:.6},{:.6}",
            self.min_lat, self.min_lon, self.max_lat, self.max_lon
        )
    }
}
