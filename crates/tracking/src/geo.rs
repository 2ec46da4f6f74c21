//! Spherical-earth geometry helpers.

use serde::{Deserialize, Serialize};

/// Mean Earth radius used by every distance and offset calculation.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A geographic coordinate in degrees.
///
/// Values are treated as opaque coordinates: nothing here clamps or
/// normalises out-of-range latitudes or longitudes.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    #[must_use]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Haversine great-circle distance to `other`, in kilometres.
    #[must_use]
    pub fn distance_km(&self, other: &Self) -> f64 {
        let d_lat = (other.lat - self.lat).to_radians();
        let d_lng = (other.lng - self.lng).to_radians();
        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();

        let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lng / 2.0).sin().powi(2);
        let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
        EARTH_RADIUS_KM * c
    }

    /// Destination reached by travelling `distance_km` from this point at
    /// `bearing_deg` (clockwise from north) along a great circle.
    #[must_use]
    pub fn offset(&self, distance_km: f64, bearing_deg: f64) -> Self {
        let bearing = bearing_deg.to_radians();
        let lat1 = self.lat.to_radians();
        let lng1 = self.lng.to_radians();
        let angular = distance_km / EARTH_RADIUS_KM;

        let lat2 = (lat1.sin() * angular.cos() + lat1.cos() * angular.sin() * bearing.cos()).asin();
        let lng2 = lng1
            + (bearing.sin() * angular.sin() * lat1.cos())
                .atan2(angular.cos() - lat1.sin() * lat2.sin());

        Self { lat: lat2.to_degrees(), lng: lng2.to_degrees() }
    }

    /// Straight-line interpolation in degree space.
    ///
    /// This is not a great-circle interpolation. Over the short approach
    /// offset the difference is cosmetic; over long legs the path drifts
    /// from the true geodesic.
    #[must_use]
    pub fn lerp(&self, other: &Self, t: f64) -> Self {
        Self {
            lat: (other.lat - self.lat).mul_add(t, self.lat),
            lng: (other.lng - self.lng).mul_add(t, self.lng),
        }
    }

    /// Degree-space midpoint, used to centre the map on a trip.
    #[must_use]
    pub fn midpoint(&self, other: &Self) -> Self {
        self.lerp(other, 0.5)
    }
}

/// Haversine great-circle distance between two points, in kilometres.
#[must_use]
pub fn haversine(a: &GeoPoint, b: &GeoPoint) -> f64 {
    a.distance_km(b)
}

/// Forward geodesic: the point `distance_km` away from `base` at `bearing_deg`.
#[must_use]
pub fn offset_from_point(base: &GeoPoint, distance_km: f64, bearing_deg: f64) -> GeoPoint {
    base.offset(distance_km, bearing_deg)
}
