//! Geographic positions and great-circle distance

use serde::{Deserialize, Serialize};

/// Mean Earth radius in kilometers
const EARTH_RADIUS_KM: f64 = 6371.0;

/// A geographic position in decimal degrees
///
/// # Example
///
/// ```
/// use swarm_domain::GeoPoint;
///
/// let paris = GeoPoint::new(48.8566, 2.3522);
/// let london = GeoPoint::new(51.5074, -0.1278);
/// let d = paris.distance_km(&london);
/// assert!((d - 343.5).abs() < 2.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Latitude in degrees (-90 to 90)
    pub lat: f64,
    /// Longitude in degrees (-180 to 180)
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Great-circle distance to another point (haversine formula), in km
    pub fn distance_km(&self, other: &GeoPoint) -> f64 {
        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();
        let dlat = (other.lat - self.lat).to_radians();
        let dlon = (other.lon - self.lon).to_radians();

        let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().asin();

        EARTH_RADIUS_KM * c
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.4}, {:.4})", self.lat, self.lon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_to_self_is_zero() {
        let p = GeoPoint::new(35.6762, 139.6503);
        assert!(p.distance_km(&p) < 1e-9);
    }

    #[test]
    fn test_distance_is_symmetric() {
        let a = GeoPoint::new(40.7128, -74.0060);
        let b = GeoPoint::new(34.0522, -118.2437);
        assert!((a.distance_km(&b) - b.distance_km(&a)).abs() < 1e-9);
    }

    #[test]
    fn test_known_distance_paris_london() {
        let paris = GeoPoint::new(48.8566, 2.3522);
        let london = GeoPoint::new(51.5074, -0.1278);
        let d = paris.distance_km(&london);
        assert!(d > 330.0 && d < 350.0, "unexpected distance: {}", d);
    }

    #[test]
    fn test_short_distance() {
        // Two points ~1.1 km apart (0.01 deg latitude)
        let a = GeoPoint::new(45.0, 10.0);
        let b = GeoPoint::new(45.01, 10.0);
        let d = a.distance_km(&b);
        assert!((d - 1.11).abs() < 0.02, "unexpected distance: {}", d);
    }
}
