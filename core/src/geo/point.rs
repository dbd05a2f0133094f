use serde::{Deserialize, Serialize};

/// Mean Earth radius used by the great-circle distance estimate.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Coordinate pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Staged patient location substituted when no live fix is available.
pub const DEMO_PATIENT: GeoPoint = GeoPoint {
    latitude: 37.7815,
    longitude: -122.4112,
};

/// Receiving hospital for the staged route.
pub const DEMO_HOSPITAL: GeoPoint = GeoPoint {
    latitude: 37.7890,
    longitude: -122.4010,
};

/// Great-circle distance between two points via the haversine formula,
/// in kilometres.
pub fn haversine_km(a: GeoPoint, b: GeoPoint) -> f64 {
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lon = (b.longitude - a.longitude).to_radians();
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let s1 = (d_lat / 2.0).sin();
    let s2 = (d_lon / 2.0).sin();
    let u = s1 * s1 + lat1.cos() * lat2.cos() * s2 * s2;
    let c = 2.0 * u.sqrt().atan2((1.0 - u).sqrt());
    EARTH_RADIUS_KM * c
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn haversine_of_identical_points_is_zero() {
        let p = GeoPoint::new(37.773972, -122.431297);
        assert_eq!(haversine_km(p, p), 0.0);
    }

    #[test]
    fn haversine_is_symmetric() {
        let d_ab = haversine_km(DEMO_PATIENT, DEMO_HOSPITAL);
        let d_ba = haversine_km(DEMO_HOSPITAL, DEMO_PATIENT);
        assert!((d_ab - d_ba).abs() < 1e-12);
    }

    #[test]
    fn haversine_matches_equator_fixture() {
        let a = GeoPoint::new(0.0, 0.0);
        let b = GeoPoint::new(0.0085, 0.0);
        let d = haversine_km(a, b);
        assert!((d - 0.945).abs() < 0.01, "got {}", d);
    }

    #[test]
    fn haversine_matches_staged_route() {
        let d = haversine_km(DEMO_PATIENT, DEMO_HOSPITAL);
        assert!((d - 1.22).abs() < 0.05, "got {}", d);
    }
}
