pub mod estimator;
pub mod point;

pub use estimator::{RouteEstimate, RouteEstimator};
pub use point::{haversine_km, GeoPoint, DEMO_HOSPITAL, DEMO_PATIENT, EARTH_RADIUS_KM};
