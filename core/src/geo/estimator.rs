use serde::{Deserialize, Serialize};

use crate::geo::point::{haversine_km, GeoPoint};
use crate::prelude::{TriageError, TriageResult};

/// Straight-line travel estimator. Models traffic friction through a flat
/// inefficiency multiplier; medical urgency never feeds into it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RouteEstimator {
    pub nominal_speed_kmh: f64,
    pub inefficiency_factor: f64,
}

impl Default for RouteEstimator {
    fn default() -> Self {
        Self {
            nominal_speed_kmh: 60.0,
            inefficiency_factor: 1.6,
        }
    }
}

impl RouteEstimator {
    pub fn new(nominal_speed_kmh: f64, inefficiency_factor: f64) -> TriageResult<Self> {
        let estimator = Self {
            nominal_speed_kmh,
            inefficiency_factor,
        };
        estimator.validate()?;
        Ok(estimator)
    }

    fn validate(&self) -> TriageResult<()> {
        if self.nominal_speed_kmh <= 0.0 {
            return Err(TriageError::InvalidConfig(format!(
                "nominal speed must be positive, got {}",
                self.nominal_speed_kmh
            )));
        }
        if self.inefficiency_factor < 1.0 {
            return Err(TriageError::InvalidConfig(format!(
                "inefficiency factor must be at least 1.0, got {}",
                self.inefficiency_factor
            )));
        }
        Ok(())
    }

    /// Derives the ideal and friction-adjusted travel times for one route.
    pub fn estimate(&self, from: GeoPoint, to: GeoPoint) -> TriageResult<RouteEstimate> {
        self.validate()?;

        let distance_km = haversine_km(from, to);
        let ideal_minutes = distance_km / self.nominal_speed_kmh * 60.0;
        let actual_minutes = ideal_minutes * self.inefficiency_factor;
        let delay_minutes = actual_minutes - ideal_minutes;
        let efficiency_percent = if actual_minutes > 0.0 {
            (ideal_minutes / actual_minutes * 100.0).round() as u8
        } else {
            100
        };

        Ok(RouteEstimate {
            distance_km,
            ideal_minutes,
            actual_minutes,
            delay_minutes,
            efficiency_percent,
        })
    }
}

/// Travel-time breakdown for one straight-line route.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteEstimate {
    pub distance_km: f64,
    pub ideal_minutes: f64,
    pub actual_minutes: f64,
    pub delay_minutes: f64,
    pub efficiency_percent: u8,
}

impl RouteEstimate {
    /// Friction-adjusted travel time in whole seconds, rounded up.
    pub fn eta_seconds(&self) -> u32 {
        (self.actual_minutes * 60.0).ceil() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::point::{DEMO_HOSPITAL, DEMO_PATIENT};

    #[test]
    fn estimate_matches_staged_route() {
        let estimator = RouteEstimator::default();
        let estimate = estimator.estimate(DEMO_PATIENT, DEMO_HOSPITAL).unwrap();
        // ~1.22 km at 60 km/h is ~1.22 ideal minutes.
        assert!((estimate.ideal_minutes - 1.22).abs() < 0.05);
        assert!((estimate.actual_minutes - estimate.ideal_minutes * 1.6).abs() < 1e-9);
        assert!(
            (estimate.delay_minutes - (estimate.actual_minutes - estimate.ideal_minutes)).abs()
                < 1e-9
        );
    }

    #[test]
    fn efficiency_is_rounded_ratio_within_bounds() {
        let estimator = RouteEstimator::new(60.0, 1.6).unwrap();
        let estimate = estimator.estimate(DEMO_PATIENT, DEMO_HOSPITAL).unwrap();
        // 1 / 1.6 = 62.5%, rounds to 63.
        assert_eq!(estimate.efficiency_percent, 63);
        assert!(estimate.efficiency_percent > 0 && estimate.efficiency_percent <= 100);
    }

    #[test]
    fn zero_length_route_reports_full_efficiency() {
        let estimator = RouteEstimator::default();
        let estimate = estimator.estimate(DEMO_PATIENT, DEMO_PATIENT).unwrap();
        assert_eq!(estimate.distance_km, 0.0);
        assert_eq!(estimate.efficiency_percent, 100);
        assert_eq!(estimate.eta_seconds(), 0);
    }

    #[test]
    fn invalid_parameters_are_rejected() {
        assert!(RouteEstimator::new(0.0, 1.5).is_err());
        assert!(RouteEstimator::new(60.0, 0.9).is_err());
    }
}
