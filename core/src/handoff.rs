use serde::{Deserialize, Serialize};

use crate::geo::point::GeoPoint;
use crate::prelude::{Severity, TriageError, TriageResult};

/// Triage results handed between independently-loaded surfaces. Plain
/// serializable record; the storage transport is the UI collaborator's
/// concern.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TriageHandoff {
    pub voice_severity: Severity,
    pub text_severity: Severity,
    pub camera_severity: Severity,
    pub symptoms: String,
    pub timestamp: f64,
}

impl TriageHandoff {
    /// Highest tier observed across the three capture channels.
    pub fn overall(&self) -> Severity {
        self.voice_severity
            .max(self.text_severity)
            .max(self.camera_severity)
    }

    pub fn to_json(&self) -> TriageResult<String> {
        serde_json::to_string(self).map_err(|err| TriageError::Internal(err.to_string()))
    }

    pub fn from_json(raw: &str) -> TriageResult<Self> {
        serde_json::from_str(raw).map_err(|err| TriageError::InvalidInput(err.to_string()))
    }
}

/// Captured device location, carried alongside the triage record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocationFix {
    pub latitude: f64,
    pub longitude: f64,
}

impl LocationFix {
    pub fn point(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }
}

impl From<GeoPoint> for LocationFix {
    fn from(point: GeoPoint) -> Self {
        Self {
            latitude: point.latitude,
            longitude: point.longitude,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overall_takes_the_highest_channel_tier() {
        let handoff = TriageHandoff {
            voice_severity: Severity::Low,
            text_severity: Severity::Critical,
            camera_severity: Severity::Moderate,
            symptoms: "chest pain".into(),
            timestamp: 0.0,
        };
        assert_eq!(handoff.overall(), Severity::Critical);
    }

    #[test]
    fn json_transport_preserves_the_record() {
        let handoff = TriageHandoff {
            voice_severity: Severity::Moderate,
            text_severity: Severity::Low,
            camera_severity: Severity::Low,
            symptoms: "dizziness after a fall".into(),
            timestamp: 1700000000.0,
        };
        let raw = handoff.to_json().unwrap();
        assert!(raw.contains("MODERATE"));
        assert_eq!(TriageHandoff::from_json(&raw).unwrap(), handoff);
    }

    #[test]
    fn malformed_transport_payload_is_rejected() {
        assert!(TriageHandoff::from_json("not json").is_err());
    }
}
