use fastlanecore::geo::{GeoPoint, DEMO_HOSPITAL, DEMO_PATIENT};
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// How the staged geolocation request behaves during the wave.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaptureBehavior {
    Granted,
    Denied,
    Unresponsive,
}

/// Configuration for generating a scripted emergency wave.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioConfig {
    pub seed: u64,
    pub typed_reports: Vec<String>,
    pub spoken_chunks: Vec<String>,
    pub detection_labels: Vec<String>,
    pub capture: CaptureBehavior,
    pub patient: GeoPoint,
    pub hospital: GeoPoint,
    pub scenario: Option<String>,
}

fn pool(entries: &[&str]) -> Vec<String> {
    entries.iter().map(|s| s.to_string()).collect()
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            typed_reports: pool(&[
                "severe chest pain and trouble speaking",
                "heavy bleeding from a head wound",
                "twisted ankle, looks like a sprain",
            ]),
            spoken_chunks: pool(&[
                "patient fell off a ladder",
                "complains of dizziness",
                "possible concussion",
            ]),
            detection_labels: pool(&["blood", "fall", "fracture"]),
            capture: CaptureBehavior::Granted,
            patient: DEMO_PATIENT,
            hospital: DEMO_HOSPITAL,
            scenario: None,
        }
    }
}

/// One scripted emergency wave: a report for each capture channel plus the
/// staged route and geolocation behavior.
#[derive(Debug, Clone)]
pub struct ScenarioIntake {
    pub typed_report: String,
    pub spoken_chunks: Vec<String>,
    pub detection_label: String,
    pub capture: CaptureBehavior,
    pub patient: GeoPoint,
    pub hospital: GeoPoint,
    pub scenario: Option<String>,
}

fn pick<'a>(rng: &mut StdRng, entries: &'a [String], what: &str) -> anyhow::Result<&'a String> {
    if entries.is_empty() {
        anyhow::bail!("scenario has no {} entries", what);
    }
    Ok(&entries[rng.gen_range(0..entries.len())])
}

pub fn build_intake(config: &ScenarioConfig) -> anyhow::Result<ScenarioIntake> {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let typed_report = pick(&mut rng, &config.typed_reports, "typed report")?.clone();
    let detection_label = pick(&mut rng, &config.detection_labels, "detection label")?.clone();
    if config.spoken_chunks.is_empty() {
        anyhow::bail!("scenario has no spoken chunk entries");
    }

    Ok(ScenarioIntake {
        typed_report,
        spoken_chunks: config.spoken_chunks.clone(),
        detection_label,
        capture: config.capture,
        patient: config.patient,
        hospital: config.hospital,
        scenario: config.scenario.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intake_is_deterministic_for_a_seed() {
        let config = ScenarioConfig {
            seed: 42,
            ..Default::default()
        };
        let a = build_intake(&config).unwrap();
        let b = build_intake(&config).unwrap();
        assert_eq!(a.typed_report, b.typed_report);
        assert_eq!(a.detection_label, b.detection_label);
        assert_eq!(a.spoken_chunks, b.spoken_chunks);
    }

    #[test]
    fn intake_carries_the_staged_route() {
        let intake = build_intake(&ScenarioConfig::default()).unwrap();
        assert_eq!(intake.patient, DEMO_PATIENT);
        assert_eq!(intake.hospital, DEMO_HOSPITAL);
        assert_eq!(intake.capture, CaptureBehavior::Granted);
    }

    #[test]
    fn empty_pools_are_rejected() {
        let config = ScenarioConfig {
            typed_reports: Vec::new(),
            ..Default::default()
        };
        assert!(build_intake(&config).is_err());
    }
}
