use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::runtime::Builder as TokioBuilder;

use fastlanecore::capability::{self, CapabilityKind};
use fastlanecore::dispatch::{ClockDriver, DispatchSession, DispatchSnapshot};
use fastlanecore::geo::{GeoPoint, RouteEstimate, DEMO_HOSPITAL};
use fastlanecore::handoff::{LocationFix, TriageHandoff};
use fastlanecore::prelude::{Severity, TriageChannel, TriageInput};
use fastlanecore::telemetry::{LogManager, MetricsRecorder, MetricsSnapshot};
use fastlanecore::triage::{SeverityClassifier, TranscriptBuffer, TriageAssessment};

use crate::generator::scenario::{CaptureBehavior, ScenarioIntake};
use crate::workflow::config::WorkflowConfig;

/// Outcome of one scripted emergency wave.
pub struct WorkflowResult {
    pub handoff: TriageHandoff,
    pub transcript: String,
    pub escalated: bool,
    pub location_granted: bool,
    pub estimate: RouteEstimate,
    /// Session state at confirmation, before any clock tick.
    pub assigned: DispatchSnapshot,
    /// Session state after both clocks ran to their terminal states.
    pub dispatch: DispatchSnapshot,
    pub notes: Vec<String>,
}

#[derive(Clone)]
pub struct Runner {
    config: WorkflowConfig,
    metrics: Arc<MetricsRecorder>,
    logger: Arc<LogManager>,
}

impl Runner {
    pub fn new(config: WorkflowConfig) -> Self {
        Self {
            config,
            metrics: Arc::new(MetricsRecorder::new()),
            logger: Arc::new(LogManager::new("workflow")),
        }
    }

    pub fn config(&self) -> &WorkflowConfig {
        &self.config
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    pub fn record_cancellation(&self) {
        self.metrics.record_cancellation();
    }

    fn classifier(&self) -> anyhow::Result<SeverityClassifier> {
        SeverityClassifier::new(self.config.keywords.clone())
            .context("building severity classifier")
    }

    /// Classifies one channel report on behalf of the bridge.
    pub fn assess(&self, input: &TriageInput) -> anyhow::Result<TriageAssessment> {
        let classifier = self.classifier()?;
        let assessment = classifier.assess(input);
        self.metrics.record_classification();
        Ok(assessment)
    }

    /// Runs a whole scripted wave to completion: triage on all three
    /// channels, location capture, route estimate, and a dispatch whose
    /// clocks are fast-forwarded to their terminal states.
    pub fn execute(&self, intake: &ScenarioIntake) -> anyhow::Result<WorkflowResult> {
        let classifier = self.classifier()?;

        let typed = classifier.assess(&TriageInput::new(
            TriageChannel::Typed,
            intake.typed_report.clone(),
        ));
        self.metrics.record_classification();

        let mut transcript = TranscriptBuffer::new();
        let mut voice_severity = Severity::Low;
        for chunk in &intake.spoken_chunks {
            voice_severity = transcript.append(&classifier, chunk);
            self.metrics.record_classification();
        }

        let camera = classifier.assess(&TriageInput::new(
            TriageChannel::DetectionLabel,
            intake.detection_label.clone(),
        ));
        self.metrics.record_classification();

        let handoff = TriageHandoff {
            voice_severity,
            text_severity: typed.severity,
            camera_severity: camera.severity,
            symptoms: intake.typed_report.clone(),
            timestamp: 0.0,
        };

        let runtime = TokioBuilder::new_current_thread()
            .enable_all()
            .build()
            .context("creating runtime for location capture")?;
        let outcome = runtime.block_on(capability::acquire_or(
            CapabilityKind::Geolocation,
            location_request(intake.capture, intake.patient),
            self.config.capture_timeout(),
        ));
        let location_granted = outcome.is_granted();
        if !location_granted {
            self.metrics.record_capability_fallback();
            self.logger
                .record_warning("no geolocation fix, using fallback coordinates");
        }
        let fix = outcome.resolve(capability::fallback_fix());

        let estimate = self
            .config
            .to_estimator()
            .estimate(fix, intake.hospital)
            .context("estimating route")?;

        let policy = self.config.to_policy();
        let mut rng = policy.rng();
        let mut session = DispatchSession::begin(handoff.overall(), &estimate, &policy, &mut rng)
            .context("beginning dispatch")?;
        self.metrics.record_dispatch();
        let assigned = session.snapshot();
        self.logger.record(&format!(
            "unit {} assigned, ETA {}s",
            assigned.unit_id, assigned.eta_seconds
        ));
        if let Some(name) = intake.scenario.as_ref() {
            self.logger
                .record(&format!("scenario {} -> unit {}", name, assigned.unit_id));
        }

        while !session.eta_finished() {
            session.tick_eta();
        }
        while !session.golden_hour_finished() {
            session.tick_golden_hour();
        }

        let escalated = handoff.overall() == Severity::Critical;
        let notes = vec![
            format!("triage overall {}", handoff.overall()),
            format!(
                "distance {:.2} km, efficiency {}%",
                estimate.distance_km, estimate.efficiency_percent
            ),
            format!(
                "unit {} ETA {} min displayed",
                assigned.unit_id,
                assigned.eta_minutes()
            ),
        ];

        Ok(WorkflowResult {
            handoff,
            transcript: transcript.text().to_string(),
            escalated,
            location_granted,
            estimate,
            assigned,
            dispatch: session.snapshot(),
            notes,
        })
    }

    /// Confirms a live emergency and starts the real-time clocks. Must be
    /// called inside a tokio runtime.
    pub fn begin_live(
        &self,
        severity: Severity,
        location: Option<LocationFix>,
    ) -> anyhow::Result<ClockDriver> {
        let fix = match location {
            Some(fix) => fix.point(),
            None => {
                self.metrics.record_capability_fallback();
                capability::fallback_fix()
            }
        };
        let estimate = self
            .config
            .to_estimator()
            .estimate(fix, DEMO_HOSPITAL)
            .context("estimating route")?;
        let policy = self.config.to_policy();
        let mut rng = StdRng::from_entropy();
        let session = DispatchSession::begin(severity, &estimate, &policy, &mut rng)
            .context("beginning live dispatch")?;
        self.metrics.record_dispatch();
        self.logger
            .record(&format!("live dispatch {} started", session.unit_id()));
        Ok(ClockDriver::spawn(session, Duration::from_secs(1)))
    }
}

async fn location_request(behavior: CaptureBehavior, fix: GeoPoint) -> Result<GeoPoint, String> {
    match behavior {
        CaptureBehavior::Granted => Ok(fix),
        CaptureBehavior::Denied => Err("permission denied".to_string()),
        CaptureBehavior::Unresponsive => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::scenario::{build_intake, ScenarioConfig};
    use fastlanecore::dispatch::{DispatchStatus, GoldenHourStatus};

    fn quick_config() -> WorkflowConfig {
        WorkflowConfig {
            capture_timeout_ms: 50,
            ..Default::default()
        }
    }

    #[test]
    fn critical_wave_runs_to_terminal_states() {
        let runner = Runner::new(quick_config());
        let scenario = ScenarioConfig {
            typed_reports: vec!["patient is not breathing".into()],
            spoken_chunks: vec!["no".into(), "pulse".into()],
            detection_labels: vec!["heavy bleeding".into()],
            ..Default::default()
        };
        let intake = build_intake(&scenario).unwrap();
        let result = runner.execute(&intake).unwrap();

        assert!(result.escalated);
        assert_eq!(result.handoff.overall(), Severity::Critical);
        assert_eq!(result.handoff.voice_severity, Severity::Critical);
        assert_eq!(result.transcript, "no pulse");
        assert!(result.location_granted);
        assert!((45..=135).contains(&result.assigned.eta_seconds));
        assert_eq!(result.dispatch.status, DispatchStatus::EnRoute);
        assert_eq!(result.dispatch.golden_status, GoldenHourStatus::TimeCritical);
        assert_eq!(runner.metrics().dispatches, 1);
        assert_eq!(runner.metrics().classifications, 4);
    }

    #[test]
    fn moderate_wave_does_not_escalate() {
        let runner = Runner::new(quick_config());
        let scenario = ScenarioConfig {
            typed_reports: vec!["twisted ankle, looks like a sprain".into()],
            spoken_chunks: vec!["complains of mild pain".into()],
            detection_labels: vec!["bruise".into()],
            ..Default::default()
        };
        let intake = build_intake(&scenario).unwrap();
        let result = runner.execute(&intake).unwrap();

        assert!(!result.escalated);
        assert_eq!(result.handoff.overall(), Severity::Moderate);
        // Dispatch still runs; SOS confirmation is independent of tier.
        assert_eq!(result.dispatch.status, DispatchStatus::EnRoute);
    }

    #[test]
    fn denied_capture_falls_back_to_demo_coordinates() {
        let config = quick_config();
        let runner = Runner::new(config.clone());
        let scenario = ScenarioConfig {
            capture: CaptureBehavior::Denied,
            patient: GeoPoint::new(10.0, 10.0),
            ..Default::default()
        };
        let intake = build_intake(&scenario).unwrap();
        let result = runner.execute(&intake).unwrap();

        assert!(!result.location_granted);
        let expected = config
            .to_estimator()
            .estimate(capability::fallback_fix(), DEMO_HOSPITAL)
            .unwrap();
        assert!((result.estimate.distance_km - expected.distance_km).abs() < 1e-9);
        assert_eq!(runner.metrics().capability_fallbacks, 1);
    }

    #[test]
    fn unresponsive_capture_degrades_after_the_timeout() {
        let config = WorkflowConfig {
            capture_timeout_ms: 10,
            ..Default::default()
        };
        let runner = Runner::new(config);
        let scenario = ScenarioConfig {
            capture: CaptureBehavior::Unresponsive,
            ..Default::default()
        };
        let intake = build_intake(&scenario).unwrap();
        let result = runner.execute(&intake).unwrap();
        assert!(!result.location_granted);
        assert_eq!(runner.metrics().capability_fallbacks, 1);
    }
}
