use fastlanecore::dispatch::DispatchSnapshot;
use fastlanecore::geo::RouteEstimate;
use fastlanecore::prelude::{Severity, TriageChannel};
use fastlanecore::telemetry::MetricsSnapshot;
use fastlanecore::triage::TriageAssessment;
use serde::{Deserialize, Serialize};

use crate::workflow::runner::WorkflowResult;

/// Dashboard state served to the UI collaborator.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashboardModel {
    pub voice_severity: Severity,
    pub text_severity: Severity,
    pub camera_severity: Severity,
    pub sos_alert: bool,
    pub status_line: String,
    pub estimate: Option<RouteEstimate>,
    pub dispatch: Option<DispatchSnapshot>,
    pub metrics: MetricsSnapshot,
    pub notes: Vec<String>,
}

impl DashboardModel {
    /// Highest tier across the three capture channels.
    pub fn overall(&self) -> Severity {
        self.voice_severity
            .max(self.text_severity)
            .max(self.camera_severity)
    }

    /// Records one channel result. The latest assessment drives the SOS
    /// affordance, matching the page behavior.
    pub fn apply_assessment(&mut self, assessment: &TriageAssessment) {
        match assessment.channel {
            TriageChannel::Typed => self.text_severity = assessment.severity,
            TriageChannel::SpeechTranscript => self.voice_severity = assessment.severity,
            TriageChannel::DetectionLabel => self.camera_severity = assessment.severity,
        }
        self.sos_alert = assessment.escalate;
    }

    pub fn from_result(result: &WorkflowResult, metrics: MetricsSnapshot) -> Self {
        Self {
            voice_severity: result.handoff.voice_severity,
            text_severity: result.handoff.text_severity,
            camera_severity: result.handoff.camera_severity,
            sos_alert: result.escalated,
            status_line: "Offline workflow results ready.".into(),
            estimate: Some(result.estimate.clone()),
            dispatch: Some(result.dispatch.clone()),
            metrics,
            notes: result.notes.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assessment(channel: TriageChannel, severity: Severity) -> TriageAssessment {
        TriageAssessment {
            channel,
            severity,
            escalate: severity == Severity::Critical,
        }
    }

    #[test]
    fn assessments_land_on_their_channel() {
        let mut model = DashboardModel::default();
        model.apply_assessment(&assessment(TriageChannel::Typed, Severity::Critical));
        model.apply_assessment(&assessment(TriageChannel::DetectionLabel, Severity::Moderate));

        assert_eq!(model.text_severity, Severity::Critical);
        assert_eq!(model.camera_severity, Severity::Moderate);
        assert_eq!(model.voice_severity, Severity::Low);
        assert_eq!(model.overall(), Severity::Critical);
    }

    #[test]
    fn latest_assessment_drives_the_sos_affordance() {
        let mut model = DashboardModel::default();
        model.apply_assessment(&assessment(TriageChannel::Typed, Severity::Critical));
        assert!(model.sos_alert);
        model.apply_assessment(&assessment(TriageChannel::SpeechTranscript, Severity::Low));
        assert!(!model.sos_alert);
    }
}
