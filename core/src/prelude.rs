use serde::{Deserialize, Serialize};
use std::fmt;

/// Urgency tier assigned to a triage input. Ordered so escalation
/// comparisons read naturally: `Low < Moderate < Critical`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    #[default]
    Low,
    Moderate,
    Critical,
}

impl Severity {
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Low => "LOW",
            Severity::Moderate => "MODERATE",
            Severity::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Capture channel a triage input arrived through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriageChannel {
    Typed,
    SpeechTranscript,
    DetectionLabel,
}

/// Free-text symptom report from one capture channel. The text may be
/// missing; classification treats that the same as an empty report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriageInput {
    pub channel: TriageChannel,
    pub text: Option<String>,
}

impl TriageInput {
    pub fn new<S: Into<String>>(channel: TriageChannel, text: S) -> Self {
        Self {
            channel,
            text: Some(text.into()),
        }
    }

    pub fn empty(channel: TriageChannel) -> Self {
        Self {
            channel,
            text: None,
        }
    }

    /// The report text with absent input coerced to empty.
    pub fn text(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }
}

/// Common error type for triage and dispatch configuration.
#[derive(thiserror::Error, Debug)]
pub enum TriageError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("internal failure: {0}")]
    Internal(String),
}

pub type TriageResult<T> = Result<T, TriageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_ordering_supports_escalation() {
        assert!(Severity::Low < Severity::Moderate);
        assert!(Severity::Moderate < Severity::Critical);
        assert_eq!(Severity::Critical.label(), "CRITICAL");
    }

    #[test]
    fn missing_text_coerces_to_empty() {
        let input = TriageInput::empty(TriageChannel::Typed);
        assert_eq!(input.text(), "");
    }
}
