use serde::{Deserialize, Serialize};

use crate::prelude::{Severity, TriageChannel, TriageInput, TriageResult};
use crate::telemetry::log::LogManager;
use crate::triage::keywords::KeywordSet;

/// Keyword-driven severity classifier. `classify` is a pure function of the
/// keyword set and the input text; tiers are always re-derived, never
/// hand-set.
pub struct SeverityClassifier {
    keywords: KeywordSet,
    logger: LogManager,
}

impl SeverityClassifier {
    pub fn new(keywords: KeywordSet) -> TriageResult<Self> {
        Ok(Self {
            keywords: keywords.normalized()?,
            logger: LogManager::new("triage"),
        })
    }

    /// Derives the tier for a piece of free text.
    ///
    /// Matching is lowercase substring containment, not word-boundary
    /// matching. Critical phrases are checked before moderate ones; absent
    /// or empty input returns LOW without scanning.
    pub fn classify(&self, text: Option<&str>) -> Severity {
        let raw = text.unwrap_or("");
        if raw.is_empty() {
            return Severity::Low;
        }
        let normalized = raw.to_lowercase();
        if self
            .keywords
            .critical
            .iter()
            .any(|phrase| normalized.contains(phrase.as_str()))
        {
            return Severity::Critical;
        }
        if self
            .keywords
            .moderate
            .iter()
            .any(|phrase| normalized.contains(phrase.as_str()))
        {
            return Severity::Moderate;
        }
        Severity::Low
    }

    /// Classifies a channel report and flags the emergency affordance on
    /// the critical tier.
    pub fn assess(&self, input: &TriageInput) -> TriageAssessment {
        let severity = self.classify(input.text.as_deref());
        self.logger
            .record(&format!("{:?} channel -> {}", input.channel, severity));
        TriageAssessment {
            channel: input.channel,
            severity,
            escalate: severity == Severity::Critical,
        }
    }
}

impl Default for SeverityClassifier {
    fn default() -> Self {
        // The built-in keyword set is already normalized.
        Self {
            keywords: KeywordSet::default(),
            logger: LogManager::new("triage"),
        }
    }
}

/// Result of classifying one channel report.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TriageAssessment {
    pub channel: TriageChannel,
    pub severity: Severity,
    pub escalate: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn critical_phrase_wins_over_cooccurring_moderate() {
        let classifier = SeverityClassifier::default();
        // "heavy bleeding" contains the moderate phrase "bleeding".
        assert_eq!(
            classifier.classify(Some("heavy bleeding from a fall")),
            Severity::Critical
        );
    }

    #[test]
    fn moderate_phrase_without_critical_is_moderate() {
        let classifier = SeverityClassifier::default();
        assert_eq!(
            classifier.classify(Some("twisted ankle, likely a sprain")),
            Severity::Moderate
        );
    }

    #[test]
    fn absent_and_empty_input_are_low() {
        let classifier = SeverityClassifier::default();
        assert_eq!(classifier.classify(None), Severity::Low);
        assert_eq!(classifier.classify(Some("")), Severity::Low);
    }

    #[test]
    fn matching_is_case_insensitive() {
        let classifier = SeverityClassifier::default();
        assert_eq!(classifier.classify(Some("CHEST PAIN")), Severity::Critical);
        assert_eq!(
            classifier.classify(Some("CHEST PAIN")),
            classifier.classify(Some("chest pain"))
        );
    }

    #[test]
    fn substring_matching_ignores_word_boundaries() {
        let classifier = SeverityClassifier::default();
        // "rainfall" contains "fall"; containment is deliberate.
        assert_eq!(
            classifier.classify(Some("caught in heavy rainfall")),
            Severity::Moderate
        );
    }

    #[test]
    fn unrelated_text_is_low() {
        let classifier = SeverityClassifier::default();
        assert_eq!(
            classifier.classify(Some("mild headache since morning")),
            Severity::Low
        );
    }

    #[test]
    fn assess_escalates_only_on_critical() {
        let classifier = SeverityClassifier::default();
        let critical = classifier.assess(&TriageInput::new(TriageChannel::Typed, "no pulse"));
        assert!(critical.escalate);
        let moderate = classifier.assess(&TriageInput::new(TriageChannel::Typed, "dizziness"));
        assert!(!moderate.escalate);
    }

    #[test]
    fn custom_keyword_set_is_honored() {
        let set = KeywordSet {
            critical: vec!["Seizure".into()],
            moderate: vec!["nausea".into()],
        };
        let classifier = SeverityClassifier::new(set).unwrap();
        assert_eq!(
            classifier.classify(Some("patient had a seizure")),
            Severity::Critical
        );
        assert_eq!(classifier.classify(Some("chest pain")), Severity::Low);
    }
}
