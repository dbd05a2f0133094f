use crate::prelude::Severity;
use crate::triage::classifier::SeverityClassifier;

/// Accumulates live speech-transcript chunks and re-derives the tier for
/// the whole buffer on every append, the way an incremental recognition
/// stream reports partial results.
#[derive(Debug, Default)]
pub struct TranscriptBuffer {
    text: String,
}

impl TranscriptBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one recognized chunk and classifies the accumulated text.
    pub fn append(&mut self, classifier: &SeverityClassifier, chunk: &str) -> Severity {
        let chunk = chunk.trim();
        if !chunk.is_empty() {
            if !self.text.is_empty() {
                self.text.push(' ');
            }
            self.text.push_str(chunk);
        }
        classifier.classify(Some(&self.text))
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn clear(&mut self) {
        self.text.clear();
    }
}
