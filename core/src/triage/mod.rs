pub mod classifier;
pub mod keywords;
pub mod transcript;

pub use classifier::{SeverityClassifier, TriageAssessment};
pub use keywords::KeywordSet;
pub use transcript::TranscriptBuffer;
