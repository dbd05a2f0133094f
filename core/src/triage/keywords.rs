use serde::{Deserialize, Serialize};

use crate::prelude::{TriageError, TriageResult};

/// Phrase tables driving the severity classifier. Loaded once and never
/// mutated afterwards; matching is case-insensitive substring containment,
/// so every phrase is held lowercase.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KeywordSet {
    pub critical: Vec<String>,
    pub moderate: Vec<String>,
}

fn phrases(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

impl Default for KeywordSet {
    fn default() -> Self {
        Self {
            critical: phrases(&[
                "chest pain",
                "unconscious",
                "heavy bleeding",
                "not breathing",
                "cardiac",
                "stroke",
                "no pulse",
            ]),
            moderate: phrases(&[
                "fracture",
                "dizziness",
                "fall",
                "concussion",
                "sprain",
                "bleeding",
            ]),
        }
    }
}

impl KeywordSet {
    /// Lowercases every phrase, rejecting entries that normalize to empty.
    pub fn normalized(self) -> TriageResult<Self> {
        Ok(Self {
            critical: normalize_tier(self.critical, "critical")?,
            moderate: normalize_tier(self.moderate, "moderate")?,
        })
    }
}

fn normalize_tier(list: Vec<String>, tier: &str) -> TriageResult<Vec<String>> {
    list.into_iter()
        .map(|phrase| {
            let phrase = phrase.trim().to_lowercase();
            if phrase.is_empty() {
                Err(TriageError::InvalidConfig(format!(
                    "empty {} phrase in keyword set",
                    tier
                )))
            } else {
                Ok(phrase)
            }
        })
        .collect()
}
