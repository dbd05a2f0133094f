use rand::{rngs::StdRng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::prelude::{TriageError, TriageResult};

/// Golden-hour budget for a confirmed live dispatch.
pub const LIVE_GOLDEN_HOUR_SECONDS: u32 = 3600;

/// Shorter budget used by the offline simulation-mode flow.
pub const SIMULATION_GOLDEN_HOUR_SECONDS: u32 = 1200;

/// Tunable bounds for one dispatch session. The ETA window keeps the
/// route-derived estimate inside the demo's 45-135 second display range.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchPolicy {
    pub eta_floor_seconds: u32,
    pub eta_ceiling_seconds: u32,
    pub golden_hour_seconds: u32,
    pub seed: u64,
}

impl Default for DispatchPolicy {
    fn default() -> Self {
        Self::live()
    }
}

impl DispatchPolicy {
    pub fn live() -> Self {
        Self {
            eta_floor_seconds: 45,
            eta_ceiling_seconds: 135,
            golden_hour_seconds: LIVE_GOLDEN_HOUR_SECONDS,
            seed: 0,
        }
    }

    pub fn simulation() -> Self {
        Self {
            golden_hour_seconds: SIMULATION_GOLDEN_HOUR_SECONDS,
            ..Self::live()
        }
    }

    pub fn validate(&self) -> TriageResult<()> {
        if self.eta_floor_seconds == 0 || self.eta_ceiling_seconds < self.eta_floor_seconds {
            return Err(TriageError::InvalidConfig(format!(
                "ETA window {}..{} is empty",
                self.eta_floor_seconds, self.eta_ceiling_seconds
            )));
        }
        if self.golden_hour_seconds == 0 {
            return Err(TriageError::InvalidConfig(
                "golden hour budget must be positive".into(),
            ));
        }
        Ok(())
    }

    pub fn clamp_eta(&self, seconds: u32) -> u32 {
        seconds.clamp(self.eta_floor_seconds, self.eta_ceiling_seconds)
    }

    /// Seeded generator for reproducible unit assignment.
    pub fn rng(&self) -> StdRng {
        StdRng::seed_from_u64(self.seed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_carry_the_two_golden_hour_budgets() {
        assert_eq!(DispatchPolicy::live().golden_hour_seconds, 3600);
        assert_eq!(DispatchPolicy::simulation().golden_hour_seconds, 1200);
    }

    #[test]
    fn eta_is_clamped_into_the_window() {
        let policy = DispatchPolicy::live();
        assert_eq!(policy.clamp_eta(0), 45);
        assert_eq!(policy.clamp_eta(90), 90);
        assert_eq!(policy.clamp_eta(10_000), 135);
    }

    #[test]
    fn degenerate_windows_are_rejected() {
        let mut policy = DispatchPolicy::live();
        policy.eta_ceiling_seconds = 10;
        assert!(policy.validate().is_err());

        let mut policy = DispatchPolicy::live();
        policy.golden_hour_seconds = 0;
        assert!(policy.validate().is_err());
    }
}
