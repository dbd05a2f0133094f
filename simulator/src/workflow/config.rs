use anyhow::Context;
use fastlanecore::dispatch::{
    DispatchPolicy, LIVE_GOLDEN_HOUR_SECONDS, SIMULATION_GOLDEN_HOUR_SECONDS,
};
use fastlanecore::geo::RouteEstimator;
use fastlanecore::triage::KeywordSet;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Workflow parameters for one emergency wave. The keyword tables ride
/// along so deployments can tune the classifier without a rebuild.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    pub nominal_speed_kmh: f64,
    pub inefficiency_factor: f64,
    pub eta_floor_seconds: u32,
    pub eta_ceiling_seconds: u32,
    pub simulation_mode: bool,
    pub capture_timeout_ms: u64,
    pub seed: u64,
    pub keywords: KeywordSet,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            nominal_speed_kmh: 60.0,
            inefficiency_factor: 1.6,
            eta_floor_seconds: 45,
            eta_ceiling_seconds: 135,
            simulation_mode: false,
            capture_timeout_ms: 3000,
            seed: 0,
            keywords: KeywordSet::default(),
        }
    }
}

impl WorkflowConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading workflow config {}", path_ref.display()))?;
        let config: WorkflowConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing workflow config {}", path_ref.display()))?;
        Ok(config)
    }

    /// Simulation-mode preset: shorter golden hour, lighter traffic model.
    pub fn simulation() -> Self {
        Self {
            simulation_mode: true,
            inefficiency_factor: 1.5,
            ..Self::default()
        }
    }

    pub fn from_args(
        simulation_mode: bool,
        speed_kmh: Option<f64>,
        inefficiency: Option<f64>,
        seed: Option<u64>,
    ) -> Self {
        let mut config = if simulation_mode {
            Self::simulation()
        } else {
            Self::default()
        };
        if let Some(speed) = speed_kmh {
            config.nominal_speed_kmh = speed;
        }
        if let Some(factor) = inefficiency {
            config.inefficiency_factor = factor;
        }
        if let Some(seed) = seed {
            config.seed = seed;
        }
        config
    }

    pub fn to_estimator(&self) -> RouteEstimator {
        RouteEstimator {
            nominal_speed_kmh: self.nominal_speed_kmh,
            inefficiency_factor: self.inefficiency_factor,
        }
    }

    pub fn to_policy(&self) -> DispatchPolicy {
        let golden_hour_seconds = if self.simulation_mode {
            SIMULATION_GOLDEN_HOUR_SECONDS
        } else {
            LIVE_GOLDEN_HOUR_SECONDS
        };
        DispatchPolicy {
            eta_floor_seconds: self.eta_floor_seconds,
            eta_ceiling_seconds: self.eta_ceiling_seconds,
            golden_hour_seconds,
            seed: self.seed,
        }
    }

    pub fn capture_timeout(&self) -> Duration {
        Duration::from_millis(self.capture_timeout_ms)
    }
}
