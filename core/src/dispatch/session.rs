use log::info;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::dispatch::policy::DispatchPolicy;
use crate::geo::estimator::RouteEstimate;
use crate::prelude::{Severity, TriageResult};

/// Progress of the assigned unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchStatus {
    Dispatching,
    EnRoute,
}

/// Progress of the golden-hour budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoldenHourStatus {
    Counting,
    TimeCritical,
}

/// Terminal transition fired by a clock tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchEvent {
    UnitEnRoute,
    TimeCritical,
}

/// One-second countdown whose terminal transition fires exactly once.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Countdown {
    remaining: u32,
}

impl Countdown {
    pub fn new(seconds: u32) -> Self {
        Self { remaining: seconds }
    }

    /// Decrements once; true exactly on the tick that reaches zero.
    /// Ticking a finished countdown is a no-op.
    pub fn tick(&mut self) -> bool {
        if self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        self.remaining == 0
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn finished(&self) -> bool {
        self.remaining == 0
    }
}

/// State for one active emergency simulation session, owned by exactly one
/// caller from confirmation until completion or cancellation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchSession {
    unit_id: String,
    severity: Severity,
    eta: Countdown,
    golden_hour: Countdown,
    status: DispatchStatus,
    golden_status: GoldenHourStatus,
    cancelled: bool,
}

impl DispatchSession {
    /// Confirms an emergency and assigns a synthetic unit. The ETA always
    /// derives from the route estimate, clamped into the policy window; the
    /// fallback coordinates guarantee an estimate exists even without a
    /// live fix.
    pub fn begin(
        severity: Severity,
        route: &RouteEstimate,
        policy: &DispatchPolicy,
        rng: &mut impl Rng,
    ) -> TriageResult<Self> {
        policy.validate()?;
        let unit_id = format!("AMB-{}", rng.gen_range(100..1000));
        let eta_seconds = policy.clamp_eta(route.eta_seconds());
        info!(
            "dispatch confirmed: {} ETA {}s, golden hour {}s",
            unit_id, eta_seconds, policy.golden_hour_seconds
        );
        Ok(Self {
            unit_id,
            severity,
            eta: Countdown::new(eta_seconds),
            golden_hour: Countdown::new(policy.golden_hour_seconds),
            status: DispatchStatus::Dispatching,
            golden_status: GoldenHourStatus::Counting,
            cancelled: false,
        })
    }

    /// Advances the ETA clock by one second. Returns the en-route
    /// transition on the tick that exhausts the clock; never after cancel.
    pub fn tick_eta(&mut self) -> Option<DispatchEvent> {
        if self.cancelled {
            return None;
        }
        if self.eta.tick() {
            self.status = DispatchStatus::EnRoute;
            info!("{} en route", self.unit_id);
            return Some(DispatchEvent::UnitEnRoute);
        }
        None
    }

    /// Advances the golden-hour clock by one second, independently of the
    /// ETA clock.
    pub fn tick_golden_hour(&mut self) -> Option<DispatchEvent> {
        if self.cancelled {
            return None;
        }
        if self.golden_hour.tick() {
            self.golden_status = GoldenHourStatus::TimeCritical;
            info!("{} golden hour exhausted", self.unit_id);
            return Some(DispatchEvent::TimeCritical);
        }
        None
    }

    /// Stops both clocks. Safe at any tick boundary and idempotent.
    pub fn cancel(&mut self) {
        if !self.cancelled {
            self.cancelled = true;
            info!("dispatch {} cancelled", self.unit_id);
        }
    }

    pub fn cancelled(&self) -> bool {
        self.cancelled
    }

    pub fn unit_id(&self) -> &str {
        &self.unit_id
    }

    pub fn eta_finished(&self) -> bool {
        self.eta.finished()
    }

    pub fn golden_hour_finished(&self) -> bool {
        self.golden_hour.finished()
    }

    pub fn snapshot(&self) -> DispatchSnapshot {
        DispatchSnapshot {
            unit_id: self.unit_id.clone(),
            severity: self.severity,
            status: self.status,
            golden_status: self.golden_status,
            eta_seconds: self.eta.remaining(),
            golden_hour_seconds: self.golden_hour.remaining(),
            cancelled: self.cancelled,
        }
    }
}

/// Serializable view of a session, rendered by the UI collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchSnapshot {
    pub unit_id: String,
    pub severity: Severity,
    pub status: DispatchStatus,
    pub golden_status: GoldenHourStatus,
    pub eta_seconds: u32,
    pub golden_hour_seconds: u32,
    pub cancelled: bool,
}

impl DispatchSnapshot {
    /// ETA rounded up to whole minutes, as shown on the dispatch page.
    pub fn eta_minutes(&self) -> u32 {
        (self.eta_seconds + 59) / 60
    }

    /// Golden-hour clock as `M:SS`, or the terminal banner once exhausted.
    pub fn golden_hour_display(&self) -> String {
        match self.golden_status {
            GoldenHourStatus::TimeCritical => "TIME CRITICAL".to_string(),
            GoldenHourStatus::Counting => format!(
                "{}:{:02}",
                self.golden_hour_seconds / 60,
                self.golden_hour_seconds % 60
            ),
        }
    }
}
