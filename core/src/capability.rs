use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::geo::point::{GeoPoint, DEMO_PATIENT};

/// Recommended ceiling for any capability request.
pub const DEFAULT_CAPABILITY_TIMEOUT: Duration = Duration::from_secs(3);

/// Browser-style capabilities the core treats as opaque external calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapabilityKind {
    SpeechRecognition,
    Camera,
    Geolocation,
}

impl CapabilityKind {
    pub fn label(&self) -> &'static str {
        match self {
            CapabilityKind::SpeechRecognition => "speech recognition",
            CapabilityKind::Camera => "camera",
            CapabilityKind::Geolocation => "geolocation",
        }
    }
}

/// Outcome of one time-boxed capability request. Every outcome resolves to
/// a usable value; the core never hard-fails on capability loss.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CapabilityOutcome<T> {
    Granted(T),
    Denied,
    TimedOut,
}

impl<T> CapabilityOutcome<T> {
    pub fn is_granted(&self) -> bool {
        matches!(self, CapabilityOutcome::Granted(_))
    }

    /// The captured value, or the fallback when the request failed.
    pub fn resolve(self, fallback: T) -> T {
        match self {
            CapabilityOutcome::Granted(value) => value,
            CapabilityOutcome::Denied | CapabilityOutcome::TimedOut => fallback,
        }
    }
}

/// Runs a capability request with a hard timeout. The caller supplies the
/// platform future; denial and timeout both degrade to the fallback path.
pub async fn acquire_or<T, E, F>(
    kind: CapabilityKind,
    request: F,
    timeout: Duration,
) -> CapabilityOutcome<T>
where
    E: Display,
    F: Future<Output = Result<T, E>>,
{
    match tokio::time::timeout(timeout, request).await {
        Ok(Ok(value)) => {
            debug!("{} capability granted", kind.label());
            CapabilityOutcome::Granted(value)
        }
        Ok(Err(reason)) => {
            warn!("{} capability denied: {}", kind.label(), reason);
            CapabilityOutcome::Denied
        }
        Err(_) => {
            warn!(
                "{} capability timed out after {:?}",
                kind.label(),
                timeout
            );
            CapabilityOutcome::TimedOut
        }
    }
}

/// Demo coordinates substituted when no geolocation fix is available.
pub fn fallback_fix() -> GeoPoint {
    DEMO_PATIENT
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::runtime::Builder as TokioBuilder;

    fn runtime() -> tokio::runtime::Runtime {
        TokioBuilder::new_current_thread()
            .enable_all()
            .build()
            .unwrap()
    }

    #[test]
    fn granted_request_yields_its_value() {
        let outcome = runtime().block_on(acquire_or(
            CapabilityKind::Geolocation,
            async { Ok::<_, String>(fallback_fix()) },
            Duration::from_millis(50),
        ));
        assert!(outcome.is_granted());
    }

    #[test]
    fn denied_request_resolves_to_the_fallback() {
        let outcome = runtime().block_on(acquire_or(
            CapabilityKind::Camera,
            async { Err::<u32, _>("permission denied") },
            Duration::from_millis(50),
        ));
        assert_eq!(outcome, CapabilityOutcome::Denied);
        assert_eq!(outcome.resolve(7), 7);
    }

    #[test]
    fn unresponsive_request_times_out() {
        let outcome = runtime().block_on(acquire_or(
            CapabilityKind::SpeechRecognition,
            std::future::pending::<Result<u32, String>>(),
            Duration::from_millis(10),
        ));
        assert_eq!(outcome, CapabilityOutcome::TimedOut);
        assert_eq!(outcome.resolve(0), 0);
    }
}
