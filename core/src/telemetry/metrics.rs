use std::sync::Mutex;

use serde::{Deserialize, Serialize};

/// Session counters surfaced to the dashboard.
pub struct MetricsRecorder {
    inner: Mutex<MetricsSnapshot>,
}

/// Point-in-time copy of the counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub classifications: usize,
    pub dispatches: usize,
    pub cancellations: usize,
    pub capability_fallbacks: usize,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(MetricsSnapshot::default()),
        }
    }

    pub fn record_classification(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.classifications += 1;
        }
    }

    pub fn record_dispatch(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.dispatches += 1;
        }
    }

    pub fn record_cancellation(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.cancellations += 1;
        }
    }

    pub fn record_capability_fallback(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.capability_fallbacks += 1;
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        self.inner
            .lock()
            .map(|metrics| *metrics)
            .unwrap_or_default()
    }
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_accumulate_independently() {
        let recorder = MetricsRecorder::new();
        recorder.record_classification();
        recorder.record_classification();
        recorder.record_dispatch();
        recorder.record_capability_fallback();

        let snapshot = recorder.snapshot();
        assert_eq!(snapshot.classifications, 2);
        assert_eq!(snapshot.dispatches, 1);
        assert_eq!(snapshot.cancellations, 0);
        assert_eq!(snapshot.capability_fallbacks, 1);
    }
}
