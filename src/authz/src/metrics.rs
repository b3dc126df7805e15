//! Decision counters for the mutation gate

use std::sync::atomic::{AtomicU64, Ordering};

/// Point-in-time copy of the gate counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    /// Total number of checks
    pub total: u64,

    /// Checks authorized by a record
    pub allowed: u64,

    /// Checks denied
    pub denied: u64,

    /// Checks authorized because authorization is disabled
    pub bypassed: u64,
}

impl MetricsSnapshot {
    /// Share of checks that were authorized (including bypassed ones)
    pub fn allow_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            (self.allowed + self.bypassed) as f64 / self.total as f64
        }
    }
}

/// Lock-free decision counters
#[derive(Debug, Default)]
pub struct GateMetrics {
    allowed: AtomicU64,
    denied: AtomicU64,
    bypassed: AtomicU64,
}

impl GateMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_decision(&self, authorized: bool) {
        if authorized {
            self.allowed.fetch_add(1, Ordering::Relaxed);
        } else {
            self.denied.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn record_bypass(&self) {
        self.bypassed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let allowed = self.allowed.load(Ordering::Relaxed);
        let denied = self.denied.load(Ordering::Relaxed);
        let bypassed = self.bypassed.load(Ordering::Relaxed);

        MetricsSnapshot {
            total: allowed + denied + bypassed,
            allowed,
            denied,
            bypassed,
        }
    }

    /// Resets every counter to zero
    pub fn reset(&self) {
        self.allowed.store(0, Ordering::Relaxed);
        self.denied.store(0, Ordering::Relaxed);
        self.bypassed.store(0, Ordering::Relaxed);
    }
}
