use std::sync::atomic::{AtomicU64, Ordering};

/// Atomic counters updated by the append, drain and eviction paths.
pub struct StatsCounter {
    appended: AtomicU64,
    drains: AtomicU64,
    deferred_drains: AtomicU64,
    forced_drains: AtomicU64,
    evicted: AtomicU64,
}

impl StatsCounter {
    pub fn new() -> Self {
        StatsCounter {
            appended: AtomicU64::new(0),
            drains: AtomicU64::new(0),
            deferred_drains: AtomicU64::new(0),
            forced_drains: AtomicU64::new(0),
            evicted: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn record_append(&self) {
        self.appended.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_drain(&self) {
        self.drains.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_deferred(&self) {
        self.deferred_drains.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_forced(&self) {
        self.forced_drains.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_eviction(&self, count: u64) {
        self.evicted.fetch_add(count, Ordering::Relaxed);
    }

    /// Returns a point-in-time snapshot of the statistics.
    pub fn snapshot(&self) -> CadenceStats {
        CadenceStats {
            appended: self.appended.load(Ordering::Relaxed),
            drains: self.drains.load(Ordering::Relaxed),
            deferred_drains: self.deferred_drains.load(Ordering::Relaxed),
            forced_drains: self.forced_drains.load(Ordering::Relaxed),
            evicted: self.evicted.load(Ordering::Relaxed),
        }
    }
}

impl Default for StatsCounter {
    fn default() -> Self {
        Self::new()
    }
}

/// A point-in-time snapshot of buffer statistics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CadenceStats {
    /// Number of samples passed to `append`.
    pub appended: u64,
    /// Number of successful drains of the pending queue (forced ones included).
    pub drains: u64,
    /// Number of drain attempts that found the store lock busy.
    pub deferred_drains: u64,
    /// Number of drains that had to block because the backlog hit its limit.
    pub forced_drains: u64,
    /// Number of committed samples dropped by eviction.
    pub evicted: u64,
}

impl CadenceStats {
    /// `deferred / (drains + deferred)`, or `0.0` if nothing was attempted.
    pub fn deferral_rate(&self) -> f64 {
        let attempts = self.drains + self.deferred_drains;
        if attempts == 0 {
            0.0
        } else {
            self.deferred_drains as f64 / attempts as f64
        }
    }
}
