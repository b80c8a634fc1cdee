//! Process-wide run counters.
//!
//! The recorder and aggregator bump these as they go; the binary calls
//! [`Metrics::flush`] once before exiting.

use std::sync::atomic::{AtomicU64, Ordering};

pub static METRICS: Metrics = Metrics::new();

/// Which counter to bump.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Counter {
    OutcomesRecorded,
    ReportsBuilt,
    KSkipped,
}

impl Counter {
    pub fn name(self) -> &'static str {
        match self {
            Counter::OutcomesRecorded => "outcomes_recorded",
            Counter::ReportsBuilt => "reports_built",
            Counter::KSkipped => "k_skipped",
        }
    }
}

/// Point-in-time copy of every counter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub outcomes_recorded: u64,
    pub reports_built: u64,
    pub k_skipped: u64,
}

impl MetricsSnapshot {
    /// Counts accumulated since `earlier`.
    pub fn since(&self, earlier: &MetricsSnapshot) -> MetricsSnapshot {
        MetricsSnapshot {
            outcomes_recorded: self.outcomes_recorded.saturating_sub(earlier.outcomes_recorded),
            reports_built: self.reports_built.saturating_sub(earlier.reports_built),
            k_skipped: self.k_skipped.saturating_sub(earlier.k_skipped),
        }
    }
}

#[derive(Default)]
pub struct Metrics {
    outcomes_recorded: AtomicU64,
    reports_built: AtomicU64,
    k_skipped: AtomicU64,
}

impl Metrics {
    pub const fn new() -> Self {
        Self {
            outcomes_recorded: AtomicU64::new(0),
            reports_built: AtomicU64::new(0),
            k_skipped: AtomicU64::new(0),
        }
    }

    fn cell(&self, counter: Counter) -> &AtomicU64 {
        match counter {
            Counter::OutcomesRecorded => &self.outcomes_recorded,
            Counter::ReportsBuilt => &self.reports_built,
            Counter::KSkipped => &self.k_skipped,
        }
    }

    pub fn incr(&self, counter: Counter) {
        self.cell(counter).fetch_add(1, Ordering::Relaxed);
        tracing::trace!(metric = counter.name(), "counter incremented");
    }

    pub fn get(&self, counter: Counter) -> u64 {
        self.cell(counter).load(Ordering::Relaxed)
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            outcomes_recorded: self.get(Counter::OutcomesRecorded),
            reports_built: self.get(Counter::ReportsBuilt),
            k_skipped: self.get(Counter::KSkipped),
        }
    }

    /// Log the current snapshot as one `info!` event and return it.
    pub fn flush(&self) -> MetricsSnapshot {
        let snap = self.snapshot();
        tracing::info!(
            metric = "flush",
            outcomes_recorded = snap.outcomes_recorded,
            reports_built = snap.reports_built,
            k_skipped = snap.k_skipped,
        );
        snap
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_tracks_each_counter_separately() {
        let m = Metrics::new();
        assert_eq!(m.snapshot(), MetricsSnapshot::default());

        m.incr(Counter::OutcomesRecorded);
        m.incr(Counter::OutcomesRecorded);
        m.incr(Counter::KSkipped);

        assert_eq!(
            m.snapshot(),
            MetricsSnapshot {
                outcomes_recorded: 2,
                reports_built: 0,
                k_skipped: 1,
            }
        );
    }

    #[test]
    fn flush_returns_what_it_logged() {
        let m = Metrics::new();
        m.incr(Counter::ReportsBuilt);
        let flushed = m.flush();
        assert_eq!(flushed.reports_built, 1);
        assert_eq!(flushed, m.snapshot());
    }

    #[test]
    fn delta_between_snapshots() {
        let m = Metrics::new();
        m.incr(Counter::OutcomesRecorded);
        let before = m.snapshot();
        m.incr(Counter::OutcomesRecorded);
        m.incr(Counter::ReportsBuilt);

        let delta = m.snapshot().since(&before);
        assert_eq!(delta.outcomes_recorded, 1);
        assert_eq!(delta.reports_built, 1);
        assert_eq!(delta.k_skipped, 0);
    }

    #[test]
    fn counter_names_match_log_fields() {
        assert_eq!(Counter::OutcomesRecorded.name(), "outcomes_recorded");
        assert_eq!(Counter::ReportsBuilt.name(), "reports_built");
        assert_eq!(Counter::KSkipped.name(), "k_skipped");
    }
}
