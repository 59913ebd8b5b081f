use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Counters for one scheduling run, returned with the result.
#[derive(Debug, Clone, Serialize)]
pub struct RunStats {
    /// When the first scan was attempted.
    pub started_at: Option<DateTime<Utc>>,
    /// Number of scans performed.
    pub scans: u64,
    /// Number of cooperative yields between scans.
    pub yields: u64,
    /// Operations harvested as completed.
    pub completed: usize,
    /// Operations reported as timed out.
    pub timed_out: usize,
    /// Most operations harvested by a single scan.
    pub largest_harvest: usize,
    /// Wall-clock time from the first step to `Done`.
    pub elapsed: Duration,
}

impl Default for RunStats {
    fn default() -> Self {
        Self {
            started_at: None,
            scans: 0,
            yields: 0,
            completed: 0,
            timed_out: 0,
            largest_harvest: 0,
            elapsed: Duration::ZERO,
        }
    }
}

impl RunStats {
    pub fn mark_started(&mut self) {
        if self.started_at.is_none() {
            self.started_at = Some(Utc::now());
        }
    }

    /// Record one scan that harvested `harvested` operations.
    pub fn record_scan(&mut self, harvested: usize) {
        self.scans += 1;
        self.completed += harvested;
        self.largest_harvest = self.largest_harvest.max(harvested);
    }

    pub fn record_yield(&mut self) {
        self.yields += 1;
    }

    pub fn finish(&mut self, timed_out: usize, elapsed: Duration) {
        self.timed_out = timed_out;
        self.elapsed = elapsed;
    }

    /// Total operations accounted for.
    pub fn total(&self) -> usize {
        self.completed + self.timed_out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_scans() {
        let mut m = RunStats::default();
        m.record_scan(0);
        m.record_scan(3);
        m.record_scan(1);

        assert_eq!(m.scans, 3);
        assert_eq!(m.completed, 4);
        assert_eq!(m.largest_harvest, 3);
    }

    #[test]
    fn finish_sets_totals() {
        let mut m = RunStats::default();
        m.record_scan(2);
        m.finish(5, Duration::from_millis(30));
        assert_eq!(m.total(), 7);
        assert_eq!(m.elapsed, Duration::from_millis(30));
    }

    #[test]
    fn started_at_is_set_once() {
        let mut m = RunStats::default();
        assert!(m.started_at.is_none());
        m.mark_started();
        let first = m.started_at;
        m.mark_started();
        assert_eq!(m.started_at, first);
    }
}
