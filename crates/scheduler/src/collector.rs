use serde::Serialize;

use crate::metrics::RunStats;
use crate::types::Outcome;

/// Accumulates outcomes in detection order.
#[derive(Debug)]
pub struct ResultCollector<I, V> {
    entries: Vec<(I, Outcome<V>)>,
    finalized: bool,
}

impl<I, V> ResultCollector<I, V> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            finalized: false,
        }
    }

    pub fn record(&mut self, identity: I, value: V) {
        debug_assert!(!self.finalized, "record after finalize");
        self.entries.push((identity, Outcome::Completed(value)));
    }

    pub fn record_all(&mut self, harvested: impl IntoIterator<Item = (I, V)>) {
        for (identity, value) in harvested {
            self.record(identity, value);
        }
    }

    /// Append `TimedOut` for every residual identity, in the given order.
    /// Returns how many were appended.
    pub fn finalize(&mut self, residual: impl IntoIterator<Item = I>) -> usize {
        let before = self.entries.len();
        self.entries
            .extend(residual.into_iter().map(|id| (id, Outcome::TimedOut)));
        self.finalized = true;
        self.entries.len() - before
    }

    /// Move out everything recorded so far.
    pub fn take_recorded(&mut self) -> Vec<(I, Outcome<V>)> {
        std::mem::take(&mut self.entries)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_result(self, stats: RunStats) -> ScheduleResult<I, V> {
        ScheduleResult {
            entries: self.entries,
            stats,
        }
    }
}

impl<I, V> Default for ResultCollector<I, V> {
    fn default() -> Self {
        Self::new()
    }
}

/// Ordered outcomes of one scheduling run: completed entries in detection
/// order, then timed-out entries in residual order.
#[derive(Debug, Clone, Serialize)]
pub struct ScheduleResult<I, V> {
    entries: Vec<(I, Outcome<V>)>,
    stats: RunStats,
}

impl<I, V> ScheduleResult<I, V> {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(I, Outcome<V>)> {
        self.entries.iter()
    }

    pub fn entries(&self) -> &[(I, Outcome<V>)] {
        &self.entries
    }

    /// Completed entries with their values, in detection order.
    pub fn completed(&self) -> impl Iterator<Item = (&I, &V)> {
        self.entries
            .iter()
            .filter_map(|(id, outcome)| outcome.value().map(|v| (id, v)))
    }

    /// Identities that timed out, in residual order.
    pub fn timed_out(&self) -> impl Iterator<Item = &I> {
        self.entries
            .iter()
            .filter(|(_, outcome)| outcome.is_timed_out())
            .map(|(id, _)| id)
    }

    pub fn stats(&self) -> &RunStats {
        &self.stats
    }

    pub fn into_entries(self) -> Vec<(I, Outcome<V>)> {
        self.entries
    }
}

impl<I: PartialEq, V> ScheduleResult<I, V> {
    pub fn get(&self, identity: &I) -> Option<&Outcome<V>> {
        self.entries
            .iter()
            .find(|(id, _)| id == identity)
            .map(|(_, outcome)| outcome)
    }
}

impl<I, V> IntoIterator for ScheduleResult<I, V> {
    type Item = (I, Outcome<V>);
    type IntoIter = std::vec::IntoIter<(I, Outcome<V>)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finalize_appends_timeouts_after_completions() {
        let mut c = ResultCollector::new();
        c.record_all(vec![(3, "c"), (1, "a")]);
        assert_eq!(c.finalize(vec![2, 4]), 2);

        let result = c.into_result(RunStats::default());
        let ids: Vec<i32> = result.iter().map(|(id, _)| *id).collect();
        assert_eq!(ids, vec![3, 1, 2, 4]);
        assert_eq!(result.completed().collect::<Vec<_>>(), vec![(&3, &"c"), (&1, &"a")]);
        assert_eq!(result.timed_out().collect::<Vec<_>>(), vec![&2, &4]);
        assert_eq!(result.get(&2), Some(&Outcome::TimedOut));
        assert_eq!(result.get(&9), None);
    }

    #[test]
    fn take_recorded_drains() {
        let mut c = ResultCollector::new();
        c.record("x", 1);
        assert_eq!(c.take_recorded(), vec![("x", Outcome::Completed(1))]);
        assert!(c.is_empty());
        c.finalize(vec!["y"]);
        assert_eq!(c.len(), 1);
        assert_eq!(c.take_recorded(), vec![("y", Outcome::TimedOut)]);
    }

    #[test]
    fn empty_finalize_appends_nothing() {
        let mut c: ResultCollector<u8, u8> = ResultCollector::new();
        assert_eq!(c.finalize(Vec::new()), 0);
        assert!(c.into_result(RunStats::default()).is_empty());
    }
}
