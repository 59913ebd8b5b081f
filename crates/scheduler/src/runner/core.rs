use std::fmt::Debug;
use std::hash::Hash;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::collector::{ResultCollector, ScheduleResult};
use crate::deadline::DeadlinePolicy;
use crate::error::ScheduleError;
use crate::metrics::RunStats;
use crate::operation::BackgroundOperation;
use crate::pending::PendingSet;

/// Lifecycle of a scheduling run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    /// Scanning until the set drains or the deadline passes.
    Running,
    /// Deadline passed; the next step reports the residual as timed out.
    Draining,
    /// Terminal.
    Done,
}

/// What a single [`Scheduler::step`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// One scan ran. `pending` operations are still outstanding.
    Scanned { harvested: usize, pending: usize },
    /// The deadline was hit before scanning; `pending` will time out.
    Expired { pending: usize },
    /// The run is done.
    Finished,
}

/// Single-threaded cooperative driver over a set of background operations.
///
/// The scheduler owns every submitted operation until it is harvested or
/// the run ends. It never blocks on an operation: each scan only calls
/// `is_ready`, and control is handed to a pause between scans.
pub struct Scheduler<I, O: BackgroundOperation> {
    pub(super) pending: PendingSet<I, O>,
    pub(super) collector: ResultCollector<I, O::Output>,
    pub(super) budget: Duration,
    /// Armed on the first step.
    pub(super) deadline: Option<DeadlinePolicy>,
    pub(super) state: SchedulerState,
    pub(super) stats: RunStats,
}

impl<I, O> Scheduler<I, O>
where
    I: Eq + Hash + Clone + Debug,
    O: BackgroundOperation,
{
    /// Take ownership of `operations`. The deadline clock starts at the
    /// first [`step`](Self::step).
    ///
    /// Fails with `DuplicateIdentity` before anything is scheduled.
    pub fn new(
        operations: impl IntoIterator<Item = (I, O)>,
        budget: Duration,
    ) -> Result<Self, ScheduleError> {
        let pending = PendingSet::from_operations(operations)?;
        debug!(
            operations = pending.len(),
            budget_ms = budget.as_millis() as u64,
            "scheduler created"
        );
        Ok(Self {
            pending,
            collector: ResultCollector::new(),
            budget,
            deadline: None,
            state: SchedulerState::Running,
            stats: RunStats::default(),
        })
    }

    /// Perform one state transition.
    ///
    /// In `Running` the deadline is checked before the scan, so no scan ever
    /// starts after expiry. A `Misuse` error ends the run.
    pub fn step(&mut self) -> Result<Step, ScheduleError> {
        match self.state {
            SchedulerState::Running => {
                let now = Instant::now();
                let budget = self.budget;
                self.stats.mark_started();
                let deadline = self
                    .deadline
                    .get_or_insert_with(|| DeadlinePolicy::starting_at(now, budget));

                if self.pending.is_empty() {
                    self.collector.finalize(Vec::new());
                    self.finish(0);
                    return Ok(Step::Finished);
                }
                if deadline.expired(now) {
                    self.state = SchedulerState::Draining;
                    return Ok(Step::Expired {
                        pending: self.pending.len(),
                    });
                }

                let harvested = match self.pending.scan_once() {
                    Ok(h) => h,
                    Err(e) => {
                        self.state = SchedulerState::Done;
                        return Err(e);
                    }
                };
                let count = harvested.len();
                self.stats.record_scan(count);
                self.collector.record_all(harvested);
                debug!(
                    scan = self.stats.scans,
                    harvested = count,
                    pending = self.pending.len(),
                    "scan complete"
                );
                Ok(Step::Scanned {
                    harvested: count,
                    pending: self.pending.len(),
                })
            }
            SchedulerState::Draining => {
                // Dropping the operations stops observation only.
                let abandoned = self.pending.abandon();
                if !abandoned.is_empty() {
                    warn!(
                        count = abandoned.len(),
                        budget_ms = self.budget.as_millis() as u64,
                        "deadline reached, abandoning pending operations"
                    );
                }
                let timed_out = self.collector.finalize(abandoned);
                self.finish(timed_out);
                Ok(Step::Finished)
            }
            SchedulerState::Done => Ok(Step::Finished),
        }
    }

    fn finish(&mut self, timed_out: usize) {
        let elapsed = self
            .deadline
            .as_ref()
            .map(|d| d.elapsed(Instant::now()))
            .unwrap_or_default();
        self.stats.finish(timed_out, elapsed);
        self.state = SchedulerState::Done;
        info!(
            completed = self.stats.completed,
            timed_out,
            scans = self.stats.scans,
            elapsed_ms = elapsed.as_millis() as u64,
            "scheduling run finished"
        );
    }

    /// Budget left before the deadline (the full budget before the first step).
    pub fn remaining(&self) -> Duration {
        match &self.deadline {
            Some(d) => d.remaining(Instant::now()),
            None => self.budget,
        }
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    /// Number of operations still pending.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Identities still pending, in scan order.
    pub fn residual(&self) -> Vec<I> {
        self.pending.residual()
    }

    pub fn stats(&self) -> &RunStats {
        &self.stats
    }

    pub(super) fn into_result(self) -> ScheduleResult<I, O::Output> {
        self.collector.into_result(self.stats)
    }
}
