use std::collections::VecDeque;
use std::fmt::Debug;
use std::hash::Hash;

use crate::error::ScheduleError;
use crate::metrics::RunStats;
use crate::operation::BackgroundOperation;
use crate::pause::Pause;
use crate::types::Outcome;

use super::core::{Scheduler, SchedulerState, Step};

/// Iterator over outcomes in detection order, followed by timeouts.
///
/// Yields exactly the entries [`Scheduler::run`] would return, in the same
/// order, scanning lazily as the caller pulls. Fused after an error.
pub struct Harvest<I, O: BackgroundOperation, P> {
    scheduler: Scheduler<I, O>,
    pause: P,
    ready: VecDeque<(I, Outcome<O::Output>)>,
    yield_due: bool,
    failed: bool,
}

impl<I, O, P> Harvest<I, O, P>
where
    I: Eq + Hash + Clone + Debug,
    O: BackgroundOperation,
    P: Pause,
{
    pub(super) fn new(scheduler: Scheduler<I, O>, pause: P) -> Self {
        Self {
            scheduler,
            pause,
            ready: VecDeque::new(),
            yield_due: false,
            failed: false,
        }
    }

    pub fn stats(&self) -> &RunStats {
        self.scheduler.stats()
    }

    pub fn state(&self) -> SchedulerState {
        self.scheduler.state()
    }
}

impl<I, O, P> Iterator for Harvest<I, O, P>
where
    I: Eq + Hash + Clone + Debug,
    O: BackgroundOperation,
    P: Pause,
{
    type Item = Result<(I, Outcome<O::Output>), ScheduleError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(entry) = self.ready.pop_front() {
                return Some(Ok(entry));
            }
            if self.failed || self.scheduler.state() == SchedulerState::Done {
                return None;
            }
            if self.yield_due {
                self.yield_due = false;
                self.scheduler.stats.record_yield();
                self.pause.pause(self.scheduler.remaining());
            }
            match self.scheduler.step() {
                Ok(step) => {
                    self.ready.extend(self.scheduler.collector.take_recorded());
                    if let Step::Scanned { pending, .. } = step {
                        self.yield_due = pending > 0;
                    }
                }
                Err(e) => {
                    self.failed = true;
                    return Some(Err(e));
                }
            }
        }
    }
}
