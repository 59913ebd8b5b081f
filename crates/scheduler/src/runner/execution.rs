use std::fmt::Debug;
use std::hash::Hash;
use std::time::Duration;

use crate::collector::ScheduleResult;
use crate::error::ScheduleError;
use crate::operation::BackgroundOperation;
use crate::pause::{AsyncPause, Pause, YieldStrategy};

use super::core::{Scheduler, Step};
use super::harvest::Harvest;

impl<I, O> Scheduler<I, O>
where
    I: Eq + Hash + Clone + Debug,
    O: BackgroundOperation,
{
    /// Drive the run to `Done` on the calling thread.
    ///
    /// `pause` is invoked after every scan that leaves operations pending;
    /// it is the only place control is given up.
    pub fn run<P>(mut self, pause: &mut P) -> Result<ScheduleResult<I, O::Output>, ScheduleError>
    where
        P: Pause + ?Sized,
    {
        loop {
            match self.step()? {
                Step::Scanned { pending, .. } if pending > 0 => {
                    self.stats.record_yield();
                    pause.pause(self.remaining());
                }
                Step::Finished => break,
                _ => {}
            }
        }
        Ok(self.into_result())
    }

    /// Drive the run to `Done` inside an async runtime, yielding to other
    /// tasks between scans.
    pub async fn run_async<P>(
        mut self,
        pause: &mut P,
    ) -> Result<ScheduleResult<I, O::Output>, ScheduleError>
    where
        P: AsyncPause + ?Sized,
    {
        loop {
            match self.step()? {
                Step::Scanned { pending, .. } if pending > 0 => {
                    self.stats.record_yield();
                    pause.pause(self.remaining()).await;
                }
                Step::Finished => break,
                _ => {}
            }
        }
        Ok(self.into_result())
    }

    /// Stream outcomes as they are detected instead of collecting them.
    pub fn harvest<P: Pause>(self, pause: P) -> Harvest<I, O, P> {
        Harvest::new(self, pause)
    }
}

/// Schedule `operations` against `deadline`, pausing with the default
/// short sleep between scans.
pub fn schedule<I, O>(
    operations: impl IntoIterator<Item = (I, O)>,
    deadline: Duration,
) -> Result<ScheduleResult<I, O::Output>, ScheduleError>
where
    I: Eq + Hash + Clone + Debug,
    O: BackgroundOperation,
{
    schedule_with(operations, deadline, &mut YieldStrategy::default())
}

/// Like [`schedule`], with a caller-supplied pause.
pub fn schedule_with<I, O, P>(
    operations: impl IntoIterator<Item = (I, O)>,
    deadline: Duration,
    pause: &mut P,
) -> Result<ScheduleResult<I, O::Output>, ScheduleError>
where
    I: Eq + Hash + Clone + Debug,
    O: BackgroundOperation,
    P: Pause + ?Sized,
{
    Scheduler::new(operations, deadline)?.run(pause)
}

/// Async variant of [`schedule`] for use inside a tokio runtime.
pub async fn schedule_async<I, O>(
    operations: impl IntoIterator<Item = (I, O)>,
    deadline: Duration,
) -> Result<ScheduleResult<I, O::Output>, ScheduleError>
where
    I: Eq + Hash + Clone + Debug,
    O: BackgroundOperation,
{
    let scheduler = Scheduler::new(operations, deadline)?;
    scheduler.run_async(&mut YieldStrategy::default()).await
}
