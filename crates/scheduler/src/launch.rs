use tracing::info;

use crate::error::LaunchError;
use crate::operation::ThreadOperation;
use crate::types::SchedulerConfig;

/// Turns closures into thread-backed operations on a shared rayon pool.
///
/// The launcher only starts work; observing it is the scheduler's job.
/// Dropping the launcher lets already-queued work finish.
pub struct Launcher {
    pool: rayon::ThreadPool,
}

impl Launcher {
    /// Build a pool with `config.resolved_worker_threads()` workers.
    pub fn new(config: &SchedulerConfig) -> Result<Self, LaunchError> {
        Self::with_threads(config.resolved_worker_threads())
    }

    pub fn with_threads(num_threads: usize) -> Result<Self, LaunchError> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .thread_name(|i| format!("reap-worker-{i}"))
            .build()?;
        info!("Launcher started with {} workers", pool.current_num_threads());
        Ok(Self { pool })
    }

    pub fn launch<T, F>(&self, work: F) -> ThreadOperation<T>
    where
        T: Send + 'static,
        F: FnOnce() -> T + Send + 'static,
    {
        ThreadOperation::spawn_on(&self.pool, work)
    }

    pub fn num_threads(&self) -> usize {
        self.pool.current_num_threads()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::runner::schedule;
    use crate::types::Outcome;

    #[test]
    fn launcher_uses_configured_threads() {
        let mut config = SchedulerConfig::default();
        config.worker_threads = 3;
        let launcher = Launcher::new(&config).unwrap();
        assert_eq!(launcher.num_threads(), 3);
    }

    #[test]
    fn launched_work_is_scheduled() {
        let launcher = Launcher::with_threads(2).unwrap();
        let ops: Vec<_> = (0..6u64).map(|i| (i, launcher.launch(move || i * i))).collect();
        let result = schedule(ops, Duration::from_secs(5)).unwrap();

        assert_eq!(result.len(), 6);
        for i in 0..6u64 {
            assert_eq!(result.get(&i), Some(&Outcome::Completed(Ok(i * i))));
        }
    }
}
