use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use tracing::debug;

use crate::error::MisuseError;

use super::{BackgroundOperation, OperationFailure};

/// Result slot shared between a worker thread and the operation handle.
///
/// The worker writes `value` and then sets `ready` with `Release`; readers
/// load `ready` with `Acquire`, so a `true` guarantees the value is visible.
struct Slot<T> {
    ready: AtomicBool,
    value: Mutex<Option<Result<T, OperationFailure>>>,
}

impl<T> Slot<T> {
    fn new() -> Self {
        Self {
            ready: AtomicBool::new(false),
            value: Mutex::new(None),
        }
    }

    fn publish(&self, result: Result<T, OperationFailure>) {
        let mut guard = self.value.lock().unwrap_or_else(|e| e.into_inner());
        *guard = Some(result);
        drop(guard);
        self.ready.store(true, Ordering::Release);
    }
}

/// Work running on a worker thread.
///
/// A panic inside the work is caught and surfaces as
/// `Err(OperationFailure::Panicked(..))` in the completed value.
pub struct ThreadOperation<T> {
    slot: Arc<Slot<T>>,
    taken: bool,
}

impl<T: Send + 'static> ThreadOperation<T> {
    /// Run `work` on a dedicated std thread.
    pub fn spawn<F>(work: F) -> Self
    where
        F: FnOnce() -> T + Send + 'static,
    {
        let (op, job) = Self::pair(work);
        std::thread::spawn(job);
        op
    }

    /// Run `work` on a rayon pool.
    pub fn spawn_on<F>(pool: &rayon::ThreadPool, work: F) -> Self
    where
        F: FnOnce() -> T + Send + 'static,
    {
        let (op, job) = Self::pair(work);
        pool.spawn(job);
        op
    }

    /// Build the handle plus the job that fills it, for callers that bring
    /// their own executor.
    pub fn pair<F>(work: F) -> (Self, impl FnOnce() + Send + 'static)
    where
        F: FnOnce() -> T + Send + 'static,
    {
        let slot = Arc::new(Slot::new());
        let writer = Arc::clone(&slot);
        let job = move || {
            let result = panic::catch_unwind(AssertUnwindSafe(work))
                .map_err(OperationFailure::from_panic);
            if let Err(e) = &result {
                debug!(error = %e, "background work failed");
            }
            writer.publish(result);
        };
        (Self { slot, taken: false }, job)
    }
}

impl<T> BackgroundOperation for ThreadOperation<T> {
    type Output = Result<T, OperationFailure>;

    fn is_ready(&self) -> bool {
        self.slot.ready.load(Ordering::Acquire)
    }

    fn take_result(&mut self) -> Result<Self::Output, MisuseError> {
        if self.taken {
            return Err(MisuseError::AlreadyTaken);
        }
        if !self.is_ready() {
            return Err(MisuseError::NotReady);
        }
        let mut guard = self.slot.value.lock().unwrap_or_else(|e| e.into_inner());
        let result = guard.take().ok_or(MisuseError::AlreadyTaken)?;
        self.taken = true;
        Ok(result)
    }
}
