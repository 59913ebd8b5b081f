use std::future::Future;

use futures::FutureExt;
use tokio::task::{JoinError, JoinHandle};

use crate::error::MisuseError;

use super::{BackgroundOperation, OperationFailure};

/// A spawned tokio task.
///
/// Dropping the operation detaches the task; it is not aborted.
pub struct TaskOperation<T> {
    handle: Option<JoinHandle<T>>,
}

impl<T: Send + 'static> TaskOperation<T> {
    /// Spawn `future` on the current tokio runtime.
    ///
    /// Panics if called outside a runtime, like `tokio::spawn`.
    pub fn spawn<F>(future: F) -> Self
    where
        F: Future<Output = T> + Send + 'static,
    {
        Self::from_handle(tokio::spawn(future))
    }

    /// Spawn blocking `work` on the runtime's blocking pool.
    pub fn spawn_blocking<F>(work: F) -> Self
    where
        F: FnOnce() -> T + Send + 'static,
    {
        Self::from_handle(tokio::task::spawn_blocking(work))
    }
}

impl<T> TaskOperation<T> {
    pub fn from_handle(handle: JoinHandle<T>) -> Self {
        Self {
            handle: Some(handle),
        }
    }
}

impl<T> From<JoinHandle<T>> for TaskOperation<T> {
    fn from(handle: JoinHandle<T>) -> Self {
        Self::from_handle(handle)
    }
}

impl From<JoinError> for OperationFailure {
    fn from(err: JoinError) -> Self {
        if err.is_cancelled() {
            OperationFailure::Cancelled
        } else {
            OperationFailure::from_panic(err.into_panic())
        }
    }
}

impl<T> BackgroundOperation for TaskOperation<T> {
    type Output = Result<T, OperationFailure>;

    fn is_ready(&self) -> bool {
        // A consumed handle was ready when it was taken.
        self.handle.as_ref().map_or(true, JoinHandle::is_finished)
    }

    fn take_result(&mut self) -> Result<Self::Output, MisuseError> {
        let handle = self.handle.as_mut().ok_or(MisuseError::AlreadyTaken)?;
        if !handle.is_finished() {
            return Err(MisuseError::NotReady);
        }
        // A finished handle resolves on the first poll. Unconstrained so an
        // exhausted coop budget cannot turn that poll into Pending.
        let joined = tokio::task::unconstrained(handle)
            .now_or_never()
            .ok_or(MisuseError::NotReady)?;
        self.handle = None;
        Ok(joined.map_err(OperationFailure::from))
    }
}
