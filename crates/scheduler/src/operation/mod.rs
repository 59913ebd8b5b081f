//! Background operations the scheduler can observe.
//!
//! An operation is a unit of work that is already in flight. The scheduler
//! only ever asks two things of it: whether it is ready, and (once) for its
//! result. How the work runs is up to the implementation:
//!
//! - [`Ready`]: a pre-resolved value
//! - [`ThreadOperation`]: work running on a std or rayon thread
//! - [`TaskOperation`]: a spawned tokio task

mod ready;
mod task;
mod thread;

pub use ready::Ready;
pub use task::TaskOperation;
pub use thread::ThreadOperation;

use serde::Serialize;
use thiserror::Error;

use crate::error::MisuseError;

/// A unit of work already in flight.
///
/// Contract:
/// - `is_ready` has no side effects and may be called any number of times.
///   Once it returns `true` it never returns `false` again.
/// - `take_result` is called at most once, and only after `is_ready`
///   returned `true`. Anything else is a [`MisuseError`].
///
/// Operations are never cancelled through this trait. Dropping an
/// operation stops observation; the underlying work may keep running.
pub trait BackgroundOperation {
    /// Value handed to the caller as `Outcome::Completed`.
    type Output;

    /// Non-blocking readiness check.
    fn is_ready(&self) -> bool;

    /// Move the result out of the operation.
    fn take_result(&mut self) -> Result<Self::Output, MisuseError>;
}

impl<O: BackgroundOperation + ?Sized> BackgroundOperation for Box<O> {
    type Output = O::Output;

    fn is_ready(&self) -> bool {
        (**self).is_ready()
    }

    fn take_result(&mut self) -> Result<Self::Output, MisuseError> {
        (**self).take_result()
    }
}

/// Failure payload of a thread- or task-backed operation.
///
/// The scheduler passes it through untouched as part of the completed value.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", content = "message", rename_all = "snake_case")]
pub enum OperationFailure {
    #[error("operation panicked: {0}")]
    Panicked(String),
    #[error("operation was cancelled")]
    Cancelled,
}

impl OperationFailure {
    /// Build a `Panicked` failure from a `catch_unwind` / `JoinError` payload.
    pub(crate) fn from_panic(payload: Box<dyn std::any::Any + Send>) -> Self {
        let msg = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "non-string panic payload".to_string()
        };
        OperationFailure::Panicked(msg)
    }
}
