//! Deadline-bounded cooperative scheduler for background operations.
//!
//! A caller hands over a set of already-running operations, each tagged
//! with an identity, plus a deadline. The [`Scheduler`] scans the set
//! without blocking, harvests whatever is ready, and yields between scans.
//! When the set drains or the deadline passes it returns a
//! [`ScheduleResult`]: completed outcomes in detection order, then every
//! still-pending identity as [`Outcome::TimedOut`].
//!
//! Timing out never cancels the underlying work; the scheduler just stops
//! watching it.

pub mod collector;
pub mod deadline;
pub mod error;
pub mod launch;
pub mod metrics;
pub mod operation;
pub mod pause;
pub mod pending;
pub mod runner;
pub mod types;

pub use collector::{ResultCollector, ScheduleResult};
pub use deadline::DeadlinePolicy;
pub use error::{LaunchError, MisuseError, ScheduleError};
pub use launch::Launcher;
pub use metrics::RunStats;
pub use operation::{BackgroundOperation, OperationFailure, Ready, TaskOperation, ThreadOperation};
pub use pause::{AsyncPause, Pause, YieldStrategy};
pub use pending::PendingSet;
pub use runner::{schedule, schedule_async, schedule_with, Harvest, Scheduler, SchedulerState, Step};
pub use types::{Outcome, SchedulerConfig, YieldMode};
