//! Scheduler runner -- drives one scheduling run to completion.
//!
//! Split into focused submodules:
//! - `core`: Scheduler struct, constructor, and the `step` state machine
//! - `execution`: blocking and async run loops plus the `schedule*` entry points
//! - `harvest`: streaming iterator over outcomes as they are detected

mod core;
mod execution;
mod harvest;

pub use self::core::{Scheduler, SchedulerState, Step};
pub use self::execution::{schedule, schedule_async, schedule_with};
pub use self::harvest::Harvest;
