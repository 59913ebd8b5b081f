//! Suspension points between scans.
//!
//! The scheduler never blocks on an operation. Between two scans it hands
//! control to a [`Pause`] (blocking callers) or an [`AsyncPause`] (inside a
//! tokio runtime), passing the remaining deadline budget so a pause never
//! overshoots the deadline.

use std::time::Duration;

use async_trait::async_trait;

/// Yield point for a blocking scheduling loop.
pub trait Pause {
    fn pause(&mut self, remaining: Duration);
}

impl<F> Pause for F
where
    F: FnMut(Duration),
{
    fn pause(&mut self, remaining: Duration) {
        self(remaining)
    }
}

/// Yield point for a scheduling loop running as an async task.
#[async_trait]
pub trait AsyncPause: Send {
    async fn pause(&mut self, remaining: Duration);
}

/// Built-in pause strategies, usually derived from
/// [`SchedulerConfig::pause`](crate::types::SchedulerConfig::pause).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YieldStrategy {
    /// Thread (or task) yield, then rescan.
    Spin,
    /// Sleep for `interval`, capped at the remaining budget.
    Sleep { interval: Duration },
}

impl YieldStrategy {
    /// How long a pause with `remaining` budget left will sleep.
    pub fn sleep_for(&self, remaining: Duration) -> Duration {
        match self {
            YieldStrategy::Spin => Duration::ZERO,
            YieldStrategy::Sleep { interval } => (*interval).min(remaining),
        }
    }
}

impl Default for YieldStrategy {
    fn default() -> Self {
        YieldStrategy::Sleep {
            interval: Duration::from_millis(1),
        }
    }
}

impl Pause for YieldStrategy {
    fn pause(&mut self, remaining: Duration) {
        let nap = self.sleep_for(remaining);
        if nap.is_zero() {
            std::thread::yield_now();
        } else {
            std::thread::sleep(nap);
        }
    }
}

#[async_trait]
impl AsyncPause for YieldStrategy {
    async fn pause(&mut self, remaining: Duration) {
        let nap = self.sleep_for(remaining);
        if nap.is_zero() {
            tokio::task::yield_now().await;
        } else {
            tokio::time::sleep(nap).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sleep_is_capped_by_remaining_budget() {
        let s = YieldStrategy::Sleep {
            interval: Duration::from_millis(50),
        };
        assert_eq!(s.sleep_for(Duration::from_millis(5)), Duration::from_millis(5));
        assert_eq!(s.sleep_for(Duration::from_secs(1)), Duration::from_millis(50));
        assert_eq!(YieldStrategy::Spin.sleep_for(Duration::from_secs(1)), Duration::ZERO);
    }

    #[test]
    fn closures_are_pauses() {
        let mut seen = Vec::new();
        let mut p = |remaining: Duration| seen.push(remaining);
        p.pause(Duration::from_millis(3));
        p.pause(Duration::from_millis(1));
        assert_eq!(seen, vec![Duration::from_millis(3), Duration::from_millis(1)]);
    }

    #[tokio::test]
    async fn async_spin_returns_promptly() {
        let mut s = YieldStrategy::Spin;
        tokio::time::timeout(Duration::from_secs(1), AsyncPause::pause(&mut s, Duration::from_secs(10)))
            .await
            .unwrap();
    }
}
