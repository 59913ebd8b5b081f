use std::time::{Duration, Instant};

/// Wall-clock deadline for one scheduling run.
///
/// Once `expired` has returned `true` it keeps returning `true`, even if a
/// caller passes an earlier `now`.
#[derive(Debug, Clone)]
pub struct DeadlinePolicy {
    started: Instant,
    budget: Duration,
    tripped: bool,
}

impl DeadlinePolicy {
    pub fn starting_at(started: Instant, budget: Duration) -> Self {
        Self {
            started,
            budget,
            tripped: budget.is_zero(),
        }
    }

    pub fn starting_now(budget: Duration) -> Self {
        Self::starting_at(Instant::now(), budget)
    }

    pub fn expired(&mut self, now: Instant) -> bool {
        if !self.tripped && self.elapsed(now) >= self.budget {
            self.tripped = true;
        }
        self.tripped
    }

    /// Budget left at `now`; zero once expired.
    pub fn remaining(&self, now: Instant) -> Duration {
        if self.tripped {
            return Duration::ZERO;
        }
        self.budget.saturating_sub(self.elapsed(now))
    }

    pub fn elapsed(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.started)
    }

    pub fn budget(&self) -> Duration {
        self.budget
    }

    pub fn started(&self) -> Instant {
        self.started
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_budget_is_expired_immediately() {
        let start = Instant::now();
        let mut d = DeadlinePolicy::starting_at(start, Duration::ZERO);
        assert!(d.expired(start));
        assert_eq!(d.remaining(start), Duration::ZERO);
    }

    #[test]
    fn expires_at_budget() {
        let start = Instant::now();
        let mut d = DeadlinePolicy::starting_at(start, Duration::from_millis(100));
        assert!(!d.expired(start + Duration::from_millis(99)));
        assert_eq!(d.remaining(start + Duration::from_millis(40)), Duration::from_millis(60));
        assert!(d.expired(start + Duration::from_millis(100)));
    }

    #[test]
    fn expiry_latches() {
        let start = Instant::now();
        let mut d = DeadlinePolicy::starting_at(start, Duration::from_millis(10));
        assert!(d.expired(start + Duration::from_millis(20)));
        // An earlier reading does not un-expire the deadline.
        assert!(d.expired(start));
        assert_eq!(d.remaining(start), Duration::ZERO);
    }

    #[test]
    fn elapsed_saturates_before_start() {
        let start = Instant::now() + Duration::from_secs(1);
        let d = DeadlinePolicy::starting_at(start, Duration::from_secs(1));
        assert_eq!(d.elapsed(Instant::now()), Duration::ZERO);
        assert_eq!(d.budget(), Duration::from_secs(1));
        assert_eq!(d.started(), start);
    }
}
