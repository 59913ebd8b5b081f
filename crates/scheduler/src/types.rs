use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use reap_core::config::SchedulerEnv;
use reap_core::ConfigError;
use serde::{Deserialize, Serialize};

use crate::pause::YieldStrategy;

/// Final disposition of one operation.
///
/// `TimedOut` is only ever produced by the scheduler at finalize time,
/// never by an operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum Outcome<V> {
    Completed(V),
    TimedOut,
}

impl<V> Outcome<V> {
    pub fn is_completed(&self) -> bool {
        matches!(self, Outcome::Completed(_))
    }

    pub fn is_timed_out(&self) -> bool {
        matches!(self, Outcome::TimedOut)
    }

    pub fn value(&self) -> Option<&V> {
        match self {
            Outcome::Completed(v) => Some(v),
            Outcome::TimedOut => None,
        }
    }

    pub fn into_value(self) -> Option<V> {
        match self {
            Outcome::Completed(v) => Some(v),
            Outcome::TimedOut => None,
        }
    }
}

/// How the scheduler suspends between scans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum YieldMode {
    /// Give up the time slice and rescan right away.
    Spin,
    /// Sleep for `poll_interval_ms` (capped at the remaining budget).
    Sleep,
}

impl FromStr for YieldMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "spin" => Ok(YieldMode::Spin),
            "sleep" => Ok(YieldMode::Sleep),
            other => Err(ConfigError::Invalid(format!(
                "unknown yield strategy '{other}' (expected 'spin' or 'sleep')"
            ))),
        }
    }
}

/// Scheduler configuration, typically parsed from TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Deadline for one scheduling run, in milliseconds.
    #[serde(default = "default_deadline")]
    pub deadline_ms: u64,
    /// Pause between scans in milliseconds (used by `sleep`).
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,
    /// Suspension strategy between scans.
    #[serde(default = "default_yield_strategy")]
    pub yield_strategy: YieldMode,
    /// Number of launcher worker threads. 0 = num_cpus.
    #[serde(default = "default_worker_threads")]
    pub worker_threads: usize,
}

fn default_deadline() -> u64 { 5000 }
fn default_poll_interval() -> u64 { 10 }
fn default_yield_strategy() -> YieldMode { YieldMode::Sleep }
fn default_worker_threads() -> usize { 0 }

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            deadline_ms: default_deadline(),
            poll_interval_ms: default_poll_interval(),
            yield_strategy: default_yield_strategy(),
            worker_threads: default_worker_threads(),
        }
    }
}

impl SchedulerConfig {
    /// Parse and validate config from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Load config from a file path.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml(&content)
    }

    /// Load from an optional file, then apply environment overrides and validate.
    pub fn load(path: Option<&Path>, env: &SchedulerEnv) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(p) => Self::from_file(p)?,
            None => Self::default(),
        };
        config.apply_env_overrides(env)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `REAP_*` overrides collected by [`reap_core::Config`].
    pub fn apply_env_overrides(&mut self, env: &SchedulerEnv) -> Result<(), ConfigError> {
        if let Some(ms) = env.deadline_ms {
            self.deadline_ms = ms;
        }
        if let Some(ms) = env.poll_interval_ms {
            self.poll_interval_ms = ms;
        }
        if let Some(mode) = &env.yield_strategy {
            self.yield_strategy = mode.parse()?;
        }
        if let Some(n) = env.worker_threads {
            self.worker_threads = n;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.yield_strategy == YieldMode::Sleep && self.poll_interval_ms == 0 {
            return Err(ConfigError::Invalid(
                "poll_interval_ms must be > 0 when yield_strategy = \"sleep\"".into(),
            ));
        }
        Ok(())
    }

    pub fn deadline(&self) -> Duration {
        Duration::from_millis(self.deadline_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Build the pause strategy described by this config.
    pub fn pause(&self) -> YieldStrategy {
        match self.yield_strategy {
            YieldMode::Spin => YieldStrategy::Spin,
            YieldMode::Sleep => YieldStrategy::Sleep {
                interval: self.poll_interval(),
            },
        }
    }

    /// Resolve worker thread count (0 means use available parallelism).
    pub fn resolved_worker_threads(&self) -> usize {
        if self.worker_threads == 0 {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(4)
        } else {
            self.worker_threads
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scheduler_config_defaults() {
        let config = SchedulerConfig::default();
        assert_eq!(config.deadline_ms, 5000);
        assert_eq!(config.poll_interval_ms, 10);
        assert_eq!(config.yield_strategy, YieldMode::Sleep);
        assert_eq!(config.worker_threads, 0);
        assert_eq!(config.deadline(), Duration::from_secs(5));
    }

    #[test]
    fn resolved_worker_threads() {
        let mut config = SchedulerConfig::default();
        // 0 means auto-detect
        assert!(config.resolved_worker_threads() > 0);

        config.worker_threads = 8;
        assert_eq!(config.resolved_worker_threads(), 8);
    }

    #[test]
    fn parse_partial_toml_fills_defaults() {
        let config = SchedulerConfig::from_toml("deadline_ms = 250\nyield_strategy = \"spin\"\n").unwrap();
        assert_eq!(config.deadline(), Duration::from_millis(250));
        assert_eq!(config.yield_strategy, YieldMode::Spin);
        assert_eq!(config.poll_interval_ms, 10);
        assert_eq!(config.pause(), YieldStrategy::Spin);
    }

    #[test]
    fn zero_interval_sleep_is_rejected() {
        let err = SchedulerConfig::from_toml("poll_interval_ms = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        // Spin never sleeps, so a zero interval is fine there.
        SchedulerConfig::from_toml("poll_interval_ms = 0\nyield_strategy = \"spin\"").unwrap();
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = SchedulerConfig::from_toml("deadline_ms = \"never\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn env_overrides_apply() {
        let env = SchedulerEnv {
            deadline_ms: Some(42),
            poll_interval_ms: None,
            yield_strategy: Some("SPIN".into()),
            worker_threads: Some(2),
        };
        let config = SchedulerConfig::load(None, &env).unwrap();
        assert_eq!(config.deadline_ms, 42);
        assert_eq!(config.poll_interval_ms, 10);
        assert_eq!(config.yield_strategy, YieldMode::Spin);
        assert_eq!(config.worker_threads, 2);
    }

    #[test]
    fn bad_yield_override_is_invalid() {
        let env = SchedulerEnv {
            yield_strategy: Some("busy".into()),
            ..Default::default()
        };
        assert!(matches!(
            SchedulerConfig::load(None, &env),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn outcome_serializes_with_status_tag() {
        let done: Outcome<u32> = Outcome::Completed(7);
        let late: Outcome<u32> = Outcome::TimedOut;
        assert_eq!(
            serde_json::to_value(&done).unwrap(),
            serde_json::json!({"status": "completed", "value": 7})
        );
        assert_eq!(
            serde_json::to_value(&late).unwrap(),
            serde_json::json!({"status": "timed_out"})
        );
    }

    #[test]
    fn outcome_accessors() {
        let done = Outcome::Completed("x");
        assert!(done.is_completed());
        assert_eq!(done.value(), Some(&"x"));
        assert_eq!(done.into_value(), Some("x"));
        let late: Outcome<&str> = Outcome::TimedOut;
        assert!(late.is_timed_out());
        assert_eq!(late.into_value(), None);
    }
}
