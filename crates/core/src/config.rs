use std::env;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

/// Read a profiled env var: tries {PROFILE}_{KEY} first, falls back to {KEY}.
pub fn profiled_env_opt(profile: &str, key: &str) -> Option<String> {
    if !profile.is_empty() {
        let prefixed = format!("{}_{}", profile, key);
        if let Some(v) = env_opt(&prefixed) {
            return Some(v);
        }
    }
    env_opt(key)
}

/// Profiled lookup parsed into `T`. Unparseable values are logged and ignored.
pub fn profiled_env_parse<T: FromStr>(profile: &str, key: &str) -> Option<T> {
    let raw = profiled_env_opt(profile, key)?;
    match raw.parse() {
        Ok(v) => Some(v),
        Err(_) => {
            tracing::warn!(key, value = %raw, "ignoring unparseable env value");
            None
        }
    }
}

// ── Top-level config ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Active profile name (empty = default).
    pub profile: String,
    /// Default tracing filter when `RUST_LOG` is unset.
    pub log_filter: String,
    pub scheduler: SchedulerEnv,
}

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    /// Profile is read from `REAP_PROFILE`. When set (e.g. `CI`), every key
    /// is first looked up as `{PROFILE}_{KEY}`, falling back to `{KEY}`.
    pub fn from_env() -> Self {
        let profile = env_or("REAP_PROFILE", "");
        Self::for_profile(&profile)
    }

    /// Build config for a specific named profile (empty string = default).
    pub fn for_profile(profile: &str) -> Self {
        let p = profile.to_uppercase();
        let p = p.as_str();
        Self {
            profile: p.to_string(),
            log_filter: profiled_env_opt(p, "REAP_LOG").unwrap_or_else(|| "info".to_string()),
            scheduler: SchedulerEnv::from_env_profiled(p),
        }
    }

    pub fn profile_label(&self) -> &str {
        if self.profile.is_empty() { "default" } else { &self.profile }
    }

    /// Print a summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded (profile: {}):", self.profile_label());
        tracing::info!("  log:         filter={}", self.log_filter);
        tracing::info!(
            "  scheduler:   deadline_ms={:?}, poll_interval_ms={:?}, yield={:?}, workers={:?}",
            self.scheduler.deadline_ms,
            self.scheduler.poll_interval_ms,
            self.scheduler.yield_strategy,
            self.scheduler.worker_threads
        );
    }
}

// ── Scheduler ─────────────────────────────────────────────────

/// Scheduler overrides taken from the environment. `None` leaves the
/// file or built-in default in place.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchedulerEnv {
    pub deadline_ms: Option<u64>,
    pub poll_interval_ms: Option<u64>,
    pub yield_strategy: Option<String>,
    pub worker_threads: Option<usize>,
}

impl SchedulerEnv {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            deadline_ms: profiled_env_parse(p, "REAP_DEADLINE_MS"),
            poll_interval_ms: profiled_env_parse(p, "REAP_POLL_INTERVAL_MS"),
            yield_strategy: profiled_env_opt(p, "REAP_YIELD_STRATEGY"),
            worker_threads: profiled_env_parse(p, "REAP_WORKER_THREADS"),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.deadline_ms.is_none()
            && self.poll_interval_ms.is_none()
            && self.yield_strategy.is_none()
            && self.worker_threads.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profiled_key_wins_over_plain_key() {
        env::set_var("PROFTEST_REAP_TEST_ONLY_KEY", "prefixed");
        env::set_var("REAP_TEST_ONLY_KEY", "plain");
        assert_eq!(
            profiled_env_opt("PROFTEST", "REAP_TEST_ONLY_KEY").as_deref(),
            Some("prefixed")
        );
        assert_eq!(profiled_env_opt("", "REAP_TEST_ONLY_KEY").as_deref(), Some("plain"));
        assert_eq!(
            profiled_env_opt("OTHERPROF", "REAP_TEST_ONLY_KEY").as_deref(),
            Some("plain")
        );
    }

    #[test]
    fn empty_values_are_treated_as_unset() {
        env::set_var("REAP_TEST_EMPTY_KEY", "");
        assert!(profiled_env_opt("", "REAP_TEST_EMPTY_KEY").is_none());
    }

    #[test]
    fn parse_ignores_garbage() {
        env::set_var("PARSETEST_REAP_DEADLINE_MS", "soon");
        env::set_var("PARSETEST_REAP_WORKER_THREADS", "3");
        let config = Config::for_profile("parsetest");
        assert_eq!(config.profile, "PARSETEST");
        assert_eq!(config.scheduler.worker_threads, Some(3));
        assert!(config.scheduler.deadline_ms.is_none());
    }

    #[test]
    fn profile_label_defaults() {
        let config = Config::for_profile("");
        assert_eq!(config.profile_label(), "default");
        let config = Config::for_profile("ci");
        assert_eq!(config.profile_label(), "CI");
    }

    #[test]
    fn scheduler_env_is_empty() {
        assert!(SchedulerEnv::default().is_empty());
        let env = SchedulerEnv {
            poll_interval_ms: Some(5),
            ..Default::default()
        };
        assert!(!env.is_empty());
    }
}
