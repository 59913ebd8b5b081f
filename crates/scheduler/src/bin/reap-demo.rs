//! reap-demo: launch simulated background work and collect it under a deadline.
//!
//! Task `i` sleeps `(i % 10) * step` and returns `i * 10`. Whatever has not
//! finished when the deadline passes is reported as timed out.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use serde::Serialize;
use tracing::{info, warn};

use reap_scheduler::{
    Launcher, Outcome, OperationFailure, ScheduleResult, Scheduler, SchedulerConfig, TaskOperation,
};

// ── CLI ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Runtime {
    /// Rayon worker pool, scheduler on a blocking thread.
    Thread,
    /// Tokio blocking tasks, scheduler as an async task.
    Tokio,
}

/// Run simulated operations through the deadline scheduler.
#[derive(Parser, Debug)]
#[command(name = "reap-demo", version, about)]
struct Cli {
    /// Path to a scheduler TOML config file.
    #[arg(long, env = "REAP_CONFIG")]
    config: Option<PathBuf>,

    /// Number of operations to launch.
    #[arg(long, default_value_t = 20)]
    tasks: u64,

    /// Delay step in milliseconds; task i sleeps (i % 10) * step.
    #[arg(long, default_value_t = 100)]
    step_ms: u64,

    /// Deadline in milliseconds (overrides config and env).
    #[arg(long)]
    deadline_ms: Option<u64>,

    /// Execution backend for the operations.
    #[arg(long, value_enum, default_value_t = Runtime::Thread)]
    runtime: Runtime,

    /// Print the result as JSON.
    #[arg(long)]
    json: bool,
}

type DemoResult = ScheduleResult<u64, Result<u64, OperationFailure>>;

fn simulated_work(i: u64, step_ms: u64) -> u64 {
    std::thread::sleep(Duration::from_millis((i % 10) * step_ms));
    i * 10
}

fn run_on_threads(tasks: u64, step: u64, config: &SchedulerConfig) -> anyhow::Result<DemoResult> {
    let launcher = Launcher::new(config)?;
    let ops: Vec<_> = (0..tasks)
        .map(|i| (i, launcher.launch(move || simulated_work(i, step))))
        .collect();
    let result = Scheduler::new(ops, config.deadline())?.run(&mut config.pause())?;
    Ok(result)
}

async fn run_on_tokio(tasks: u64, step: u64, config: &SchedulerConfig) -> anyhow::Result<DemoResult> {
    let ops: Vec<_> = (0..tasks)
        .map(|i| (i, TaskOperation::spawn_blocking(move || simulated_work(i, step))))
        .collect();
    let result = Scheduler::new(ops, config.deadline())?
        .run_async(&mut config.pause())
        .await?;
    Ok(result)
}

#[derive(Serialize)]
struct Report<'a> {
    runtime: String,
    deadline_ms: u64,
    result: &'a DemoResult,
}

fn print_plain(result: &DemoResult) {
    println!("Collected results (up to deadline):");
    for (id, outcome) in result.iter() {
        match outcome {
            Outcome::Completed(Ok(v)) => println!("  {id:>4}  {v}"),
            Outcome::Completed(Err(e)) => println!("  {id:>4}  failed: {e}"),
            Outcome::TimedOut => println!("  {id:>4}  timed out"),
        }
    }
    let stats = result.stats();
    println!(
        "{} completed, {} timed out, {} scans in {:?}",
        stats.completed, stats.timed_out, stats.scans, stats.elapsed
    );
}

// ── main ────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    reap_core::config::load_dotenv();
    let env_config = reap_core::Config::from_env();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&env_config.log_filter)),
        )
        .init();

    let cli = Cli::parse();
    env_config.log_summary();

    let mut config = SchedulerConfig::load(cli.config.as_deref(), &env_config.scheduler)
        .with_context(|| match &cli.config {
            Some(p) => format!("loading scheduler config from {}", p.display()),
            None => "building scheduler config".to_string(),
        })?;
    if let Some(ms) = cli.deadline_ms {
        config.deadline_ms = ms;
    }
    info!(
        tasks = cli.tasks,
        deadline_ms = config.deadline_ms,
        runtime = ?cli.runtime,
        "launching operations"
    );

    let (tasks, step) = (cli.tasks, cli.step_ms);
    let result = match cli.runtime {
        Runtime::Thread => {
            let cfg = config.clone();
            tokio::task::spawn_blocking(move || run_on_threads(tasks, step, &cfg))
                .await
                .context("scheduler thread panicked")??
        }
        Runtime::Tokio => run_on_tokio(tasks, step, &config).await?,
    };

    finish(&result, cli.runtime, &config, cli.json)
}

fn finish(
    result: &DemoResult,
    runtime: Runtime,
    config: &SchedulerConfig,
    json: bool,
) -> anyhow::Result<()> {
    let timed_out = result.stats().timed_out;
    if timed_out > 0 {
        warn!(timed_out, "some operations missed the deadline");
    }
    if json {
        let report = Report {
            runtime: format!("{runtime:?}").to_lowercase(),
            deadline_ms: config.deadline_ms,
            result,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_plain(result);
    }
    Ok(())
}
