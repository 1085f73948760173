// Twin Engine Benchmark Runner v0.1.0: Monte Carlo comparison of both systems
// Seedable PRNG, per-tick invariant audit, optional JSONL time series
//
// Usage:
//   cargo run --release --bin bench                     # Run all scenarios (30 runs each)
//   cargo run --release --bin bench -- --runs 5         # Quick mode (5 runs each)
//   cargo run --release --bin bench -- RESET_CYCLE      # Filter by name, label or category
//   cargo run --release --bin bench -- --time-series    # Enable JSONL output
//   cargo run --release --bin bench -- --seed 42        # Custom base seed

mod chaos;
mod metrics;
mod monte_carlo;
mod report;
mod scenarios;
mod time_series;

use clap::Parser;
use report::*;
use scenarios::*;
use std::path::PathBuf;
use std::time::{Instant, SystemTime, UNIX_EPOCH};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Runs below this pass rate mark a scenario as failed.
const PASS_THRESHOLD: f64 = 1.0;

// ─── CLI Parsing ────────────────────────────────────────────────────────────

/// Twin Engine benchmark runner
#[derive(Parser, Debug)]
#[command(name = "bench")]
#[command(about = "Monte Carlo comparison of the Substrate and Analogue systems", long_about = None)]
struct Cli {
    /// Runs per scenario
    #[arg(long, default_value = "30")]
    runs: usize,

    /// Base seed; run i uses seed + i
    #[arg(long, default_value = "0")]
    seed: u64,

    /// Override every scenario's tick count
    #[arg(long)]
    ticks: Option<u64>,

    /// Write one JSONL file per scenario and seed
    #[arg(long)]
    time_series: bool,

    /// Output directory for reports
    #[arg(long, default_value = "benchmark-results")]
    out_dir: PathBuf,

    /// Debug-level logging (RUST_LOG takes precedence)
    #[arg(short, long)]
    verbose: bool,

    /// Only run scenarios whose name, label or category contains this
    filter: Option<String>,
}

fn init_tracing(verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(default))?;
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();
    Ok(())
}

// ─── Main ───────────────────────────────────────────────────────────────────

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    let all_scenarios = scenarios();
    let to_run: Vec<&Scenario> = match &cli.filter {
        Some(f) => {
            let f_lower = f.to_lowercase();
            all_scenarios.iter()
                .filter(|s| s.name.to_lowercase().contains(&f_lower)
                          || s.label.to_lowercase().contains(&f_lower)
                          || s.category.to_lowercase().contains(&f_lower))
                .collect()
        }
        None => all_scenarios.iter().collect(),
    };

    if to_run.is_empty() {
        error!(filter = ?cli.filter, "no scenarios match filter");
        std::process::exit(1);
    }

    let ts_dir = cli.time_series.then(|| cli.out_dir.join("time-series"));

    info!(runs = cli.runs, seed = cli.seed, scenarios = to_run.len(), "Twin Engine Benchmark Runner v0.1.0");
    println!("\n  PRNG: ChaCha8Rng | Runs/scenario: {} | Base seed: {}", cli.runs, cli.seed);
    println!("  {:<28} {:>5} {:>14} {:>14} {:>9} {:>7} {:>7}",
        "Scenario", "Pass%", "Substrate", "Analogue", "Gap", "Perturb", "Time");
    println!("  {}", "-".repeat(90));

    let suite_start = Instant::now();
    let mut mc_reports = Vec::new();

    for scenario in &to_run {
        let report = monte_carlo::run_monte_carlo(
            scenario,
            cli.runs,
            cli.seed,
            cli.ticks,
            ts_dir.as_deref(),
        )?;

        let status = if report.pass_rate >= PASS_THRESHOLD { "PASS" } else { "FAIL" };
        println!("  {:<28} {:>4}% {:>7.3}±{:<6.3} {:>7.3}±{:<6.3} {:>+9.3} {:>7.1} {:>5.0}ms  {}",
            report.label,
            (report.pass_rate * 100.0) as u32,
            report.mean_integration_substrate.mean, report.mean_integration_substrate.margin(),
            report.mean_integration_analogue.mean, report.mean_integration_analogue.margin(),
            report.mean_integration_gap.mean,
            report.perturbations_fired.mean,
            report.elapsed_ms.mean,
            status,
        );

        mc_reports.push(report);
    }

    let suite_elapsed = suite_start.elapsed();

    // ─── Summary ────────────────────────────────────────────────────────

    let summary = Summary::from_reports(&mc_reports, PASS_THRESHOLD);
    println!("  {}", "-".repeat(90));
    println!("  Total: {}  Passed: {}  Failed: {}  Suite time: {:.1}s\n",
        summary.total, summary.passed, summary.failed, suite_elapsed.as_secs_f64());

    for report in mc_reports.iter().filter(|r| r.pass_rate < PASS_THRESHOLD) {
        for run in report.individual_runs.iter().filter(|r| !r.pass) {
            error!(scenario = %report.scenario_name, seed = run.seed, failures = ?run.failures, "run failed");
        }
    }

    // ─── Write JSON Report ──────────────────────────────────────────────

    let timestamp = SystemTime::now().duration_since(UNIX_EPOCH)?.as_millis().to_string();
    let failed = summary.failed;

    let report = BenchReport {
        timestamp: timestamp.clone(),
        version: env!("CARGO_PKG_VERSION"),
        prng: "ChaCha8Rng",
        n_runs_per_scenario: cli.runs,
        base_seed: cli.seed,
        ticks_override: cli.ticks,
        summary,
        scenarios: mc_reports,
    };

    std::fs::create_dir_all(&cli.out_dir)?;
    let path = cli.out_dir.join(format!("bench-{}.json", timestamp));
    std::fs::write(&path, serde_json::to_string_pretty(&report)?)?;
    info!(path = %path.display(), "results saved");

    if failed > 0 {
        std::process::exit(1);
    }
    Ok(())
}
