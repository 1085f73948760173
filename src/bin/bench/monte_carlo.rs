// Monte Carlo Infrastructure: N runs per scenario with statistical aggregation
// Each scenario runs N times with seeds base..base+N, computing mean ± 95% CI

use oct_engine::random::mix_seed;
use oct_engine::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, warn};

use crate::chaos::ChaosGenerator;
use crate::metrics::{InvariantTracker, RunAccumulator};
use crate::report::*;
use crate::scenarios::Scenario;
use crate::time_series::TimeSeriesRecorder;

use std::time::Instant;

/// Run a single scenario iteration with a specific seed.
pub fn run_single(
    scenario: &Scenario,
    seed: u64,
    ticks: u64,
    time_series_dir: Option<&std::path::Path>,
) -> Result<BenchResult, ValidationError> {
    let start = Instant::now();

    let mut config = TestbedConfig::default();
    for entry in [&mut config.substrate, &mut config.analogue] {
        entry.node_count = scenario.node_count;
        entry.matrix_size = scenario.matrix_size;
    }
    let mut bed = Testbed::from_config(&config, Bounds::default(), seed)?;

    // Third stream, independent of both systems.
    let mut chaos = ChaosGenerator::new(ChaCha8Rng::seed_from_u64(mix_seed(mix_seed(seed))));
    let mut audit = InvariantTracker::new();
    let mut acc = RunAccumulator::new();
    let mut time_series = time_series_dir.map(|_| TimeSeriesRecorder::new());
    let mut scheduled: u32 = 0;

    for tick in 0..ticks {
        let mut fired: Vec<(Variant, Perturbation)> = match scenario.schedule {
            Some(schedule) => schedule(tick).to_vec(),
            None => Vec::new(),
        };
        scheduled += fired.len() as u32;
        fired.extend(chaos.generate_tick(scenario.chaos_rate));

        for &(variant, perturbation) in &fired {
            bed.perturb(variant, perturbation);
        }
        if !fired.is_empty() {
            audit.record(&bed);
        }

        let result = bed.tick_core();
        audit.record(&bed);
        acc.record(&result);

        if let Some(ref mut ts) = time_series {
            ts.record(&result, &fired);
        }
    }

    // Write time series if enabled
    if let (Some(ts), Some(dir)) = (&time_series, time_series_dir) {
        let path = dir.join(format!("seed-{}.jsonl", seed));
        match ts.write_jsonl(&path) {
            Ok(()) => debug!(path = %path.display(), ticks = ts.ticks_recorded(), "time series written"),
            Err(e) => warn!(path = %path.display(), error = %e, "failed to write time series"),
        }
    }

    let elapsed = start.elapsed();
    let elapsed_ms = elapsed.as_millis();
    let elapsed_secs = elapsed.as_secs_f64().max(0.001);

    // Evaluate pass/fail
    let mut failures = Vec::new();
    if !audit.holds() {
        failures.push(format!("invariants broken: {:?}", audit.counts));
    }
    let mean_dpci = acc.mean_dpci(Variant::Substrate).max(acc.mean_dpci(Variant::Analogue));
    if let Some(max) = scenario.criteria.max_mean_dpci {
        if mean_dpci > max {
            failures.push(format!("mean dPCI {:.4} above {:.4}", mean_dpci, max));
        }
    }
    if let Some(max) = scenario.criteria.max_dispersion {
        if acc.max_dispersion > max {
            failures.push(format!("dispersion {:.4} above {:.4}", acc.max_dispersion, max));
        }
    }
    if let Some((lo, hi)) = scenario.criteria.gap_range {
        let gap = acc.mean_gap();
        if !(lo..=hi).contains(&gap) {
            failures.push(format!("integration gap {:.4} outside [{}, {}]", gap, lo, hi));
        }
    }

    let pass = failures.is_empty();
    debug!(scenario = scenario.name, seed, pass, elapsed_ms = elapsed_ms as u64, "run finished");

    Ok(BenchResult {
        scenario: scenario.label.to_string(),
        name: scenario.name.to_string(),
        category: scenario.category.to_string(),
        seed,
        pass,
        failures,
        ticks,
        elapsed_ms,
        throughput_per_sec: ticks as f64 / elapsed_secs,
        violations: audit.counts,
        audit_checks: audit.checks,
        mean_integration_substrate: acc.mean_integration(Variant::Substrate),
        mean_integration_analogue: acc.mean_integration(Variant::Analogue),
        mean_dpci_substrate: acc.mean_dpci(Variant::Substrate),
        mean_dpci_analogue: acc.mean_dpci(Variant::Analogue),
        mean_integration_gap: acc.mean_gap(),
        peak_integration: acc.peak_integration,
        max_dispersion: acc.max_dispersion,
        final_self_quality: bed.indicators().self_quality,
        longest_high_streak: acc.longest_high_streak,
        perturbations_fired: scheduled + chaos.fired_count,
        chaos_kinds: chaos.kind_counts,
    })
}

/// Run Monte Carlo: N runs of a scenario, aggregate stats.
pub fn run_monte_carlo(
    scenario: &Scenario,
    n_runs: usize,
    base_seed: u64,
    ticks: Option<u64>,
    time_series_base: Option<&std::path::Path>,
) -> Result<MonteCarloReport, ValidationError> {
    let ts_dir = time_series_base.map(|base| base.join(scenario.name.to_lowercase()));
    let ticks = ticks.unwrap_or(scenario.ticks);

    let mut results = Vec::with_capacity(n_runs);
    for i in 0..n_runs {
        let seed = base_seed.wrapping_add(i as u64);
        results.push(run_single(scenario, seed, ticks, ts_dir.as_deref())?);
    }

    Ok(aggregate(scenario, results))
}

fn stats_of(results: &[BenchResult], field: impl Fn(&BenchResult) -> f64) -> Stats {
    Stats::from_samples(&results.iter().map(field).collect::<Vec<_>>())
}

/// Aggregate individual runs into a MonteCarloReport.
fn aggregate(scenario: &Scenario, results: Vec<BenchResult>) -> MonteCarloReport {
    let n = results.len();
    let passed = results.iter().filter(|r| r.pass).count();
    let pass_rate = if n > 0 { passed as f64 / n as f64 } else { 0.0 };

    MonteCarloReport {
        scenario_name: scenario.name.to_string(),
        label: scenario.label.to_string(),
        category: scenario.category.to_string(),
        n_runs: n,
        pass_rate,
        mean_integration_substrate: stats_of(&results, |r| r.mean_integration_substrate),
        mean_integration_analogue: stats_of(&results, |r| r.mean_integration_analogue),
        mean_dpci_substrate: stats_of(&results, |r| r.mean_dpci_substrate),
        mean_dpci_analogue: stats_of(&results, |r| r.mean_dpci_analogue),
        mean_integration_gap: stats_of(&results, |r| r.mean_integration_gap),
        peak_integration: stats_of(&results, |r| r.peak_integration),
        perturbations_fired: stats_of(&results, |r| r.perturbations_fired as f64),
        elapsed_ms: stats_of(&results, |r| r.elapsed_ms as f64),
        throughput_per_sec: stats_of(&results, |r| r.throughput_per_sec),
        individual_runs: results,
    }
}
