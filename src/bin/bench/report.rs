// Benchmark Report Types
// Structured output for offline comparison of the two systems

use serde::Serialize;

use crate::metrics::ViolationCounts;

// ─── Statistics (per-metric Monte Carlo aggregation) ────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct Stats {
    pub mean: f64,
    pub std_dev: f64,
    pub ci_lower: f64,
    pub ci_upper: f64,
    pub min: f64,
    pub max: f64,
    pub n: usize,
}

impl Stats {
    pub fn from_samples(samples: &[f64]) -> Self {
        let n = samples.len();
        if n == 0 {
            return Self { mean: 0.0, std_dev: 0.0, ci_lower: 0.0, ci_upper: 0.0, min: 0.0, max: 0.0, n: 0 };
        }
        let mean = samples.iter().sum::<f64>() / n as f64;
        let variance = if n > 1 {
            samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64
        } else {
            0.0
        };
        let std_dev = variance.sqrt();
        let stderr = std_dev / (n as f64).sqrt();
        let z = 1.96; // 95% CI
        Self {
            mean,
            std_dev,
            ci_lower: mean - z * stderr,
            ci_upper: mean + z * stderr,
            min: samples.iter().cloned().fold(f64::INFINITY, f64::min),
            max: samples.iter().cloned().fold(f64::NEG_INFINITY, f64::max),
            n,
        }
    }

    /// Half-width of the confidence interval.
    pub fn margin(&self) -> f64 {
        (self.ci_upper - self.ci_lower) / 2.0
    }
}

// ─── Single-Run Result ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct BenchResult {
    pub scenario: String,
    pub name: String,
    pub category: String,
    pub seed: u64,
    pub pass: bool,
    pub failures: Vec<String>,
    pub ticks: u64,
    pub elapsed_ms: u128,
    pub throughput_per_sec: f64,
    pub violations: ViolationCounts,
    /// Invariant audits performed over the run.
    pub audit_checks: u64,
    pub mean_integration_substrate: f64,
    pub mean_integration_analogue: f64,
    pub mean_dpci_substrate: f64,
    pub mean_dpci_analogue: f64,
    /// Mean of substrate minus analogue integration over the run.
    pub mean_integration_gap: f64,
    pub peak_integration: f64,
    pub max_dispersion: f64,
    pub final_self_quality: f64,
    pub longest_high_streak: u64,
    pub perturbations_fired: u32,
    /// Chaos perturbations per kind: adversarial, poisoning, bombardment.
    pub chaos_kinds: [u32; 3],
}

// ─── Monte Carlo Report (per-scenario aggregation) ──────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct MonteCarloReport {
    pub scenario_name: String,
    pub label: String,
    pub category: String,
    pub n_runs: usize,
    pub pass_rate: f64,
    pub mean_integration_substrate: Stats,
    pub mean_integration_analogue: Stats,
    pub mean_dpci_substrate: Stats,
    pub mean_dpci_analogue: Stats,
    pub mean_integration_gap: Stats,
    pub peak_integration: Stats,
    pub perturbations_fired: Stats,
    pub elapsed_ms: Stats,
    pub throughput_per_sec: Stats,
    pub individual_runs: Vec<BenchResult>,
}

// ─── Top-Level Report ───────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct BenchReport {
    pub timestamp: String,
    pub version: &'static str,
    pub prng: &'static str,
    pub n_runs_per_scenario: usize,
    pub base_seed: u64,
    pub ticks_override: Option<u64>,
    pub summary: Summary,
    pub scenarios: Vec<MonteCarloReport>,
}

#[derive(Debug, Serialize)]
pub struct Summary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub pass_rate: f64,
}

impl Summary {
    pub fn from_reports(reports: &[MonteCarloReport], threshold: f64) -> Self {
        let total = reports.len();
        let passed = reports.iter().filter(|r| r.pass_rate >= threshold).count();
        Self {
            total,
            passed,
            failed: total - passed,
            pass_rate: if total > 0 { passed as f64 / total as f64 } else { 0.0 },
        }
    }
}
