// Per-Tick Metric Trackers: invariant audit and run-level integration means
// Every tick of every run is checked against the engine's hard bounds

use oct_engine::state::HISTORY_CAPACITY;
use oct_engine::*;
use serde::Serialize;

// ─── Invariant Audit ────────────────────────────────────────────────────────

/// Ticks on which each bound was broken at least once.
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct ViolationCounts {
    pub matrix_cells: u32,
    pub edge_weights: u32,
    pub activations: u32,
    pub integration: u32,
    pub history: u32,
}

impl ViolationCounts {
    pub fn total(&self) -> u32 {
        self.matrix_cells + self.edge_weights + self.activations + self.integration + self.history
    }
}

/// Checks both systems after each tick or perturbation.
pub struct InvariantTracker {
    pub counts: ViolationCounts,
    pub checks: u64,
}

impl InvariantTracker {
    pub fn new() -> Self {
        Self { counts: ViolationCounts::default(), checks: 0 }
    }

    pub fn record(&mut self, bed: &Testbed) {
        self.checks += 1;
        for variant in Variant::ALL {
            let state = bed.system(variant);
            let c = &mut self.counts;

            if !state.matrix().cells().iter().all(|v| (0.0..=1.0).contains(v)) {
                c.matrix_cells += 1;
            }
            let weights_ok = state
                .graph()
                .edges()
                .iter()
                .all(|e| (MIN_EDGE_WEIGHT..=MAX_EDGE_WEIGHT).contains(&e.weight));
            if !weights_ok {
                c.edge_weights += 1;
            }
            if !state.graph().nodes().iter().all(|n| (0.0..=1.0).contains(&n.activation)) {
                c.activations += 1;
            }
            if !(0.0..=1.0).contains(&state.integration_estimate()) {
                c.integration += 1;
            }
            if state.dpci_history().len() > HISTORY_CAPACITY
                || state.integration_history().len() > HISTORY_CAPACITY
            {
                c.history += 1;
            }
        }
    }

    pub fn holds(&self) -> bool {
        self.counts.total() == 0
    }
}

// ─── Run Accumulator ────────────────────────────────────────────────────────

/// Running sums of the per-tick readings of one run.
#[derive(Debug, Default)]
pub struct RunAccumulator {
    pub ticks: u64,
    integration_sum: [f64; 2],
    dpci_sum: [f64; 2],
    gap_sum: f64,
    pub peak_integration: f64,
    pub max_dispersion: f64,
    pub longest_high_streak: u64,
}

impl RunAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, result: &TickResult) {
        self.ticks += 1;
        for (i, snap) in [&result.substrate, &result.analogue].into_iter().enumerate() {
            self.integration_sum[i] += snap.integration_estimate;
            self.dpci_sum[i] += snap.metrics.dpci_score;
            self.peak_integration = self.peak_integration.max(snap.integration_estimate);
            self.max_dispersion = self.max_dispersion.max(snap.metrics.dispersion_score);
        }
        self.gap_sum += result.substrate.integration_estimate - result.analogue.integration_estimate;
        self.longest_high_streak = self.longest_high_streak.max(result.indicators.sustained_high_ticks);
    }

    fn mean(&self, sum: f64) -> f64 {
        if self.ticks == 0 { 0.0 } else { sum / self.ticks as f64 }
    }

    pub fn mean_integration(&self, variant: Variant) -> f64 {
        self.mean(self.integration_sum[variant as usize])
    }

    pub fn mean_dpci(&self, variant: Variant) -> f64 {
        self.mean(self.dpci_sum[variant as usize])
    }

    pub fn mean_gap(&self) -> f64 {
        self.mean(self.gap_sum)
    }
}
