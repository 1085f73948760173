// Scenario Definitions: steady state, scheduled perturbations, edge-case shapes
// Zero engine changes: all scenario logic lives in schedule functions and criteria

use oct_engine::{Perturbation, Variant, DEFAULT_MATRIX_SIZE, DEFAULT_NODE_COUNT};

type Fired = &'static [(Variant, Perturbation)];

// ─── Scenario Configuration ─────────────────────────────────────────────────

pub struct Scenario {
    pub name: &'static str,
    pub label: &'static str,
    pub category: &'static str,
    pub node_count: u32,
    pub matrix_size: u32,
    pub ticks: u64,
    /// Perturbations applied before the tick with the given 0-based index.
    pub schedule: Option<fn(u64) -> Fired>,
    /// Expected random perturbations per tick, see `ChaosGenerator`.
    pub chaos_rate: f64,
    pub criteria: PassCriteria,
}

/// Invariants are always audited. These add scenario-specific checks on the
/// run-level readings.
#[derive(Default)]
pub struct PassCriteria {
    pub max_mean_dpci: Option<f64>,
    pub max_dispersion: Option<f64>,
    pub gap_range: Option<(f64, f64)>,
}

// ─── Schedules ──────────────────────────────────────────────────────────────

fn adversarial_storm(tick: u64) -> Fired {
    if tick % 10 == 0 {
        &[(Variant::Substrate, Perturbation::Adversarial)]
    } else {
        &[]
    }
}

fn poisoned_network(tick: u64) -> Fired {
    if tick % 25 == 0 {
        &[(Variant::Substrate, Perturbation::Poisoning), (Variant::Analogue, Perturbation::Poisoning)]
    } else {
        &[]
    }
}

fn bombardment_barrage(tick: u64) -> Fired {
    if tick % 5 == 0 {
        &[(Variant::Analogue, Perturbation::Bombardment)]
    } else {
        &[]
    }
}

fn reset_cycle(tick: u64) -> Fired {
    if tick > 0 && tick % 100 == 0 {
        &[(Variant::Substrate, Perturbation::Reset), (Variant::Analogue, Perturbation::Reset)]
    } else {
        &[]
    }
}

// ─── Scenario Definitions ───────────────────────────────────────────────────

pub fn scenarios() -> Vec<Scenario> {
    vec![
        // ─── Steady State ───────────────────────────────────────────────
        Scenario { name: "BASELINE", label: "Baseline", category: "steady",
            node_count: DEFAULT_NODE_COUNT, matrix_size: DEFAULT_MATRIX_SIZE, ticks: 500,
            schedule: None, chaos_rate: 0.0,
            criteria: PassCriteria { gap_range: Some((-1.0, 1.0)), ..Default::default() } },
        Scenario { name: "LARGE_NETWORK", label: "Large Network", category: "steady",
            node_count: 200, matrix_size: 48, ticks: 200,
            schedule: None, chaos_rate: 0.0,
            criteria: PassCriteria::default() },

        // ─── Perturbations ──────────────────────────────────────────────
        Scenario { name: "ADVERSARIAL_STORM", label: "Adversarial Storm", category: "perturbation",
            node_count: DEFAULT_NODE_COUNT, matrix_size: DEFAULT_MATRIX_SIZE, ticks: 400,
            schedule: Some(adversarial_storm), chaos_rate: 0.0,
            criteria: PassCriteria::default() },
        Scenario { name: "POISONED_NETWORK", label: "Poisoned Network", category: "perturbation",
            node_count: DEFAULT_NODE_COUNT, matrix_size: DEFAULT_MATRIX_SIZE, ticks: 400,
            schedule: Some(poisoned_network), chaos_rate: 0.0,
            criteria: PassCriteria::default() },
        Scenario { name: "BOMBARDMENT_BARRAGE", label: "Bombardment Barrage", category: "perturbation",
            node_count: DEFAULT_NODE_COUNT, matrix_size: DEFAULT_MATRIX_SIZE, ticks: 400,
            schedule: Some(bombardment_barrage), chaos_rate: 0.0,
            criteria: PassCriteria::default() },
        Scenario { name: "RESET_CYCLE", label: "Reset Cycle", category: "perturbation",
            node_count: DEFAULT_NODE_COUNT, matrix_size: DEFAULT_MATRIX_SIZE, ticks: 450,
            schedule: Some(reset_cycle), chaos_rate: 0.0,
            criteria: PassCriteria::default() },
        Scenario { name: "OPERATOR_CHAOS", label: "Operator Chaos", category: "perturbation",
            node_count: DEFAULT_NODE_COUNT, matrix_size: DEFAULT_MATRIX_SIZE, ticks: 500,
            schedule: None, chaos_rate: 0.3,
            criteria: PassCriteria::default() },

        // ─── Edge Cases ─────────────────────────────────────────────────
        Scenario { name: "SPARSE_NETWORK", label: "Sparse Network (0 nodes)", category: "edge",
            node_count: 0, matrix_size: DEFAULT_MATRIX_SIZE, ticks: 200,
            schedule: Some(bombardment_barrage), chaos_rate: 0.0,
            criteria: PassCriteria { max_mean_dpci: Some(0.0), ..Default::default() } },
        Scenario { name: "SINGLE_CELL_MATRIX", label: "Single Cell Matrix", category: "edge",
            node_count: DEFAULT_NODE_COUNT, matrix_size: 1, ticks: 200,
            schedule: Some(adversarial_storm), chaos_rate: 0.0,
            criteria: PassCriteria { max_dispersion: Some(0.0), ..Default::default() } },
    ]
}
