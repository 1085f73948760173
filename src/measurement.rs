// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Open Consciousness Testbed ("The Twin Engine") - Measurement

use crate::graph::NetworkGraph;
use crate::matrix::InteractionMatrix;
use crate::random::RandomSource;
use crate::state::SimulationState;
use crate::types::{Metrics, NetworkActivity};

/// Activation boost applied to the zapped node.
pub const ZAP_STRENGTH: f64 = 0.8;
/// Propagation steps in one cascade.
pub const CASCADE_STEPS: usize = 15;
/// Fraction of a source's activation passed along an edge per step.
const EDGE_TRANSFER: f64 = 0.05;
/// Per-step retention after propagation.
const CASCADE_RETENTION: f64 = 0.9;
const DPCI_SCALE: f64 = 2.0;

const W_DISPERSION: f64 = 0.2;
const W_NETWORK: f64 = 0.3;
const W_DPCI: f64 = 0.5;

// ---------------------------------------------------------------------------
// Full measurement
// ---------------------------------------------------------------------------

/// Compute all four metrics for a system.
///
/// Only the cascade consumes randomness; the state itself is not touched.
pub fn measure(state: &SimulationState, rng: &mut dyn RandomSource) -> Metrics {
    let dispersion = dispersion_score(&state.matrix);
    let activity = network_activity(&state.graph);
    let dpci = dpci_score(&state.graph, rng);
    Metrics {
        dispersion_score: dispersion,
        network_activity: activity,
        dpci_score: dpci,
        integration_estimate: integration_estimate(dispersion, activity, dpci),
    }
}

// ---------------------------------------------------------------------------
// Individual metrics
// ---------------------------------------------------------------------------

/// Population standard deviation of every matrix cell.
pub fn dispersion_score(matrix: &InteractionMatrix) -> f64 {
    std_dev(matrix.cells())
}

/// Mean node activation and mean edge weight (each 0 when empty).
pub fn network_activity(graph: &NetworkGraph) -> NetworkActivity {
    NetworkActivity {
        avg_activation: mean(graph.nodes().iter().map(|n| n.activation)),
        avg_weight: mean(graph.edges().iter().map(|e| e.weight)),
    }
}

/// Perturbation-complexity score.
///
/// Boosts one random node of a copy of the activation vector by
/// [`ZAP_STRENGTH`], lets it spread along the edges for [`CASCADE_STEPS`]
/// steps, and returns twice the mean spread (standard deviation) observed.
pub fn dpci_score(graph: &NetworkGraph, rng: &mut dyn RandomSource) -> f64 {
    let mut current = graph.activations();
    if current.is_empty() {
        return 0.0;
    }

    let zapped = rng.index(current.len());
    current[zapped] = (current[zapped] + ZAP_STRENGTH).min(1.0);

    let mut total = 0.0;
    for _ in 0..CASCADE_STEPS {
        total += std_dev(&current);
        let mut next = current.clone();
        for edge in graph.edges() {
            next[edge.target as usize] += current[edge.source as usize] * edge.weight * EDGE_TRANSFER;
        }
        for a in &mut next {
            *a = (*a * CASCADE_RETENTION).clamp(0.0, 1.0);
        }
        current = next;
    }

    total / CASCADE_STEPS as f64 * DPCI_SCALE
}

/// Weighted composite of the three readings, clamped to `[0, 1]`.
pub fn integration_estimate(dispersion: f64, activity: NetworkActivity, dpci: f64) -> f64 {
    let network = (activity.avg_activation + activity.avg_weight) / 2.0;
    let raw = W_DISPERSION * dispersion + W_NETWORK * network + W_DPCI * dpci;
    if raw.is_nan() {
        return 0.0;
    }
    raw.clamp(0.0, 1.0)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, n) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    if n == 0 {
        0.0
    } else {
        sum / n as f64
    }
}

/// Population standard deviation; 0 for an empty slice.
pub fn std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    // The mean of a constant slice can miss it by an ulp.
    if values.iter().all(|&v| v == values[0]) {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;
    variance.sqrt()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
