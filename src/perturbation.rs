// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Open Consciousness Testbed ("The Twin Engine") - Perturbations

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

use crate::random::RandomSource;
use crate::state::SimulationState;
use crate::types::{MAX_EDGE_WEIGHT, MIN_EDGE_WEIGHT};

/// Amplitude of the adversarial matrix noise.
pub const ADVERSARIAL_AMPLITUDE: f64 = 0.8;
pub const POISON_HITS: usize = 10;
pub const POISON_FACTOR: f64 = 0.1;
pub const BOMBARD_HITS: usize = 5;

/// Operator-triggered mutation of a running system.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Perturbation {
    Adversarial,
    Poisoning,
    Bombardment,
    Reset,
}

impl Perturbation {
    pub const ALL: [Perturbation; 4] = [
        Perturbation::Adversarial,
        Perturbation::Poisoning,
        Perturbation::Bombardment,
        Perturbation::Reset,
    ];

    pub fn apply(self, state: &mut SimulationState, rng: &mut dyn RandomSource) {
        debug!(variant = %state.variant, perturbation = %self, "applying perturbation");
        match self {
            Self::Adversarial => adversarial(state, rng),
            Self::Poisoning => poisoning(state, rng),
            Self::Bombardment => bombardment(state, rng),
            Self::Reset => state.reset(rng),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Adversarial => "adversarial",
            Self::Poisoning => "poisoning",
            Self::Bombardment => "bombardment",
            Self::Reset => "reset",
        }
    }
}

impl fmt::Display for Perturbation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown perturbation: {0}")]
pub struct UnknownPerturbation(pub String);

impl FromStr for Perturbation {
    type Err = UnknownPerturbation;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownPerturbation(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Mutators
// ---------------------------------------------------------------------------

/// Broad high-amplitude noise over every matrix cell.
pub fn adversarial(state: &mut SimulationState, rng: &mut dyn RandomSource) {
    state.matrix.jitter(ADVERSARIAL_AMPLITUDE, rng);
}

/// Cut the weight of up to [`POISON_HITS`] random edges (with replacement)
/// to a tenth, respecting the weight floor.
pub fn poisoning(state: &mut SimulationState, rng: &mut dyn RandomSource) {
    let edges = &mut state.graph.edges;
    if edges.is_empty() {
        return;
    }
    for _ in 0..POISON_HITS.min(edges.len()) {
        let i = rng.index(edges.len());
        let edge = &mut edges[i];
        edge.weight = (edge.weight * POISON_FACTOR).clamp(MIN_EDGE_WEIGHT, MAX_EDGE_WEIGHT);
    }
}

/// Saturate up to [`BOMBARD_HITS`] random nodes (with replacement).
pub fn bombardment(state: &mut SimulationState, rng: &mut dyn RandomSource) {
    let nodes = &mut state.graph.nodes;
    if nodes.is_empty() {
        return;
    }
    for _ in 0..BOMBARD_HITS.min(nodes.len()) {
        let i = rng.index(nodes.len());
        nodes[i].activation = 1.0;
    }
}
