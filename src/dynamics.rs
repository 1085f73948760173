// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Open Consciousness Testbed ("The Twin Engine") - Tick Dynamics

use crate::random::{noise, RandomSource};
use crate::state::SimulationState;
use crate::types::{MAX_EDGE_WEIGHT, MIN_EDGE_WEIGHT};

const VELOCITY_DAMPING: f64 = 0.95;
const NOISE_TIME_SCALE: f64 = 0.01;
/// Offset between the x and y noise channels of a node.
const NOISE_Y_OFFSET: f64 = 100.0;

/// Advance one system by a single tick.
///
/// Order per tick: matrix random walk, then one pass over nodes (activation
/// decay followed by kinetics), then edge weight decay. The draw order is
/// fixed so a seeded source reproduces a run exactly.
pub fn advance(state: &mut SimulationState, tick: u64, rng: &mut dyn RandomSource) {
    let cfg = state.config;

    state.matrix.jitter(cfg.volatility, rng);

    let bounds = state.graph.bounds;
    let t = tick as f64 * NOISE_TIME_SCALE;
    for node in &mut state.graph.nodes {
        node.activation = decay(node.activation, cfg.activation_decay, rng).clamp(0.0, 1.0);

        let phase = t + node.id as f64;
        node.vx += (noise(phase) - 0.5) * cfg.node_speed;
        node.vy += (noise(phase + NOISE_Y_OFFSET) - 0.5) * cfg.node_speed;
        node.vx *= VELOCITY_DAMPING;
        node.vy *= VELOCITY_DAMPING;
        node.x += node.vx;
        node.y += node.vy;

        if node.x < 0.0 || node.x > bounds.width {
            node.vx = -node.vx;
        }
        if node.y < 0.0 || node.y > bounds.height {
            node.vy = -node.vy;
        }
        node.x = node.x.clamp(0.0, bounds.width);
        node.y = node.y.clamp(0.0, bounds.height);
    }

    for edge in &mut state.graph.edges {
        edge.weight = decay(edge.weight, cfg.weight_decay, rng).clamp(MIN_EDGE_WEIGHT, MAX_EDGE_WEIGHT);
    }
}

/// Multiplicative decay whose factor jitters uniformly over
/// `[rate, rate + 2 * (1 - rate))`, so a value can occasionally grow.
fn decay(value: f64, rate: f64, rng: &mut dyn RandomSource) -> f64 {
    value * (rate + rng.uniform() * (1.0 - rate) * 2.0)
}
