// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Open Consciousness Testbed ("The Twin Engine") - Simulation State

use serde::Serialize;
use std::collections::VecDeque;
use tracing::info;

use crate::error::ConfigError;
use crate::graph::NetworkGraph;
use crate::matrix::InteractionMatrix;
use crate::random::RandomSource;
use crate::types::{Bounds, DynamicsConfig, Metrics, Variant, MAX_NODE_COUNT};

/// Maximum length of the dPCI and integration histories.
pub const HISTORY_CAPACITY: usize = 300;

// ---------------------------------------------------------------------------
// BoundedHistory - FIFO window of recent readings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BoundedHistory {
    values: VecDeque<f64>,
    capacity: usize,
}

impl Default for BoundedHistory {
    fn default() -> Self {
        Self::new(HISTORY_CAPACITY)
    }
}

impl BoundedHistory {
    pub fn new(capacity: usize) -> Self {
        Self { values: VecDeque::with_capacity(capacity), capacity }
    }

    /// Append a value, dropping the oldest once over capacity.
    pub fn push(&mut self, value: f64) {
        self.values.push_back(value);
        while self.values.len() > self.capacity {
            self.values.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn latest(&self) -> Option<f64> {
        self.values.back().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.values.iter().copied()
    }

    pub fn to_vec(&self) -> Vec<f64> {
        self.values.iter().copied().collect()
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }
}

// ---------------------------------------------------------------------------
// SimulationState
// ---------------------------------------------------------------------------

/// Everything one system (Substrate or Analogue) evolves and remembers.
#[derive(Debug, Clone, Serialize)]
pub struct SimulationState {
    pub(crate) variant: Variant,
    pub(crate) graph: NetworkGraph,
    pub(crate) matrix: InteractionMatrix,
    pub(crate) config: DynamicsConfig,
    pub(crate) dpci_history: BoundedHistory,
    pub(crate) integration_history: BoundedHistory,
    pub(crate) integration_estimate: f64,
    pub(crate) last_metrics: Metrics,
    node_count: u32,
}

impl SimulationState {
    pub fn new(
        variant: Variant,
        node_count: u32,
        matrix_size: u32,
        config: DynamicsConfig,
        bounds: Bounds,
        rng: &mut dyn RandomSource,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        bounds.validate()?;
        if node_count > MAX_NODE_COUNT {
            return Err(ConfigError::TooManyNodes { count: node_count, max: MAX_NODE_COUNT });
        }
        let graph = NetworkGraph::random(node_count, bounds, rng);
        let matrix = InteractionMatrix::random(matrix_size as usize, rng)?;
        info!(%variant, node_count, matrix_size, edges = graph.edges.len(), "system initialised");
        Ok(Self::assemble(variant, graph, matrix, config))
    }

    /// State around an explicit graph and matrix.
    pub fn from_parts(
        variant: Variant,
        graph: NetworkGraph,
        matrix: InteractionMatrix,
        config: DynamicsConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::assemble(variant, graph, matrix, config))
    }

    fn assemble(
        variant: Variant,
        graph: NetworkGraph,
        matrix: InteractionMatrix,
        config: DynamicsConfig,
    ) -> Self {
        Self {
            variant,
            node_count: graph.nodes.len() as u32,
            graph,
            matrix,
            config,
            dpci_history: BoundedHistory::default(),
            integration_history: BoundedHistory::default(),
            integration_estimate: 0.0,
            last_metrics: Metrics::default(),
        }
    }

    /// Fresh graph and matrix of the same dimensions; histories and the
    /// integration estimate are cleared, `config` is kept.
    pub fn reset(&mut self, rng: &mut dyn RandomSource) {
        self.graph = NetworkGraph::random(self.node_count, self.graph.bounds, rng);
        self.matrix.randomize(rng);
        self.dpci_history.clear();
        self.integration_history.clear();
        self.integration_estimate = 0.0;
        self.last_metrics = Metrics::default();
        info!(variant = %self.variant, "system reset");
    }

    /// Store a fresh measurement and extend both histories.
    pub fn record(&mut self, metrics: Metrics) {
        self.dpci_history.push(metrics.dpci_score);
        self.integration_history.push(metrics.integration_estimate);
        self.integration_estimate = metrics.integration_estimate;
        self.last_metrics = metrics;
    }

    pub fn set_config(&mut self, config: DynamicsConfig) -> Result<(), ConfigError> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    pub fn resize(&mut self, bounds: Bounds) -> Result<(), ConfigError> {
        self.graph.resize(bounds)
    }

    // ─── Read-only snapshots ─────────────────────────────────────────────────

    pub fn variant(&self) -> Variant {
        self.variant
    }

    pub fn graph(&self) -> &NetworkGraph {
        &self.graph
    }

    pub fn matrix(&self) -> &InteractionMatrix {
        &self.matrix
    }

    pub fn config(&self) -> &DynamicsConfig {
        &self.config
    }

    pub fn metrics(&self) -> &Metrics {
        &self.last_metrics
    }

    pub fn integration_estimate(&self) -> f64 {
        self.integration_estimate
    }

    pub fn dpci_history(&self) -> &BoundedHistory {
        &self.dpci_history
    }

    pub fn integration_history(&self) -> &BoundedHistory {
        &self.integration_history
    }

    pub fn node_count(&self) -> u32 {
        self.node_count
    }

    pub fn matrix_size(&self) -> u32 {
        self.matrix.size() as u32
    }
}
