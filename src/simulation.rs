// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Open Consciousness Testbed ("The Twin Engine") - Orchestrator

use tracing::{debug, info, trace};
use wasm_bindgen::prelude::*;

use crate::config::{SystemConfig, TestbedConfig};
use crate::dynamics;
use crate::error::{ConfigError, ValidationError};
use crate::indicators::EthicalIndicators;
use crate::measurement;
use crate::narrative::NarrativeInput;
use crate::perturbation::Perturbation;
use crate::random::{mix_seed, SeededSource};
use crate::state::SimulationState;
use crate::types::*;

// ─── System slot ─────────────────────────────────────────────────────────────

/// One simulated system together with the randomness it alone consumes.
#[derive(Debug, Clone)]
pub(crate) struct System {
    pub(crate) state: SimulationState,
    pub(crate) rng: SeededSource,
}

impl System {
    fn build(entry: &SystemConfig, bounds: Bounds, seed: u64) -> Result<Self, ConfigError> {
        let mut rng = SeededSource::new(seed);
        let state = SimulationState::new(
            entry.variant,
            entry.node_count,
            entry.matrix_size,
            entry.config,
            bounds,
            &mut rng,
        )?;
        Ok(Self { state, rng })
    }

    fn step(&mut self, tick: u64) -> SystemSnapshot {
        dynamics::advance(&mut self.state, tick, &mut self.rng);
        let metrics = measurement::measure(&self.state, &mut self.rng);
        self.state.record(metrics);
        SystemSnapshot {
            variant: self.state.variant,
            metrics,
            integration_estimate: self.state.integration_estimate,
        }
    }

    fn entry(&self) -> SystemConfig {
        SystemConfig {
            variant: self.state.variant,
            config: self.state.config,
            node_count: self.state.node_count(),
            matrix_size: self.state.matrix_size(),
        }
    }
}

// ─── Testbed struct ──────────────────────────────────────────────────────────

/// Runs the Substrate and Analogue systems side by side.
#[wasm_bindgen]
pub struct Testbed {
    pub(crate) substrate: System,
    pub(crate) analogue: System,
    pub(crate) current_tick: u64,
    pub(crate) indicators: EthicalIndicators,
    pub(crate) bounds: Bounds,
    pub(crate) seed: u64,
}

// ─── Internal Logic (Testable, pure Rust) ────────────────────────────────────

impl Testbed {
    /// Default systems (35 nodes, 24x24 matrix, per-variant regimes) on the
    /// default bounds.
    pub fn with_seed(seed: u64) -> Result<Self, ValidationError> {
        Self::from_config(&TestbedConfig::default(), Bounds::default(), seed)
    }

    pub fn from_config(
        config: &TestbedConfig,
        bounds: Bounds,
        seed: u64,
    ) -> Result<Self, ValidationError> {
        config.validate()?;
        bounds.validate()?;
        let substrate = System::build(&config.substrate, bounds, seed)?;
        let analogue = System::build(&config.analogue, bounds, mix_seed(seed))?;
        Ok(Self::assemble(substrate, analogue, bounds, seed))
    }

    fn assemble(substrate: System, analogue: System, bounds: Bounds, seed: u64) -> Self {
        info!(seed, width = bounds.width, height = bounds.height, "testbed ready");
        Self {
            substrate,
            analogue,
            current_tick: 0,
            indicators: EthicalIndicators::default(),
            bounds,
            seed,
        }
    }

    pub fn tick_core(&mut self) -> TickResult {
        self.current_tick += 1;
        let tick = self.current_tick;

        let substrate = self.substrate.step(tick);
        let analogue = self.analogue.step(tick);
        self.indicators = self.indicators.next(&substrate.metrics);

        trace!(
            tick,
            substrate = substrate.integration_estimate,
            analogue = analogue.integration_estimate,
            "tick"
        );

        TickResult { tick, substrate, analogue, indicators: self.indicators }
    }

    pub fn run_ticks(&mut self, ticks: u32) {
        for _ in 0..ticks {
            self.tick_core();
        }
    }

    fn slot(&self, variant: Variant) -> &System {
        match variant {
            Variant::Substrate => &self.substrate,
            Variant::Analogue => &self.analogue,
        }
    }

    fn slot_mut(&mut self, variant: Variant) -> &mut System {
        match variant {
            Variant::Substrate => &mut self.substrate,
            Variant::Analogue => &mut self.analogue,
        }
    }

    /// Read-only view of one system.
    pub fn system(&self, variant: Variant) -> &SimulationState {
        &self.slot(variant).state
    }

    pub fn current_tick(&self) -> u64 {
        self.current_tick
    }

    pub fn indicators(&self) -> &EthicalIndicators {
        &self.indicators
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    // ─── Control surface ─────────────────────────────────────────────────────

    pub fn perturb(&mut self, variant: Variant, perturbation: Perturbation) {
        let system = self.slot_mut(variant);
        perturbation.apply(&mut system.state, &mut system.rng);
    }

    pub fn reset_all(&mut self) {
        for variant in Variant::ALL {
            self.perturb(variant, Perturbation::Reset);
        }
    }

    pub fn set_config(&mut self, variant: Variant, config: DynamicsConfig) -> Result<(), ConfigError> {
        self.slot_mut(variant).state.set_config(config)?;
        debug!(%variant, ?config, "dynamics config updated");
        Ok(())
    }

    pub fn set_volatility(&mut self, variant: Variant, volatility: f64) -> Result<(), ConfigError> {
        let mut config = self.system(variant).config;
        config.volatility = volatility;
        self.set_config(variant, config)
    }

    /// New display bounds; node positions of both systems are rescaled.
    pub fn resize(&mut self, bounds: Bounds) -> Result<(), ConfigError> {
        bounds.validate()?;
        self.substrate.state.resize(bounds)?;
        self.analogue.state.resize(bounds)?;
        self.bounds = bounds;
        Ok(())
    }

    /// Rebuild both systems with new node and matrix counts, keeping their
    /// dynamics configs. The tick counter and indicators start over.
    pub fn reconfigure(&mut self, node_count: u32, matrix_size: u32) -> Result<(), ValidationError> {
        let mut config = self.export_config();
        for entry in [&mut config.substrate, &mut config.analogue] {
            entry.node_count = node_count;
            entry.matrix_size = matrix_size;
        }
        let rebuilt = Self::from_config(&config, self.bounds, self.seed)?;
        info!(node_count, matrix_size, "testbed reconfigured");
        *self = rebuilt;
        Ok(())
    }

    // ─── Export / import ─────────────────────────────────────────────────────

    pub fn export_config(&self) -> TestbedConfig {
        TestbedConfig { substrate: self.substrate.entry(), analogue: self.analogue.entry() }
    }

    pub fn export_json(&self) -> Result<String, serde_json::Error> {
        self.export_config().to_json()
    }

    /// Replace both systems with fresh ones built from `json`. On error the
    /// testbed is left exactly as it was.
    pub fn import_json(&mut self, json: &str) -> Result<(), ValidationError> {
        let config = TestbedConfig::from_json(json)?;
        let rebuilt = Self::from_config(&config, self.bounds, self.seed)?;
        info!("configuration imported");
        *self = rebuilt;
        Ok(())
    }

    // ─── Narrative ───────────────────────────────────────────────────────────

    pub fn narrative_input(&self) -> NarrativeInput {
        NarrativeInput::from_states(&self.substrate.state, &self.analogue.state, self.indicators)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
