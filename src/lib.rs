// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Open Consciousness Testbed ("The Twin Engine")

pub mod types;
pub mod error;
pub mod random;
pub mod graph;
pub mod matrix;
pub mod state;
pub mod dynamics;
pub mod measurement;
pub mod perturbation;
pub mod indicators;
pub mod narrative;
pub mod config;
pub mod simulation;

pub use types::*;
pub use config::{SystemConfig, TestbedConfig};
pub use error::{ConfigError, ProviderError, ValidationError};
pub use graph::NetworkGraph;
pub use indicators::{EthicalIndicators, LampStatus};
pub use matrix::InteractionMatrix;
pub use narrative::{Narrative, NarrativeInput, NarrativeProvider, NarrativeSource};
pub use perturbation::Perturbation;
pub use random::{RandomSource, SeededSource};
pub use simulation::Testbed;
pub use state::{BoundedHistory, SimulationState};

use wasm_bindgen::prelude::*;

// ─── WASM Interface ──────────────────────────────────────────────────────────

#[wasm_bindgen]
impl Testbed {
    #[wasm_bindgen(constructor)]
    pub fn new(node_count: u32, matrix_size: u32, seed: u32) -> Result<Testbed, JsError> {
        #[cfg(target_arch = "wasm32")]
        std::panic::set_hook(Box::new(console_error_panic_hook::hook));

        let mut config = TestbedConfig::default();
        for entry in [&mut config.substrate, &mut config.analogue] {
            entry.node_count = node_count;
            entry.matrix_size = matrix_size;
        }
        Ok(Testbed::from_config(&config, Bounds::default(), u64::from(seed))?)
    }

    pub fn tick(&mut self) -> JsValue {
        let result = self.tick_core();
        serde_wasm_bindgen::to_value(&result).unwrap_or(JsValue::NULL)
    }

    /// Run N ticks without returning results (fast batch mode for benchmarking)
    pub fn run_batch(&mut self, ticks: u32) {
        self.run_ticks(ticks);
    }

    pub fn get_tick(&self) -> f64 {
        self.current_tick() as f64
    }

    // ─── Snapshots ───────────────────────────────────────────────────────────

    pub fn get_graph(&self, variant: Variant) -> JsValue {
        serde_wasm_bindgen::to_value(self.system(variant).graph()).unwrap_or(JsValue::NULL)
    }

    pub fn get_matrix(&self, variant: Variant) -> JsValue {
        serde_wasm_bindgen::to_value(self.system(variant).matrix()).unwrap_or(JsValue::NULL)
    }

    pub fn get_metrics(&self, variant: Variant) -> JsValue {
        serde_wasm_bindgen::to_value(self.system(variant).metrics()).unwrap_or(JsValue::NULL)
    }

    pub fn get_integration(&self, variant: Variant) -> f64 {
        self.system(variant).integration_estimate()
    }

    pub fn get_dpci_history(&self, variant: Variant) -> Vec<f64> {
        self.system(variant).dpci_history().to_vec()
    }

    pub fn get_integration_history(&self, variant: Variant) -> Vec<f64> {
        self.system(variant).integration_history().to_vec()
    }

    pub fn get_config(&self, variant: Variant) -> JsValue {
        serde_wasm_bindgen::to_value(self.system(variant).config()).unwrap_or(JsValue::NULL)
    }

    pub fn get_indicators(&self) -> JsValue {
        serde_wasm_bindgen::to_value(self.indicators()).unwrap_or(JsValue::NULL)
    }

    // ─── Perturbation triggers ───────────────────────────────────────────────

    pub fn perturb_adversarial(&mut self, variant: Variant) {
        self.perturb(variant, Perturbation::Adversarial);
    }

    pub fn perturb_poisoning(&mut self, variant: Variant) {
        self.perturb(variant, Perturbation::Poisoning);
    }

    pub fn perturb_bombardment(&mut self, variant: Variant) {
        self.perturb(variant, Perturbation::Bombardment);
    }

    pub fn reset_system(&mut self, variant: Variant) {
        self.perturb(variant, Perturbation::Reset);
    }

    pub fn reset_both(&mut self) {
        self.reset_all();
    }

    // ─── Setters ─────────────────────────────────────────────────────────────

    pub fn update_volatility(&mut self, variant: Variant, volatility: f64) -> Result<(), JsError> {
        Ok(self.set_volatility(variant, volatility)?)
    }

    /// Replace a system's dynamics config with a `{volatility, activation_decay,
    /// weight_decay, node_speed}` object.
    pub fn update_config(&mut self, variant: Variant, config: JsValue) -> Result<(), JsError> {
        let config: DynamicsConfig = serde_wasm_bindgen::from_value(config)?;
        Ok(self.set_config(variant, config)?)
    }

    pub fn resize_view(&mut self, width: f64, height: f64) -> Result<(), JsError> {
        Ok(self.resize(Bounds::new(width, height)?)?)
    }

    pub fn rebuild(&mut self, node_count: u32, matrix_size: u32) -> Result<(), JsError> {
        Ok(self.reconfigure(node_count, matrix_size)?)
    }

    // ─── Export / import ─────────────────────────────────────────────────────

    pub fn export_config_json(&self) -> Result<String, JsError> {
        Ok(self.export_json()?)
    }

    pub fn import_config_json(&mut self, json: &str) -> Result<(), JsError> {
        Ok(self.import_json(json)?)
    }

    // ─── Narrative ───────────────────────────────────────────────────────────

    pub fn narrative_prompt(&self) -> String {
        narrative::build_prompt(&self.narrative_input())
    }

    pub fn narrative_fallback(&self) -> String {
        narrative::local_narrative(&self.narrative_input())
    }
}
