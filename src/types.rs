// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Open Consciousness Testbed ("The Twin Engine") - Type Definitions

use serde::{Deserialize, Serialize};
use std::fmt;
use wasm_bindgen::prelude::*;

use crate::error::ConfigError;
use crate::indicators::EthicalIndicators;

pub const DEFAULT_NODE_COUNT: u32 = 35;
pub const DEFAULT_MATRIX_SIZE: u32 = 24;
pub const DEFAULT_WIDTH: f64 = 600.0;
pub const DEFAULT_HEIGHT: f64 = 400.0;

/// Largest network a system may be built with.
pub const MAX_NODE_COUNT: u32 = 1000;
/// Largest interaction matrix side a system may be built with.
pub const MAX_MATRIX_SIZE: u32 = 256;

// ─── Variant ─────────────────────────────────────────────────────────────────

#[wasm_bindgen]
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Variant {
    Substrate = 0,
    Analogue = 1,
}

impl Variant {
    pub const ALL: [Variant; 2] = [Variant::Substrate, Variant::Analogue];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Substrate => "substrate",
            Self::Analogue => "analogue",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ─── Bounds ──────────────────────────────────────────────────────────────────

/// Rectangle that confines node positions, in display units.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Bounds {
    pub width: f64,
    pub height: f64,
}

impl Default for Bounds {
    fn default() -> Self {
        Self { width: DEFAULT_WIDTH, height: DEFAULT_HEIGHT }
    }
}

impl Bounds {
    pub fn new(width: f64, height: f64) -> Result<Self, ConfigError> {
        let bounds = Self { width, height };
        bounds.validate()?;
        Ok(bounds)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let ok = |v: f64| v.is_finite() && v > 0.0;
        if ok(self.width) && ok(self.height) {
            Ok(())
        } else {
            Err(ConfigError::InvalidBounds { width: self.width, height: self.height })
        }
    }
}

// ─── Node / Edge ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Node {
    pub id: u32,
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub activation: f64,
}

impl Node {
    /// A node at rest with the given activation.
    pub fn at(id: u32, x: f64, y: f64, activation: f64) -> Self {
        Self { id, x, y, vx: 0.0, vy: 0.0, activation }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Edge {
    pub source: u32,
    pub target: u32,
    pub weight: f64,
}

pub const MIN_EDGE_WEIGHT: f64 = 0.01;
pub const MAX_EDGE_WEIGHT: f64 = 1.0;

// ─── DynamicsConfig ──────────────────────────────────────────────────────────

/// Per-system parameters of the tick update rule.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct DynamicsConfig {
    /// Amplitude of the matrix random walk.
    pub volatility: f64,
    /// Lower end of the activation decay multiplier, in (0, 1).
    pub activation_decay: f64,
    /// Lower end of the edge weight decay multiplier, in (0, 1).
    pub weight_decay: f64,
    /// Scale of the noise-driven node acceleration.
    pub node_speed: f64,
}

impl DynamicsConfig {
    /// Fast, noisy regime.
    pub fn substrate() -> Self {
        Self {
            volatility: 0.02,
            activation_decay: 0.95,
            weight_decay: 0.98,
            node_speed: 0.1,
        }
    }

    /// Slow, persistent regime.
    pub fn analogue() -> Self {
        Self {
            volatility: 0.005,
            activation_decay: 0.99,
            weight_decay: 0.995,
            node_speed: 0.02,
        }
    }

    pub fn for_variant(variant: Variant) -> Self {
        match variant {
            Variant::Substrate => Self::substrate(),
            Variant::Analogue => Self::analogue(),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        non_negative("volatility", self.volatility)?;
        unit_open("activation_decay", self.activation_decay)?;
        unit_open("weight_decay", self.weight_decay)?;
        non_negative("node_speed", self.node_speed)?;
        Ok(())
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange { field, range: "[0, inf)", value })
    }
}

fn unit_open(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value > 0.0 && value < 1.0 {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange { field, range: "(0, 1)", value })
    }
}

// ─── Metrics ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct NetworkActivity {
    pub avg_activation: f64,
    pub avg_weight: f64,
}

/// Scalar readings of one system for one tick.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Metrics {
    pub dispersion_score: f64,
    pub network_activity: NetworkActivity,
    pub dpci_score: f64,
    pub integration_estimate: f64,
}

// ─── TickResult ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct SystemSnapshot {
    pub variant: Variant,
    pub metrics: Metrics,
    pub integration_estimate: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct TickResult {
    pub tick: u64,
    pub substrate: SystemSnapshot,
    pub analogue: SystemSnapshot,
    pub indicators: EthicalIndicators,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variant_defaults_are_valid() {
        for variant in Variant::ALL {
            assert!(DynamicsConfig::for_variant(variant).validate().is_ok());
        }
    }

    #[test]
    fn test_substrate_is_the_faster_regime() {
        let s = DynamicsConfig::substrate();
        let a = DynamicsConfig::analogue();
        assert!(s.volatility > a.volatility);
        assert!(s.node_speed > a.node_speed);
        assert!(s.activation_decay < a.activation_decay);
        assert!(s.weight_decay < a.weight_decay);
    }

    #[test]
    fn test_decay_outside_unit_interval_rejected() {
        let mut cfg = DynamicsConfig::substrate();
        cfg.activation_decay = 1.0;
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::OutOfRange { field: "activation_decay", .. })
        ));
        cfg.activation_decay = 0.9;
        cfg.weight_decay = 0.0;
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::OutOfRange { field: "weight_decay", .. })
        ));
    }

    #[test]
    fn test_non_finite_volatility_rejected() {
        let mut cfg = DynamicsConfig::analogue();
        cfg.volatility = f64::NAN;
        assert!(cfg.validate().is_err());
        cfg.volatility = -0.1;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_bounds_validation() {
        assert!(Bounds::new(600.0, 400.0).is_ok());
        assert!(Bounds::new(0.0, 400.0).is_err());
        assert!(Bounds::new(600.0, f64::INFINITY).is_err());
        assert_eq!(Bounds::default(), Bounds { width: 600.0, height: 400.0 });
    }

    #[test]
    fn test_config_rejects_unknown_fields() {
        let json = r#"{"volatility":0.1,"activation_decay":0.9,"weight_decay":0.9,"node_speed":0.1,"extra":1}"#;
        assert!(serde_json::from_str::<DynamicsConfig>(json).is_err());
    }

    #[test]
    fn test_variant_display() {
        assert_eq!(Variant::Substrate.to_string(), "substrate");
        assert_eq!(Variant::Analogue.to_string(), "analogue");
    }
}
