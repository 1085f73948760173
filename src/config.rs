// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Open Consciousness Testbed ("The Twin Engine") - Configuration Export/Import

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ValidationError};
use crate::types::{
    DynamicsConfig, Variant, DEFAULT_MATRIX_SIZE, DEFAULT_NODE_COUNT, MAX_MATRIX_SIZE,
    MAX_NODE_COUNT,
};

/// Starting parameters of one system. Enough to rebuild it from scratch,
/// nothing of its evolved state.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SystemConfig {
    pub variant: Variant,
    pub config: DynamicsConfig,
    pub node_count: u32,
    pub matrix_size: u32,
}

impl SystemConfig {
    pub fn default_for(variant: Variant) -> Self {
        Self {
            variant,
            config: DynamicsConfig::for_variant(variant),
            node_count: DEFAULT_NODE_COUNT,
            matrix_size: DEFAULT_MATRIX_SIZE,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.matrix_size == 0 {
            return Err(ConfigError::ZeroMatrixSize);
        }
        if self.matrix_size > MAX_MATRIX_SIZE {
            return Err(ConfigError::MatrixTooLarge {
                size: u64::from(self.matrix_size),
                max: MAX_MATRIX_SIZE,
            });
        }
        if self.node_count > MAX_NODE_COUNT {
            return Err(ConfigError::TooManyNodes { count: self.node_count, max: MAX_NODE_COUNT });
        }
        self.config.validate()
    }
}

/// Exported configuration of both systems.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct TestbedConfig {
    pub substrate: SystemConfig,
    pub analogue: SystemConfig,
}

impl Default for TestbedConfig {
    fn default() -> Self {
        Self {
            substrate: SystemConfig::default_for(Variant::Substrate),
            analogue: SystemConfig::default_for(Variant::Analogue),
        }
    }
}

impl TestbedConfig {
    pub fn system(&self, variant: Variant) -> &SystemConfig {
        match variant {
            Variant::Substrate => &self.substrate,
            Variant::Analogue => &self.analogue,
        }
    }

    /// Both entries valid and each filed under its own variant.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for variant in Variant::ALL {
            let entry = self.system(variant);
            if entry.variant != variant {
                return Err(ValidationError::VariantMismatch { expected: variant, found: entry.variant });
            }
            entry.validate()?;
        }
        Ok(())
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Parse and validate a payload. Nothing is returned unless every field
    /// is present, well-typed and in range.
    pub fn from_json(json: &str) -> Result<Self, ValidationError> {
        let parsed: Self = serde_json::from_str(json)?;
        parsed.validate()?;
        Ok(parsed)
    }
}
