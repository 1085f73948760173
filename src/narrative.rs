// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Open Consciousness Testbed ("The Twin Engine") - Narrative Surface

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::ProviderError;
use crate::indicators::EthicalIndicators;
use crate::state::SimulationState;

/// Readings handed to a narrative generator.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct NarrativeInput {
    pub substrate_integration: f64,
    pub substrate_dpci: f64,
    pub substrate_dispersion: f64,
    pub analogue_integration: f64,
    pub analogue_dpci: f64,
    pub indicators: EthicalIndicators,
}

impl NarrativeInput {
    pub fn from_states(
        substrate: &SimulationState,
        analogue: &SimulationState,
        indicators: EthicalIndicators,
    ) -> Self {
        Self {
            substrate_integration: substrate.integration_estimate(),
            substrate_dpci: substrate.metrics().dpci_score,
            substrate_dispersion: substrate.metrics().dispersion_score,
            analogue_integration: analogue.integration_estimate(),
            analogue_dpci: analogue.metrics().dpci_score,
            indicators,
        }
    }
}

/// Where a narrative came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum NarrativeSource {
    Provider(String),
    Local,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Narrative {
    pub text: String,
    pub source: NarrativeSource,
}

/// Text generator backed by a remote model. Implementations own their
/// transport, timeouts and cancellation.
pub trait NarrativeProvider {
    fn name(&self) -> &str;
    fn generate(&self, prompt: &str) -> Result<String, ProviderError>;
}

/// Comparison prompt for a remote model.
pub fn build_prompt(input: &NarrativeInput) -> String {
    let ind = &input.indicators;
    format!(
        "Compare two simulated systems briefly and metaphorically.\n\
         \n\
         Substrate:\n\
         - integration: {:.3}\n\
         - dPCI: {:.3}\n\
         - dispersion: {:.3}\n\
         \n\
         Analogue:\n\
         - integration: {:.3}\n\
         - dPCI: {:.3}\n\
         \n\
         Indicators (Substrate):\n\
         - self quality: {:.2}\n\
         - activity level: {:.2}\n\
         - opacity: {:.2}",
        input.substrate_integration,
        input.substrate_dpci,
        input.substrate_dispersion,
        input.analogue_integration,
        input.analogue_dpci,
        ind.self_quality,
        ind.activity_level,
        ind.opacity,
    )
}

/// Deterministic offline narrative.
pub fn local_narrative(input: &NarrativeInput) -> String {
    let tone = if input.substrate_integration > input.analogue_integration {
        "focused, crystalline attention"
    } else {
        "a softly diffused reverie"
    };
    let contrast = if input.substrate_dpci > input.analogue_dpci {
        "sharp, high-contrast edges"
    } else {
        "broad watercolour washes"
    };
    format!(
        "Offline: the Substrate hums with {}, tracing {} through its lattice. \
         The Analogue drifts warmer, its signals pooling slowly. \
         Integration {:.3} against {:.3}: one pattern etched, one breathed.",
        tone, contrast, input.substrate_integration, input.analogue_integration,
    )
}

/// Ask the provider if there is one; fall back to [`local_narrative`] on
/// any failure or an empty reply.
pub fn narrate(provider: Option<&dyn NarrativeProvider>, input: &NarrativeInput) -> Narrative {
    let Some(provider) = provider else {
        return Narrative { text: local_narrative(input), source: NarrativeSource::Local };
    };

    let reply = provider.generate(&build_prompt(input)).and_then(|text| {
        if text.trim().is_empty() {
            Err(ProviderError::EmptyResponse)
        } else {
            Ok(text)
        }
    });

    match reply {
        Ok(text) => Narrative { text, source: NarrativeSource::Provider(provider.name().to_string()) },
        Err(err) => {
            warn!(provider = provider.name(), error = %err, "narrative provider failed, using local template");
            Narrative { text: local_narrative(input), source: NarrativeSource::Local }
        }
    }
}
