// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Open Consciousness Testbed ("The Twin Engine") - Ethical Indicators

use serde::{Deserialize, Serialize};

use crate::types::Metrics;

const WATCH_THRESHOLD: f64 = 33.0;
const NOMINAL_THRESHOLD: f64 = 66.0;
/// Integration at or above this counts toward a sustained-high streak.
pub const SUSTAINED_HIGH_INTEGRATION: f64 = 0.66;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum LampStatus {
    Alert,
    Watch,
    Nominal,
}

impl LampStatus {
    /// Classify a 0..100 reading.
    pub fn classify(value: f64) -> Self {
        if value < WATCH_THRESHOLD {
            Self::Alert
        } else if value < NOMINAL_THRESHOLD {
            Self::Watch
        } else {
            Self::Nominal
        }
    }
}

/// Dashboard readings derived from the Substrate system's metrics.
///
/// Owned by the orchestrator and advanced with [`EthicalIndicators::next`];
/// there is no state outside this value.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct EthicalIndicators {
    /// Integration mapped to 0..100.
    pub self_quality: f64,
    /// Mean activation mapped to 0..100.
    pub activity_level: f64,
    /// Missing connectivity (1 - mean weight) mapped to 0..100.
    pub opacity: f64,
    pub self_quality_lamp: Option<LampStatus>,
    pub activity_lamp: Option<LampStatus>,
    /// Evaluated on `100 - opacity`: more opacity is worse.
    pub opacity_lamp: Option<LampStatus>,
    /// Consecutive ticks at or above [`SUSTAINED_HIGH_INTEGRATION`].
    pub sustained_high_ticks: u64,
    pub peak_integration: f64,
}

impl EthicalIndicators {
    pub fn next(&self, metrics: &Metrics) -> Self {
        let self_quality = percent(metrics.integration_estimate);
        let activity_level = percent(metrics.network_activity.avg_activation);
        let opacity = percent(1.0 - metrics.network_activity.avg_weight);

        let sustained_high_ticks = if metrics.integration_estimate >= SUSTAINED_HIGH_INTEGRATION {
            self.sustained_high_ticks + 1
        } else {
            0
        };

        Self {
            self_quality,
            activity_level,
            opacity,
            self_quality_lamp: Some(LampStatus::classify(self_quality)),
            activity_lamp: Some(LampStatus::classify(activity_level)),
            opacity_lamp: Some(LampStatus::classify(100.0 - opacity)),
            sustained_high_ticks,
            peak_integration: self.peak_integration.max(metrics.integration_estimate),
        }
    }
}

fn percent(fraction: f64) -> f64 {
    (fraction * 100.0).clamp(0.0, 100.0)
}
