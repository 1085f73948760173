// Per-Tick JSONL Time Series Recorder
// Outputs one JSON line per tick for independent analysis

use oct_engine::{LampStatus, Perturbation, TickResult, Variant};
use serde::Serialize;
use std::io::Write;

#[derive(Debug, Serialize)]
pub struct TickSnapshot {
    pub tick: u64,
    pub substrate_integration: f64,
    pub analogue_integration: f64,
    pub substrate_dpci: f64,
    pub analogue_dpci: f64,
    pub substrate_dispersion: f64,
    pub analogue_dispersion: f64,
    pub substrate_activation: f64,
    pub analogue_activation: f64,
    pub substrate_weight: f64,
    pub analogue_weight: f64,
    pub self_quality: f64,
    pub self_quality_lamp: Option<LampStatus>,
    pub sustained_high_ticks: u64,
    /// Perturbations applied just before this tick, as `variant:kind`.
    pub perturbations: Vec<String>,
}

impl TickSnapshot {
    pub fn from_result(result: &TickResult, fired: &[(Variant, Perturbation)]) -> Self {
        let s = &result.substrate.metrics;
        let a = &result.analogue.metrics;
        Self {
            tick: result.tick,
            substrate_integration: result.substrate.integration_estimate,
            analogue_integration: result.analogue.integration_estimate,
            substrate_dpci: s.dpci_score,
            analogue_dpci: a.dpci_score,
            substrate_dispersion: s.dispersion_score,
            analogue_dispersion: a.dispersion_score,
            substrate_activation: s.network_activity.avg_activation,
            analogue_activation: a.network_activity.avg_activation,
            substrate_weight: s.network_activity.avg_weight,
            analogue_weight: a.network_activity.avg_weight,
            self_quality: result.indicators.self_quality,
            self_quality_lamp: result.indicators.self_quality_lamp,
            sustained_high_ticks: result.indicators.sustained_high_ticks,
            perturbations: fired.iter().map(|(v, p)| format!("{}:{}", v, p)).collect(),
        }
    }
}

/// Time series recorder that accumulates snapshots and writes JSONL
pub struct TimeSeriesRecorder {
    snapshots: Vec<TickSnapshot>,
}

impl TimeSeriesRecorder {
    pub fn new() -> Self {
        Self { snapshots: Vec::new() }
    }

    pub fn record(&mut self, result: &TickResult, fired: &[(Variant, Perturbation)]) {
        self.snapshots.push(TickSnapshot::from_result(result, fired));
    }

    /// Write all snapshots to a JSONL file
    pub fn write_jsonl(&self, path: &std::path::Path) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut file = std::fs::File::create(path)?;
        for snapshot in &self.snapshots {
            let line = serde_json::to_string(snapshot)
                .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
            writeln!(file, "{}", line)?;
        }
        Ok(())
    }

    pub fn ticks_recorded(&self) -> usize {
        self.snapshots.len()
    }
}
