// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Open Consciousness Testbed ("The Twin Engine") - Interaction Matrix

use serde::Serialize;

use crate::error::ConfigError;
use crate::random::RandomSource;
use crate::types::MAX_MATRIX_SIZE;

/// Micro-scale fluctuation grid: `size x size` cells, each in `[0, 1]`,
/// stored row-major.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct InteractionMatrix {
    size: usize,
    cells: Vec<f64>,
}

/// Number of cells of a `size x size` matrix, or why it cannot be built.
fn cell_count(size: usize) -> Result<usize, ConfigError> {
    let too_large = || ConfigError::MatrixTooLarge { size: size as u64, max: MAX_MATRIX_SIZE };
    if size == 0 {
        return Err(ConfigError::ZeroMatrixSize);
    }
    if size > MAX_MATRIX_SIZE as usize {
        return Err(too_large());
    }
    size.checked_mul(size).ok_or_else(too_large)
}

impl InteractionMatrix {
    /// Every cell drawn uniformly from `[0, 1)`.
    pub fn random(size: usize, rng: &mut dyn RandomSource) -> Result<Self, ConfigError> {
        let cells = (0..cell_count(size)?).map(|_| rng.uniform()).collect();
        Ok(Self { size, cells })
    }

    /// Every cell set to `value`, clamped into `[0, 1]`.
    pub fn filled(size: usize, value: f64) -> Result<Self, ConfigError> {
        let count = cell_count(size)?;
        Ok(Self { size, cells: vec![value.clamp(0.0, 1.0); count] })
    }

    pub fn from_cells(size: usize, cells: Vec<f64>) -> Result<Self, ConfigError> {
        let expected = cell_count(size)?;
        if cells.len() != expected {
            return Err(ConfigError::MatrixShape { expected, actual: cells.len() });
        }
        if let Some(&bad) = cells.iter().find(|c| !(0.0..=1.0).contains(*c)) {
            return Err(ConfigError::OutOfRange { field: "cell", range: "[0, 1]", value: bad });
        }
        Ok(Self { size, cells })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// All cells flattened, row-major.
    pub fn cells(&self) -> &[f64] {
        &self.cells
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row < self.size && col < self.size {
            Some(self.cells[row * self.size + col])
        } else {
            None
        }
    }

    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        self.cells.chunks(self.size)
    }

    /// Redraw every cell uniformly from `[0, 1)`.
    pub(crate) fn randomize(&mut self, rng: &mut dyn RandomSource) {
        for cell in &mut self.cells {
            *cell = rng.uniform();
        }
    }

    /// Add `(U - 0.5) * amplitude` to every cell and clamp into `[0, 1]`.
    pub(crate) fn jitter(&mut self, amplitude: f64, rng: &mut dyn RandomSource) {
        for cell in &mut self.cells {
            *cell = (*cell + (rng.uniform() - 0.5) * amplitude).clamp(0.0, 1.0);
        }
    }
}
