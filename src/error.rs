// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Open Consciousness Testbed ("The Twin Engine") - Error Types

use crate::types::Variant;

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

/// Errors raised when a simulation is constructed or reconfigured with
/// parameters outside their documented ranges.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("matrix size must be at least 1")]
    ZeroMatrixSize,

    #[error("matrix size {size} exceeds the limit of {max}")]
    MatrixTooLarge { size: u64, max: u32 },

    #[error("node count {count} exceeds the limit of {max}")]
    TooManyNodes { count: u32, max: u32 },

    #[error("{field} must lie in {range}, got {value}")]
    OutOfRange {
        field: &'static str,
        range: &'static str,
        value: f64,
    },

    #[error("bounds must be positive and finite, got {width}x{height}")]
    InvalidBounds { width: f64, height: f64 },

    #[error("edge {source_id}->{target} references a missing node")]
    DanglingEdge { source_id: u32, target: u32 },

    #[error("edge on node {0} connects the node to itself")]
    SelfLoop(u32),

    #[error("more than one edge between nodes {0} and {1}")]
    DuplicateEdge(u32, u32),

    #[error("node at position {position} has id {id}")]
    NodeIdMismatch { position: usize, id: u32 },

    #[error("matrix needs {expected} cells, got {actual}")]
    MatrixShape { expected: usize, actual: usize },
}

// ---------------------------------------------------------------------------
// Import validation errors
// ---------------------------------------------------------------------------

/// Errors raised while importing a configuration payload. The import is
/// rejected as a whole on any of these.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("malformed configuration payload: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("entry for {expected} declares variant {found}")]
    VariantMismatch { expected: Variant, found: Variant },

    #[error("invalid configuration values: {0}")]
    Config(#[from] ConfigError),
}

// ---------------------------------------------------------------------------
// Narrative provider errors
// ---------------------------------------------------------------------------

/// Failure of a remote narrative provider. Always recovered locally.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProviderError {
    #[error("provider unavailable: {0}")]
    Unavailable(String),

    #[error("provider timed out")]
    Timeout,

    #[error("provider returned status {0}")]
    Status(u16),

    #[error("provider returned an empty response")]
    EmptyResponse,
}
