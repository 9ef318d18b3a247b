use thiserror::Error;

use super::{EnvKind, GraphPolicy, SharingPolicy};

/// Invalid reward-sharing or experiment configuration.
///
/// Detected eagerly when a shaper or strategy is constructed; values are
/// never silently coerced.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Grid dimensions must be non-zero, got {rows}x{cols}")]
    ZeroGridDimension { rows: usize, cols: usize },

    #[error("Neighbor weight must be a finite non-negative float, got {0}")]
    InvalidNeighborWeight(f64),

    #[error("Neighbor count k must be a positive integer")]
    ZeroNeighborCount,

    #[error("Temperature factor must be a finite positive float, got {0}")]
    InvalidTemperature(f64),

    #[error("Discount factor must lie in [0, 1], got {0}")]
    InvalidGamma(f64),

    #[error("Interaction graph policy '{0}' is not supported")]
    UnsupportedGraphPolicy(GraphPolicy),

    #[error("Sharing policy '{policy}' conflicts with environment '{env}'")]
    PolicyConflict { env: EnvKind, policy: SharingPolicy },

    #[error("Expected {expected} orientation flags, got {got}")]
    OrientationCount { expected: usize, got: usize },

    #[error("Orientation flag must be non-negative, got {0}")]
    InvalidOrientationFlag(i64),

    #[error("Parameter '{key}' must be {expected}")]
    WrongParamType { key: String, expected: &'static str },

    #[error("Required parameter '{0}' is missing")]
    MissingParam(String),
}
