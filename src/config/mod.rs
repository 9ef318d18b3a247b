//! Configuration for reward sharing and experiment launch.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub mod error;
pub mod experiment;
#[cfg(feature = "serde")]
pub mod params;

pub use error::ConfigError;
pub use experiment::{EnvKind, ExperimentConfig};

/// How raw rewards are combined into adjusted rewards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SharingPolicy {
    /// Adjusted reward equals raw reward.
    #[default]
    None,
    /// Own reward plus `neighbor_weight ×` each cardinal neighbour's reward.
    NeighborWeight,
    /// Softmax-weighted average over the k nearest agents.
    KnnSoftmax,
}

impl fmt::Display for SharingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SharingPolicy::None => write!(f, "none"),
            SharingPolicy::NeighborWeight => write!(f, "neighbor_weight"),
            SharingPolicy::KnnSoftmax => write!(f, "knn_softmax"),
        }
    }
}

/// How the interaction graph used for neighbour sharing is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum GraphPolicy {
    /// Cardinal neighbours along each agent's orientation axis.
    #[default]
    FixedTopology,
    /// Derived from sanitized observations. Rejected at construction.
    Learned,
}

impl fmt::Display for GraphPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphPolicy::FixedTopology => write!(f, "fixed_topology"),
            GraphPolicy::Learned => write!(f, "learned"),
        }
    }
}

/// Reward-sharing parameters recognised by the environment.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct SharingConfig {
    /// Not read from files; experiments select it through [`EnvKind`].
    #[cfg_attr(feature = "serde", serde(skip))]
    pub policy: SharingPolicy,
    /// Multiplier applied to each neighbour's raw reward (neighbour sharing).
    pub neighbor_weight: f64,
    /// Number of nearest agents consulted (k-NN sharing).
    pub k_nearest_neighbor: usize,
    /// Softmax temperature τ (k-NN sharing).
    pub temperature_factor: f64,
    /// Local edges per observation (observation sanitizer).
    pub num_local_edges: usize,
    /// Traffic lights per observation (observation sanitizer).
    pub num_local_lights: usize,
    pub graph: GraphPolicy,
}

impl SharingConfig {
    /// Checks every parameter the selected policy consumes.
    ///
    /// # Errors
    ///
    /// - `InvalidNeighborWeight` for a negative or non-finite weight
    /// - `ZeroNeighborCount` for `k == 0`
    /// - `InvalidTemperature` for a non-positive or non-finite temperature
    /// - `UnsupportedGraphPolicy` when the learned graph is selected
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.policy {
            SharingPolicy::None => {}
            SharingPolicy::NeighborWeight => {
                validate_neighbor_weight(self.neighbor_weight)?;
                if self.graph == GraphPolicy::Learned {
                    return Err(ConfigError::UnsupportedGraphPolicy(self.graph));
                }
            }
            SharingPolicy::KnnSoftmax => {
                validate_knn(self.k_nearest_neighbor, self.temperature_factor)?;
            }
        }
        Ok(())
    }

    /// Convenience constructor for neighbour sharing.
    pub fn neighbor_weight(weight: f64) -> Self {
        Self {
            policy: SharingPolicy::NeighborWeight,
            neighbor_weight: weight,
            ..Self::default()
        }
    }

    /// Convenience constructor for k-NN softmax sharing.
    pub fn knn_softmax(k: usize, temperature: f64) -> Self {
        Self {
            policy: SharingPolicy::KnnSoftmax,
            k_nearest_neighbor: k,
            temperature_factor: temperature,
            ..Self::default()
        }
    }
}

impl Default for SharingConfig {
    fn default() -> Self {
        Self {
            policy: SharingPolicy::None,
            neighbor_weight: 0.1,
            k_nearest_neighbor: 5,
            temperature_factor: 0.5,
            num_local_edges: 4,
            num_local_lights: 4,
            graph: GraphPolicy::FixedTopology,
        }
    }
}

pub(crate) fn validate_neighbor_weight(weight: f64) -> Result<(), ConfigError> {
    if !weight.is_finite() || weight < 0.0 {
        return Err(ConfigError::InvalidNeighborWeight(weight));
    }
    Ok(())
}

pub(crate) fn validate_knn(k: usize, temperature: f64) -> Result<(), ConfigError> {
    if k == 0 {
        return Err(ConfigError::ZeroNeighborCount);
    }
    if !temperature.is_finite() || temperature <= 0.0 {
        return Err(ConfigError::InvalidTemperature(temperature));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let cfg = SharingConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.k_nearest_neighbor, 5);
        assert_eq!(cfg.temperature_factor, 0.5);
        assert_eq!(cfg.neighbor_weight, 0.1);
    }

    #[test]
    fn negative_weight_rejected() {
        let cfg = SharingConfig::neighbor_weight(-0.5);
        assert_eq!(cfg.validate(), Err(ConfigError::InvalidNeighborWeight(-0.5)));
        assert!(SharingConfig::neighbor_weight(f64::NAN).validate().is_err());
        assert!(SharingConfig::neighbor_weight(0.0).validate().is_ok());
    }

    #[test]
    fn zero_k_rejected() {
        let cfg = SharingConfig::knn_softmax(0, 0.5);
        assert_eq!(cfg.validate(), Err(ConfigError::ZeroNeighborCount));
    }

    #[test]
    fn non_positive_temperature_rejected() {
        assert_eq!(
            SharingConfig::knn_softmax(3, 0.0).validate(),
            Err(ConfigError::InvalidTemperature(0.0))
        );
        assert!(SharingConfig::knn_softmax(3, -1.0).validate().is_err());
        assert!(SharingConfig::knn_softmax(3, f64::INFINITY).validate().is_err());
    }

    #[test]
    fn learned_graph_rejected_for_neighbor_sharing() {
        let cfg = SharingConfig {
            graph: GraphPolicy::Learned,
            ..SharingConfig::neighbor_weight(0.2)
        };
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::UnsupportedGraphPolicy(GraphPolicy::Learned))
        );
    }

    #[test]
    fn unused_parameters_are_not_checked() {
        let cfg = SharingConfig {
            temperature_factor: -1.0,
            ..SharingConfig::neighbor_weight(0.2)
        };
        assert!(cfg.validate().is_ok());
    }
}
