//! Launch parameters for a traffic-light grid experiment.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::{ConfigError, SharingConfig, SharingPolicy};
use crate::topology::GridTopology;

/// Which environment variant the experiment runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum EnvKind {
    /// Raw rewards, no sharing.
    #[default]
    Basic,
    /// Fixed-weight sharing with cardinal neighbours.
    RewardSharing,
    /// k-nearest-neighbour softmax sharing.
    Colight,
}

impl EnvKind {
    pub fn sharing_policy(&self) -> SharingPolicy {
        match self {
            EnvKind::Basic => SharingPolicy::None,
            EnvKind::RewardSharing => SharingPolicy::NeighborWeight,
            EnvKind::Colight => SharingPolicy::KnnSoftmax,
        }
    }
}

impl fmt::Display for EnvKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnvKind::Basic => write!(f, "basic"),
            EnvKind::RewardSharing => write!(f, "reward_sharing"),
            EnvKind::Colight => write!(f, "colight"),
        }
    }
}

/// Experiment parameters: grid shape, traffic demand, rollout sizing and
/// the reward-sharing variant.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct ExperimentConfig {
    /// Rows of intersections.
    pub rows: usize,
    /// Columns of intersections.
    pub cols: usize,
    /// Vehicle inflow per outer edge (veh/hour).
    pub inflow_rate: u32,
    /// Timesteps per rollout.
    pub horizon: u32,
    /// Rollouts per training iteration.
    pub rollouts: u32,
    pub env: EnvKind,
    /// Sharing parameters; `policy` must be left unset or agree with `env`.
    pub sharing: SharingConfig,
}

impl ExperimentConfig {
    /// Experiment tag used to name result directories.
    pub fn exp_tag(&self) -> String {
        format!(
            "grid_0_{}x{}_i{}_multiagent",
            self.rows, self.cols, self.inflow_rate
        )
    }

    pub fn topology(&self) -> Result<GridTopology, ConfigError> {
        GridTopology::new(self.rows, self.cols)
    }

    /// Sharing parameters with the policy implied by the environment variant.
    pub fn sharing_config(&self) -> SharingConfig {
        SharingConfig {
            policy: self.env.sharing_policy(),
            ..self.sharing.clone()
        }
    }

    /// Samples collected per training iteration.
    pub fn train_batch_size(&self) -> u64 {
        u64::from(self.horizon) * u64::from(self.rollouts)
    }

    /// # Errors
    ///
    /// Grid and sharing errors, or `PolicyConflict` when `sharing.policy`
    /// names a policy other than the one `env` selects.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.topology()?;
        let selected = self.env.sharing_policy();
        if self.sharing.policy != SharingPolicy::None && self.sharing.policy != selected {
            return Err(ConfigError::PolicyConflict {
                env: self.env,
                policy: self.sharing.policy,
            });
        }
        self.sharing_config().validate()
    }
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            rows: 3,
            cols: 3,
            inflow_rate: 300,
            horizon: 400,
            rollouts: 8,
            env: EnvKind::Basic,
            sharing: SharingConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_experiment_is_valid() {
        let cfg = ExperimentConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.train_batch_size(), 3200);
    }

    #[test]
    fn exp_tag_names_grid_and_inflow() {
        let cfg = ExperimentConfig {
            rows: 2,
            cols: 4,
            inflow_rate: 600,
            ..ExperimentConfig::default()
        };
        assert_eq!(cfg.exp_tag(), "grid_0_2x4_i600_multiagent");
    }

    #[test]
    fn env_selects_policy() {
        let cfg = ExperimentConfig {
            env: EnvKind::Colight,
            ..ExperimentConfig::default()
        };
        assert_eq!(cfg.sharing_config().policy, SharingPolicy::KnnSoftmax);
        assert_eq!(
            EnvKind::RewardSharing.sharing_policy(),
            SharingPolicy::NeighborWeight
        );
    }

    #[test]
    fn zero_rows_rejected() {
        let cfg = ExperimentConfig {
            rows: 0,
            ..ExperimentConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::ZeroGridDimension { .. })
        ));
    }

    #[test]
    fn conflicting_sharing_policy_rejected() {
        let cfg = ExperimentConfig {
            sharing: SharingConfig::knn_softmax(3, 0.5),
            ..ExperimentConfig::default()
        };
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::PolicyConflict {
                env: EnvKind::Basic,
                policy: SharingPolicy::KnnSoftmax,
            })
        );

        let agreeing = ExperimentConfig {
            env: EnvKind::Colight,
            ..cfg
        };
        assert!(agreeing.validate().is_ok());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn policy_key_in_file_rejected() {
        let parsed = serde_json::from_str::<ExperimentConfig>(
            r#"{"sharing": {"policy": "knn_softmax"}}"#,
        );
        assert!(parsed.is_err());
        assert!(serde_json::from_str::<ExperimentConfig>(r#"{"grid_rows": 2}"#).is_err());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn printed_config_omits_policy() {
        let cfg = ExperimentConfig {
            env: EnvKind::Colight,
            ..ExperimentConfig::default()
        };
        let json = serde_json::to_value(&cfg).unwrap();
        assert_eq!(json["env"], "colight");
        assert!(json["sharing"].get("policy").is_none());
        let back: ExperimentConfig = serde_json::from_value(json).unwrap();
        assert_eq!(back, cfg);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn partial_json_fills_defaults() {
        let cfg: ExperimentConfig =
            serde_json::from_str(r#"{"rows": 2, "env": "colight", "sharing": {"k_nearest_neighbor": 3}}"#)
                .unwrap();
        assert_eq!(cfg.rows, 2);
        assert_eq!(cfg.cols, 3);
        assert_eq!(cfg.env, EnvKind::Colight);
        assert_eq!(cfg.sharing.k_nearest_neighbor, 3);
        assert_eq!(cfg.sharing.temperature_factor, 0.5);
    }
}
