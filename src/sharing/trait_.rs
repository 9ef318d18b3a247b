//! Reward-sharing trait.

use crate::agent::RewardMap;
use crate::error::ContractError;
use crate::observation::ObservationMap;
use crate::topology::{GridTopology, Orientations};

/// Everything the simulator hands over for one timestep.
#[derive(Debug, Clone, Copy)]
pub struct StepContext<'a> {
    pub topology: &'a GridTopology,
    pub raw_rewards: &'a RewardMap,
    pub orientations: &'a Orientations,
    pub observations: Option<&'a ObservationMap>,
}

/// A rule turning raw per-agent rewards into adjusted rewards.
///
/// The adjusted map always has exactly the keys of `step.raw_rewards`.
pub trait RewardSharing: Send + Sync {
    /// Computes adjusted rewards for one timestep.
    fn adjust(&self, step: &StepContext<'_>) -> Result<RewardMap, ContractError>;

    /// Returns a human-readable name for this strategy.
    fn name(&self) -> &str;
}
