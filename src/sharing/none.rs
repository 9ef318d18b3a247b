//! Pass-through strategy.

use super::trait_::{RewardSharing, StepContext};
use crate::agent::RewardMap;
use crate::error::ContractError;

/// Every agent keeps its own raw reward.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSharing;

impl RewardSharing for NoSharing {
    fn adjust(&self, step: &StepContext<'_>) -> Result<RewardMap, ContractError> {
        Ok(step.raw_rewards.clone())
    }

    fn name(&self) -> &str {
        "none"
    }
}
