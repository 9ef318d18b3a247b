//! Fixed-weight sharing with cardinal neighbours.

use std::fmt;

use tracing::trace;

use super::trait_::{RewardSharing, StepContext};
use crate::agent::{reward_of, AgentId, RewardMap};
use crate::config::{validate_neighbor_weight, ConfigError};
use crate::error::ContractError;
use crate::graph::{FixedTopologyGraph, GraphBuilder, GraphInputs};

/// Adds a weighted share of each neighbour's raw reward to an agent's own.
///
/// ```text
/// adjusted[a] = raw[a] + w × Σ_{n ∈ neighbors(a)} raw[n]
/// ```
///
/// Neighbours come from the configured [`GraphBuilder`], by default the
/// (up to two) cardinal neighbours along the agent's orientation axis.
/// Boundary agents simply receive fewer terms; nothing is renormalised.
pub struct NeighborSharing {
    weight: f64,
    builder: Box<dyn GraphBuilder>,
}

impl NeighborSharing {
    /// Creates neighbour sharing over the fixed grid topology.
    ///
    /// # Errors
    ///
    /// `InvalidNeighborWeight` for a negative or non-finite weight.
    pub fn new(weight: f64) -> Result<Self, ConfigError> {
        Self::with_builder(weight, Box::new(FixedTopologyGraph))
    }

    /// Creates neighbour sharing over a custom interaction graph.
    pub fn with_builder(weight: f64, builder: Box<dyn GraphBuilder>) -> Result<Self, ConfigError> {
        validate_neighbor_weight(weight)?;
        Ok(Self { weight, builder })
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }
}

impl fmt::Debug for NeighborSharing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NeighborSharing")
            .field("weight", &self.weight)
            .field("builder", &self.builder.name())
            .finish()
    }
}

impl RewardSharing for NeighborSharing {
    fn adjust(&self, step: &StepContext<'_>) -> Result<RewardMap, ContractError> {
        let agents: Vec<AgentId> = step.raw_rewards.keys().copied().collect();
        let graph = self.builder.build(&GraphInputs {
            topology: step.topology,
            agents: &agents,
            orientations: step.orientations,
            observations: step.observations,
        })?;

        let mut adjusted = RewardMap::new();
        for (&agent, &own) in step.raw_rewards {
            let mut shared = 0.0;
            for neighbor in graph.neighbors(agent) {
                shared += reward_of(step.raw_rewards, neighbor)?;
            }
            trace!(%agent, own, shared, "neighbor share");
            adjusted.insert(agent, own + self.weight * shared);
        }
        Ok(adjusted)
    }

    fn name(&self) -> &str {
        "neighbor_weight"
    }
}
