//! Per-timestep reward callback.
//!
//! The simulator calls [`RewardShaper::compute_reward`] once per timestep
//! with the raw reward of every controlled intersection. The shaper returns
//! the adjusted rewards handed to the trainer and adds the raw total to the
//! caller's [`EpisodeAccumulator`].

use std::fmt;

use tracing::{debug, info};

use crate::accumulator::EpisodeAccumulator;
use crate::agent::{reward_sum, AgentId, RewardMap};
use crate::config::{ConfigError, SharingConfig};
use crate::error::ContractError;
use crate::graph::{FixedTopologyGraph, GraphBuilder, GraphInputs, InteractionGraph};
use crate::observation::{ObservationMap, ObservationSanitizer};
use crate::sharing::{self, RewardSharing, StepContext};
use crate::topology::{GridTopology, Orientation, Orientations};


/// Optional per-timestep inputs beyond the raw rewards.
#[derive(Debug, Clone, Copy, Default)]
pub struct StepInputs<'a> {
    /// Current orientation flags; the shaper's defaults are used when absent.
    pub orientations: Option<&'a Orientations>,
    pub observations: Option<&'a ObservationMap>,
}

/// Reward-sharing environment layer for one grid.
///
/// # Lifecycle
///
/// 1. Create with [`RewardShaper::new`]; configuration errors surface here.
/// 2. At each episode start call [`EpisodeAccumulator::reset`].
/// 3. Call [`RewardShaper::compute_reward`] once per timestep.
/// 4. Read [`EpisodeAccumulator::total`] at episode end.
pub struct RewardShaper {
    topology: GridTopology,
    orientations: Orientations,
    sanitizer: ObservationSanitizer,
    strategy: Box<dyn RewardSharing>,
}

impl RewardShaper {
    /// Creates a shaper for `topology` using the strategy selected by `config`.
    ///
    /// All intersections start out vertically oriented until flags are
    /// supplied.
    pub fn new(topology: GridTopology, config: &SharingConfig) -> Result<Self, ConfigError> {
        let strategy = sharing::from_config(config)?;
        info!(
            grid = %topology,
            strategy = strategy.name(),
            "reward shaper created"
        );
        Ok(Self {
            orientations: Orientations::uniform(&topology, Orientation::Vertical),
            sanitizer: ObservationSanitizer::new(config.num_local_lights, config.num_local_edges),
            topology,
            strategy,
        })
    }

    /// Creates a shaper around an already-built strategy.
    pub fn with_strategy(topology: GridTopology, strategy: Box<dyn RewardSharing>) -> Self {
        Self {
            orientations: Orientations::uniform(&topology, Orientation::Vertical),
            sanitizer: ObservationSanitizer::default(),
            topology,
            strategy,
        }
    }

    /// Replaces the default orientation flags.
    pub fn set_orientations(&mut self, orientations: Orientations) -> Result<(), ConfigError> {
        if orientations.len() != self.topology.num_agents() {
            return Err(ConfigError::OrientationCount {
                expected: self.topology.num_agents(),
                got: orientations.len(),
            });
        }
        self.orientations = orientations;
        Ok(())
    }

    pub fn topology(&self) -> &GridTopology {
        &self.topology
    }

    pub fn orientations(&self) -> &Orientations {
        &self.orientations
    }

    pub fn strategy_name(&self) -> &str {
        self.strategy.name()
    }

    /// Adjusts one timestep's raw rewards using the stored orientations.
    pub fn compute_reward(
        &self,
        raw_rewards: &RewardMap,
        accumulator: &mut EpisodeAccumulator,
    ) -> Result<RewardMap, ContractError> {
        self.compute_reward_with(raw_rewards, StepInputs::default(), accumulator)
    }

    /// Adjusts one timestep's raw rewards.
    ///
    /// The adjusted map has the same keys as `raw_rewards`. The raw total is
    /// only added to `accumulator` when the adjustment succeeds.
    ///
    /// # Errors
    ///
    /// Any [`ContractError`] raised by the strategy, `AgentOutOfGrid` if a
    /// rewarded agent is not part of the grid, or `OrientationCount` if the
    /// supplied flags were built for a different grid.
    pub fn compute_reward_with(
        &self,
        raw_rewards: &RewardMap,
        inputs: StepInputs<'_>,
        accumulator: &mut EpisodeAccumulator,
    ) -> Result<RewardMap, ContractError> {
        for &agent in raw_rewards.keys() {
            self.topology.check(agent)?;
        }
        let orientations = self.step_orientations(inputs.orientations)?;
        let adjusted = self.strategy.adjust(&StepContext {
            topology: &self.topology,
            raw_rewards,
            orientations,
            observations: inputs.observations,
        })?;

        let raw_sum = reward_sum(raw_rewards);
        accumulator.record(raw_sum);
        debug!(
            agents = raw_rewards.len(),
            raw_sum,
            adjusted_sum = reward_sum(&adjusted),
            episode_total = accumulator.total(),
            "rewards adjusted"
        );
        Ok(adjusted)
    }

    fn step_orientations<'a>(
        &'a self,
        supplied: Option<&'a Orientations>,
    ) -> Result<&'a Orientations, ContractError> {
        let Some(orientations) = supplied else {
            return Ok(&self.orientations);
        };
        if orientations.len() != self.topology.num_agents() {
            return Err(ContractError::OrientationCount {
                expected: self.topology.num_agents(),
                got: orientations.len(),
            });
        }
        Ok(orientations)
    }

    /// Cardinal-neighbour interaction graph for the given agents.
    pub fn interaction_graph(
        &self,
        agents: &[AgentId],
        orientations: Option<&Orientations>,
    ) -> Result<InteractionGraph, ContractError> {
        FixedTopologyGraph.build(&GraphInputs {
            topology: &self.topology,
            agents,
            orientations: self.step_orientations(orientations)?,
            observations: None,
        })
    }

    /// Edge density/velocity features of every observation.
    pub fn sanitize_observations(
        &self,
        observations: &ObservationMap,
    ) -> Result<ObservationMap, ContractError> {
        self.sanitizer.sanitize_all(observations)
    }
}

impl fmt::Debug for RewardShaper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RewardShaper")
            .field("topology", &self.topology)
            .field("strategy", &self.strategy.name())
            .finish()
    }
}
