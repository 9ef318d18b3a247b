//! One-step bootstrapped expected returns over an interaction graph.
//!
//! For every agent `a` with neighbours `N(a)`:
//!
//! ```text
//! G(a) = r(a) + γ × mean_{n ∈ N(a)} V_n(s'_n)
//! ```

use std::collections::BTreeMap;

use tracing::warn;

use crate::agent::{AgentId, RewardMap};
use crate::config::ConfigError;
use crate::error::ContractError;
use crate::graph::InteractionGraph;
use crate::observation::ObservationMap;

/// Estimates the value of a state representation.
pub trait ValueFunction: Send + Sync {
    fn value(&self, state: &[f64]) -> f64;
}

impl<F> ValueFunction for F
where
    F: Fn(&[f64]) -> f64 + Send + Sync,
{
    fn value(&self, state: &[f64]) -> f64 {
        self(state)
    }
}

/// Value function of each agent.
pub type ValueMap = BTreeMap<AgentId, Box<dyn ValueFunction>>;

/// What to do with an agent that has no neighbours to bootstrap from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IsolatedAgentPolicy {
    /// Fail with [`ContractError::IsolatedAgent`].
    #[default]
    Reject,
    /// Use the immediate reward unchanged.
    PassThroughReward,
}

/// TD(0) expected-return estimator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExpectedReturnEstimator {
    gamma: f64,
    isolated: IsolatedAgentPolicy,
}

impl ExpectedReturnEstimator {
    pub const DEFAULT_GAMMA: f64 = 0.9;

    /// Creates an estimator with discount factor `gamma`.
    ///
    /// # Errors
    ///
    /// `InvalidGamma` unless `0 ≤ gamma ≤ 1`.
    pub fn new(gamma: f64) -> Result<Self, ConfigError> {
        if !(0.0..=1.0).contains(&gamma) {
            return Err(ConfigError::InvalidGamma(gamma));
        }
        Ok(Self {
            gamma,
            isolated: IsolatedAgentPolicy::default(),
        })
    }

    pub fn with_isolated_policy(mut self, policy: IsolatedAgentPolicy) -> Self {
        self.isolated = policy;
        self
    }

    pub fn gamma(&self) -> f64 {
        self.gamma
    }

    /// Computes the expected return of every agent in `rewards`.
    ///
    /// # Arguments
    ///
    /// * `graph` - Interaction graph; every rewarded agent must be a node
    /// * `next_states` - Resulting state of each agent
    /// * `rewards` - Immediate reward of each agent
    /// * `values` - Current value function of each agent
    ///
    /// # Errors
    ///
    /// - `Graph(UnknownAgent)` if a rewarded agent is not in the graph
    /// - `IsolatedAgent` for agents without neighbours under [`IsolatedAgentPolicy::Reject`]
    /// - `MissingNextState` / `MissingValueFunction` for incomplete neighbour data
    pub fn estimate(
        &self,
        graph: &InteractionGraph,
        next_states: &ObservationMap,
        rewards: &RewardMap,
        values: &ValueMap,
    ) -> Result<RewardMap, ContractError> {
        let mut returns = RewardMap::new();
        for (&agent, &reward) in rewards {
            let count = graph.neighbor_count(agent)?;
            if count == 0 {
                match self.isolated {
                    IsolatedAgentPolicy::Reject => return Err(ContractError::IsolatedAgent(agent)),
                    IsolatedAgentPolicy::PassThroughReward => {
                        warn!(%agent, "isolated agent, using immediate reward");
                        returns.insert(agent, reward);
                        continue;
                    }
                }
            }

            let mut total = 0.0;
            for neighbor in graph.neighbors(agent) {
                let state = next_states
                    .get(&neighbor)
                    .ok_or(ContractError::MissingNextState(neighbor))?;
                let value = values
                    .get(&neighbor)
                    .ok_or(ContractError::MissingValueFunction(neighbor))?;
                total += value.value(state);
            }
            returns.insert(agent, reward + self.gamma * total / count as f64);
        }
        Ok(returns)
    }
}

impl Default for ExpectedReturnEstimator {
    fn default() -> Self {
        Self {
            gamma: Self::DEFAULT_GAMMA,
            isolated: IsolatedAgentPolicy::default(),
        }
    }
}
