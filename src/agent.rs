//! Agent identifiers and per-agent reward maps.
//!
//! The simulator names each controlled intersection `center<N>`, where `N`
//! is the intersection's flat row-major index in the grid.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::ContractError;

/// Prefix the simulator uses for every traffic-light agent.
pub const AGENT_PREFIX: &str = "center";

/// Identifier of one controlled intersection.
///
/// Ordering follows the flat grid index, so maps keyed by `AgentId`
/// iterate in row-major order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AgentId(usize);

impl AgentId {
    /// Creates an identifier from a flat grid index.
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    /// Flat row-major index of this agent.
    pub fn index(&self) -> usize {
        self.0
    }

    /// Parses a simulator name such as `center7`.
    pub fn parse(name: &str) -> Result<Self, ContractError> {
        name.strip_prefix(AGENT_PREFIX)
            .and_then(|suffix| suffix.parse::<usize>().ok())
            .map(Self)
            .ok_or_else(|| ContractError::MalformedAgentId(name.to_string()))
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", AGENT_PREFIX, self.0)
    }
}

impl FromStr for AgentId {
    type Err = ContractError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<usize> for AgentId {
    fn from(index: usize) -> Self {
        Self(index)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for AgentId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for AgentId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = <String as serde::Deserialize>::deserialize(deserializer)?;
        Self::parse(&name).map_err(serde::de::Error::custom)
    }
}

/// Per-agent scalar rewards for a single timestep.
pub type RewardMap = BTreeMap<AgentId, f64>;

/// Builds a reward map from simulator names.
///
/// # Errors
///
/// `MalformedAgentId` if any name does not follow the `center<N>` scheme.
pub fn reward_map_from_names<'a, I>(entries: I) -> Result<RewardMap, ContractError>
where
    I: IntoIterator<Item = (&'a str, f64)>,
{
    entries
        .into_iter()
        .map(|(name, reward)| Ok((AgentId::parse(name)?, reward)))
        .collect()
}

/// Sum of all rewards in the map.
pub fn reward_sum(rewards: &RewardMap) -> f64 {
    rewards.values().sum()
}

/// Looks up the reward of `agent`, failing if the simulator did not report one.
pub fn reward_of(rewards: &RewardMap, agent: AgentId) -> Result<f64, ContractError> {
    rewards
        .get(&agent)
        .copied()
        .ok_or(ContractError::MissingReward(agent))
}
