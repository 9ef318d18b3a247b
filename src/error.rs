use thiserror::Error;

use crate::agent::AgentId;
use crate::graph::GraphError;

/// Input handed over by the simulator does not match what this layer expects.
///
/// These indicate a mismatch between the reward-sharing setup and the
/// simulator's topology and are never recovered from.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ContractError {
    #[error("Agent name '{0}' does not follow the center<N> scheme")]
    MalformedAgentId(String),

    #[error("Agent {agent} lies outside a grid of {num_agents} intersections")]
    AgentOutOfGrid { agent: AgentId, num_agents: usize },

    #[error("Got orientation flags for {got} intersections, grid has {expected}")]
    OrientationCount { expected: usize, got: usize },

    #[error("No raw reward reported for agent {0}")]
    MissingReward(AgentId),

    #[error("Observation of length {len} is shorter than the {required} features required")]
    ObservationTooShort { len: usize, required: usize },

    #[error("No observation reported for agent {0}")]
    MissingObservation(AgentId),

    #[error("No next state reported for agent {0}")]
    MissingNextState(AgentId),

    #[error("No value function registered for agent {0}")]
    MissingValueFunction(AgentId),

    #[error("Agent {0} has no neighbours in the interaction graph")]
    IsolatedAgent(AgentId),

    #[error(transparent)]
    Graph(#[from] GraphError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_reward_display() {
        let e = ContractError::MissingReward(AgentId::new(3));
        assert_eq!(e.to_string(), "No raw reward reported for agent center3");
    }

    #[test]
    fn observation_too_short_display() {
        let e = ContractError::ObservationTooShort {
            len: 5,
            required: 20,
        };
        assert_eq!(
            e.to_string(),
            "Observation of length 5 is shorter than the 20 features required"
        );
    }

    #[test]
    fn orientation_count_display() {
        let e = ContractError::OrientationCount {
            expected: 4,
            got: 9,
        };
        assert_eq!(
            e.to_string(),
            "Got orientation flags for 9 intersections, grid has 4"
        );
    }

    #[test]
    fn graph_errors_convert() {
        let e: ContractError = GraphError::UnknownAgent(AgentId::new(1)).into();
        assert!(matches!(e, ContractError::Graph(_)));
        assert!(e.to_string().contains("center1"));
    }
}
