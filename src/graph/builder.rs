//! Strategies for constructing interaction graphs.

use tracing::trace;

use super::error::GraphError;
use super::interaction::InteractionGraph;
use crate::agent::AgentId;
use crate::error::ContractError;
use crate::observation::{ObservationMap, ObservationSanitizer};
use crate::topology::{GridTopology, Orientations};

/// Everything a builder may consult for one timestep.
#[derive(Debug, Clone, Copy)]
pub struct GraphInputs<'a> {
    pub topology: &'a GridTopology,
    /// Agents that reported a reward this timestep, in grid order.
    pub agents: &'a [AgentId],
    pub orientations: &'a Orientations,
    pub observations: Option<&'a ObservationMap>,
}

/// Builds an interaction graph from the current timestep's inputs.
pub trait GraphBuilder: Send + Sync {
    /// Builds the graph containing every agent in `inputs.agents`.
    fn build(&self, inputs: &GraphInputs<'_>) -> Result<InteractionGraph, ContractError>;

    /// Returns a human-readable name for this builder.
    fn name(&self) -> &str;
}

/// Links every agent to the (up to two) cardinal neighbours along its
/// orientation axis. Grid boundaries simply drop the missing neighbour.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedTopologyGraph;

impl GraphBuilder for FixedTopologyGraph {
    fn build(&self, inputs: &GraphInputs<'_>) -> Result<InteractionGraph, ContractError> {
        let mut graph = InteractionGraph::new();
        for &agent in inputs.agents {
            inputs.topology.check(agent)?;
            graph.add_agent(agent);
            let orientation = inputs.orientations.get(agent)?;
            for direction in orientation.sharing_directions() {
                if let Some(neighbor) = inputs.topology.neighbor(agent, direction) {
                    graph.add_neighbor(agent, neighbor);
                }
            }
        }
        trace!(
            agents = graph.len(),
            edges = graph.edge_count(),
            "built fixed-topology interaction graph"
        );
        Ok(graph)
    }

    fn name(&self) -> &str {
        "fixed-topology"
    }
}

/// Graph derived from sanitized density/velocity observations.
///
/// No construction rule is defined for this yet. The builder checks that
/// every agent supplied a well-formed observation and then reports
/// [`GraphError::NotSupported`].
#[derive(Debug, Clone, Copy, Default)]
pub struct LearnedGraph {
    sanitizer: ObservationSanitizer,
}

impl LearnedGraph {
    pub fn new(sanitizer: ObservationSanitizer) -> Self {
        Self { sanitizer }
    }
}

impl GraphBuilder for LearnedGraph {
    fn build(&self, inputs: &GraphInputs<'_>) -> Result<InteractionGraph, ContractError> {
        let observations = inputs
            .observations
            .ok_or(GraphError::NotSupported("learned graph without observations"))?;
        for &agent in inputs.agents {
            let obs = observations
                .get(&agent)
                .ok_or(ContractError::MissingObservation(agent))?;
            self.sanitizer.sanitize(obs)?;
        }
        Err(GraphError::NotSupported("learned").into())
    }

    fn name(&self) -> &str {
        "learned"
    }
}
