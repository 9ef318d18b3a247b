use petgraph::graphmap::DiGraphMap;
use petgraph::Direction as EdgeDirection;

use super::error::GraphError;
use crate::agent::AgentId;

/// Directed graph of agent interactions.
///
/// An edge `a → n` means agent `a` consults neighbour `n`. Neighbours are
/// returned in the order their edges were added.
///
/// # Invariants
///
/// - Every agent the graph was built for is a node, even when isolated
/// - At most one edge exists between an ordered pair of agents
#[derive(Debug, Clone, Default)]
pub struct InteractionGraph {
    graph: DiGraphMap<AgentId, ()>,
}

impl InteractionGraph {
    pub fn new() -> Self {
        Self {
            graph: DiGraphMap::new(),
        }
    }

    /// Builds a graph from `(agent, neighbours)` adjacency lists.
    pub fn from_adjacency<I, N>(adjacency: I) -> Self
    where
        I: IntoIterator<Item = (AgentId, N)>,
        N: IntoIterator<Item = AgentId>,
    {
        let mut graph = Self::new();
        for (agent, neighbors) in adjacency {
            graph.add_agent(agent);
            for neighbor in neighbors {
                graph.add_neighbor(agent, neighbor);
            }
        }
        graph
    }

    /// Adds an agent with no neighbours. Re-adding is a no-op.
    pub fn add_agent(&mut self, agent: AgentId) {
        self.graph.add_node(agent);
    }

    /// Records that `agent` consults `neighbor`, adding either node if needed.
    pub fn add_neighbor(&mut self, agent: AgentId, neighbor: AgentId) {
        self.graph.add_edge(agent, neighbor, ());
    }

    pub fn contains_agent(&self, agent: AgentId) -> bool {
        self.graph.contains_node(agent)
    }

    /// Neighbours of `agent` in insertion order.
    ///
    /// Unknown agents yield an empty iterator.
    pub fn neighbors(&self, agent: AgentId) -> impl Iterator<Item = AgentId> + '_ {
        self.graph
            .neighbors_directed(agent, EdgeDirection::Outgoing)
    }

    /// Number of neighbours of a known agent.
    pub fn neighbor_count(&self, agent: AgentId) -> Result<usize, GraphError> {
        if !self.contains_agent(agent) {
            return Err(GraphError::UnknownAgent(agent));
        }
        Ok(self.neighbors(agent).count())
    }

    /// All agents in the graph.
    pub fn agents(&self) -> impl Iterator<Item = AgentId> + '_ {
        self.graph.nodes()
    }

    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }
}
