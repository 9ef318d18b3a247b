use thiserror::Error;

use crate::agent::AgentId;

/// Errors raised while building or querying an interaction graph.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("Graph construction '{0}' is not supported")]
    NotSupported(&'static str),

    #[error("Agent {0} is not part of the interaction graph")]
    UnknownAgent(AgentId),
}
