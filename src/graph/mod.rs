//! Interaction graphs between agents.
//!
//! An interaction graph maps each agent to the ordered set of agents whose
//! rewards or values it consults. Graphs are rebuilt every timestep by a
//! [`GraphBuilder`].

pub mod builder;
pub mod error;
pub mod interaction;

pub use builder::{FixedTopologyGraph, GraphBuilder, GraphInputs, LearnedGraph};
pub use error::GraphError;
pub use interaction::InteractionGraph;
