//! gridshare - reward sharing for multi-agent traffic-light grids
//!
//! Post-processes the per-intersection rewards produced by a traffic
//! microsimulator before they are handed to a multi-agent RL trainer.
//! Supports plain pass-through, fixed-weight sharing with cardinal
//! neighbours and k-nearest-neighbour softmax sharing, plus the grid
//! topology, observation slicing, interaction graphs and TD(0) return
//! estimation those strategies are built on.

pub mod accumulator;
pub mod agent;
pub mod config;
pub mod error;
pub mod estimator;
pub mod graph;
pub mod observation;
pub mod shaper;
pub mod sharing;
pub mod topology;

pub use accumulator::EpisodeAccumulator;
pub use agent::{AgentId, RewardMap};
pub use config::{ConfigError, EnvKind, ExperimentConfig, GraphPolicy, SharingConfig, SharingPolicy};
pub use error::ContractError;
pub use estimator::{ExpectedReturnEstimator, IsolatedAgentPolicy, ValueFunction, ValueMap};
pub use graph::{FixedTopologyGraph, GraphBuilder, GraphError, InteractionGraph, LearnedGraph};
pub use observation::{ObservationMap, ObservationSanitizer};
pub use shaper::{RewardShaper, StepInputs};
pub use sharing::{KnnSoftmaxSharing, NeighborSharing, NoSharing, RewardSharing};
pub use topology::{Direction, GridTopology, Orientation, Orientations};

/// Identifier attached to one experiment run, used to correlate log records.
pub type RunId = String;

/// Generates a new unique run identifier (UUID v4).
pub fn generate_run_id() -> RunId {
    uuid::Uuid::new_v4().to_string()
}
