//! Reward-sharing strategies and their construction from configuration.

pub mod knn;
pub mod neighbor;
pub mod none;
pub mod trait_;

pub use knn::{knn_importance, KnnSoftmaxSharing, NeighborImportance};
pub use neighbor::NeighborSharing;
pub use none::NoSharing;
pub use trait_::{RewardSharing, StepContext};

use tracing::info;

use crate::config::{ConfigError, GraphPolicy, SharingConfig, SharingPolicy};

/// Builds the strategy selected by `config`, validating it first.
pub fn from_config(config: &SharingConfig) -> Result<Box<dyn RewardSharing>, ConfigError> {
    config.validate()?;
    let strategy: Box<dyn RewardSharing> = match config.policy {
        SharingPolicy::None => Box::new(NoSharing),
        SharingPolicy::NeighborWeight => match config.graph {
            GraphPolicy::FixedTopology => Box::new(NeighborSharing::new(config.neighbor_weight)?),
            GraphPolicy::Learned => return Err(ConfigError::UnsupportedGraphPolicy(config.graph)),
        },
        SharingPolicy::KnnSoftmax => Box::new(KnnSoftmaxSharing::new(
            config.k_nearest_neighbor,
            config.temperature_factor,
        )?),
    };
    info!(
        strategy = strategy.name(),
        neighbor_weight = config.neighbor_weight,
        k = config.k_nearest_neighbor,
        temperature = config.temperature_factor,
        "reward sharing strategy configured"
    );
    Ok(strategy)
}
