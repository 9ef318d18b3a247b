//! Per-intersection orientation flags.

use std::fmt;

use super::grid::{Direction, GridTopology};
use crate::agent::AgentId;
use crate::config::ConfigError;
use crate::error::ContractError;

/// Which axis an intersection pairs with for reward sharing.
///
/// The simulator reports this as an integer flag: `0` pairs the
/// intersection with its top and bottom neighbours, any other value with
/// its left and right neighbours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    Vertical,
    Horizontal,
}

impl Orientation {
    /// Decodes a simulator flag.
    ///
    /// # Errors
    ///
    /// `InvalidOrientationFlag` for negative flags.
    pub fn from_flag(flag: i64) -> Result<Self, ConfigError> {
        match flag {
            0 => Ok(Orientation::Vertical),
            f if f > 0 => Ok(Orientation::Horizontal),
            f => Err(ConfigError::InvalidOrientationFlag(f)),
        }
    }

    pub fn flag(&self) -> i64 {
        match self {
            Orientation::Vertical => 0,
            Orientation::Horizontal => 1,
        }
    }

    /// The two directions an intersection with this orientation shares along.
    pub fn sharing_directions(&self) -> [Direction; 2] {
        match self {
            Orientation::Vertical => [Direction::Top, Direction::Bottom],
            Orientation::Horizontal => [Direction::Left, Direction::Right],
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Orientation::Vertical => write!(f, "vertical"),
            Orientation::Horizontal => write!(f, "horizontal"),
        }
    }
}

/// Orientation of every intersection, indexed by flat grid index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Orientations(Vec<Orientation>);

impl Orientations {
    /// Creates orientations for a grid, checking one entry per intersection.
    pub fn new(topology: &GridTopology, values: Vec<Orientation>) -> Result<Self, ConfigError> {
        if values.len() != topology.num_agents() {
            return Err(ConfigError::OrientationCount {
                expected: topology.num_agents(),
                got: values.len(),
            });
        }
        Ok(Self(values))
    }

    /// Every intersection shares along the same axis.
    pub fn uniform(topology: &GridTopology, orientation: Orientation) -> Self {
        Self(vec![orientation; topology.num_agents()])
    }

    /// Decodes the simulator's flattened direction flags.
    pub fn from_flags(topology: &GridTopology, flags: &[i64]) -> Result<Self, ConfigError> {
        let values = flags
            .iter()
            .map(|&f| Orientation::from_flag(f))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(topology, values)
    }

    pub fn get(&self, agent: AgentId) -> Result<Orientation, ContractError> {
        self.0
            .get(agent.index())
            .copied()
            .ok_or(ContractError::AgentOutOfGrid {
                agent,
                num_agents: self.0.len(),
            })
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn flags(&self) -> Vec<i64> {
        self.0.iter().map(Orientation::flag).collect()
    }
}
