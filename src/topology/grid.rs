//! Row-major grid of intersections and neighbour arithmetic.

use std::fmt;

use crate::agent::AgentId;
use crate::config::ConfigError;
use crate::error::ContractError;

/// Cardinal direction from one intersection to an adjacent one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Top,
    Bottom,
    Left,
    Right,
}

impl Direction {
    /// Returns all directions in order.
    pub fn all() -> [Direction; 4] {
        [
            Direction::Top,
            Direction::Bottom,
            Direction::Left,
            Direction::Right,
        ]
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Top => write!(f, "top"),
            Direction::Bottom => write!(f, "bottom"),
            Direction::Left => write!(f, "left"),
            Direction::Right => write!(f, "right"),
        }
    }
}

/// A `rows × cols` grid of controlled intersections.
///
/// Agent `i` sits at row `i / cols`, column `i % cols`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridTopology {
    rows: usize,
    cols: usize,
}

impl GridTopology {
    /// Creates a grid topology.
    ///
    /// # Errors
    ///
    /// `ZeroGridDimension` if either extent is zero.
    pub fn new(rows: usize, cols: usize) -> Result<Self, ConfigError> {
        if rows == 0 || cols == 0 {
            return Err(ConfigError::ZeroGridDimension { rows, cols });
        }
        Ok(Self { rows, cols })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of intersections in the grid.
    pub fn num_agents(&self) -> usize {
        self.rows * self.cols
    }

    /// Iterates over every agent in row-major order.
    pub fn agents(&self) -> impl DoubleEndedIterator<Item = AgentId> {
        (0..self.num_agents()).map(AgentId::new)
    }

    pub fn contains(&self, agent: AgentId) -> bool {
        agent.index() < self.num_agents()
    }

    /// Fails if `agent` does not belong to this grid.
    pub fn check(&self, agent: AgentId) -> Result<(), ContractError> {
        if self.contains(agent) {
            Ok(())
        } else {
            Err(ContractError::AgentOutOfGrid {
                agent,
                num_agents: self.num_agents(),
            })
        }
    }

    pub fn row_of(&self, agent: AgentId) -> usize {
        agent.index() / self.cols
    }

    pub fn col_of(&self, agent: AgentId) -> usize {
        agent.index() % self.cols
    }

    /// Returns the adjacent agent in `direction`, or `None` at the grid boundary.
    ///
    /// Top is the previous row (`i - cols`), bottom the next row (`i + cols`).
    pub fn neighbor(&self, agent: AgentId, direction: Direction) -> Option<AgentId> {
        if !self.contains(agent) {
            return None;
        }
        let i = agent.index();
        let row = self.row_of(agent);
        let col = self.col_of(agent);
        let index = match direction {
            Direction::Top if row > 0 => i - self.cols,
            Direction::Bottom if row + 1 < self.rows => i + self.cols,
            Direction::Left if col > 0 => i - 1,
            Direction::Right if col + 1 < self.cols => i + 1,
            _ => return None,
        };
        Some(AgentId::new(index))
    }

    /// Manhattan distance between two intersections.
    pub fn distance(&self, a: AgentId, b: AgentId) -> usize {
        self.row_of(a).abs_diff(self.row_of(b)) + self.col_of(a).abs_diff(self.col_of(b))
    }
}

impl fmt::Display for GridTopology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.rows, self.cols)
    }
}
