//! Running total of raw rewards over one episode.
//!
//! The total is reported as a custom metric at the end of each episode so
//! that runs with different sharing strategies can be compared on the same
//! unshaped scale.

/// Sum of all raw (pre-sharing) rewards since the last [`reset`](Self::reset).
///
/// Owned by exactly one environment instance and passed explicitly into
/// each reward computation.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EpisodeAccumulator {
    total: f64,
    steps: u64,
}

impl EpisodeAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new episode.
    pub fn reset(&mut self) {
        self.total = 0.0;
        self.steps = 0;
    }

    /// Adds the raw-reward sum of one timestep.
    pub fn record(&mut self, raw_sum: f64) {
        self.total += raw_sum;
        self.steps += 1;
    }

    /// Raw-reward total of the current episode.
    pub fn total(&self) -> f64 {
        self.total
    }

    /// Timesteps recorded in the current episode.
    pub fn steps(&self) -> u64 {
        self.steps
    }
}
