//! Observation slicing for interaction-graph construction.
//!
//! A per-agent observation ends with the local edge features followed by
//! the traffic-light phase encodings:
//!
//! ```text
//! [ ... ] ++ [edge densities and velocities (2 × E)] ++ [light phases (3 × L)]
//! ```
//!
//! Only the edge block is relevant for building interaction graphs.

use std::collections::BTreeMap;

use crate::agent::AgentId;
use crate::error::ContractError;

/// Raw per-agent observation vectors.
pub type ObservationMap = BTreeMap<AgentId, Vec<f64>>;

/// Number of features encoding one traffic light's phase.
pub const LIGHT_FEATURE_DIM: usize = 3;

/// Number of features describing one local edge (density, mean velocity).
pub const EDGE_FEATURE_DIM: usize = 2;

/// Extracts the local edge density/velocity block from observations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObservationSanitizer {
    num_traffic_lights: usize,
    num_edges: usize,
}

impl ObservationSanitizer {
    pub fn new(num_traffic_lights: usize, num_edges: usize) -> Self {
        Self {
            num_traffic_lights,
            num_edges,
        }
    }

    /// Length of the slice returned by [`sanitize`](Self::sanitize).
    pub fn feature_dim(&self) -> usize {
        EDGE_FEATURE_DIM * self.num_edges
    }

    /// Minimum observation length the sanitizer accepts.
    pub fn required_len(&self) -> usize {
        self.feature_dim() + LIGHT_FEATURE_DIM * self.num_traffic_lights
    }

    /// Returns the edge feature block of one observation.
    ///
    /// # Errors
    ///
    /// `ObservationTooShort` if the observation cannot hold the edge and
    /// light blocks.
    pub fn sanitize<'a>(&self, observation: &'a [f64]) -> Result<&'a [f64], ContractError> {
        let len = observation.len();
        let required = self.required_len();
        if len < required {
            return Err(ContractError::ObservationTooShort { len, required });
        }
        let start = len - required;
        let end = len - LIGHT_FEATURE_DIM * self.num_traffic_lights;
        Ok(&observation[start..end])
    }

    /// Sanitizes every observation in the map.
    pub fn sanitize_all(&self, observations: &ObservationMap) -> Result<ObservationMap, ContractError> {
        observations
            .iter()
            .map(|(agent, obs)| Ok((*agent, self.sanitize(obs)?.to_vec())))
            .collect()
    }
}

impl Default for ObservationSanitizer {
    fn default() -> Self {
        Self::new(4, 4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slices_edge_block() {
        let sanitizer = ObservationSanitizer::new(1, 2);
        // 2 leading features, 4 edge features, 3 light features
        let obs: Vec<f64> = (0..9).map(|x| x as f64).collect();
        let edges = sanitizer.sanitize(&obs).unwrap();
        assert_eq!(edges, &[2.0, 3.0, 4.0, 5.0]);
    }

    #[test]
    fn exact_length_is_accepted() {
        let sanitizer = ObservationSanitizer::default();
        let obs = vec![1.0; sanitizer.required_len()];
        assert_eq!(sanitizer.sanitize(&obs).unwrap().len(), 8);
    }

    #[test]
    fn short_observation_fails() {
        let sanitizer = ObservationSanitizer::default();
        let obs = vec![0.0; 10];
        assert_eq!(
            sanitizer.sanitize(&obs),
            Err(ContractError::ObservationTooShort {
                len: 10,
                required: 20
            })
        );
    }

    #[test]
    fn sanitize_all_keeps_keys() {
        let sanitizer = ObservationSanitizer::new(0, 1);
        let mut map = ObservationMap::new();
        map.insert(AgentId::new(0), vec![9.0, 1.0, 2.0]);
        map.insert(AgentId::new(1), vec![3.0, 4.0]);
        let out = sanitizer.sanitize_all(&map).unwrap();
        assert_eq!(out[&AgentId::new(0)], vec![1.0, 2.0]);
        assert_eq!(out[&AgentId::new(1)], vec![3.0, 4.0]);
    }
}
