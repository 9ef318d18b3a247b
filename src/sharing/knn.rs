//! k-nearest-neighbour softmax sharing.
//!
//! Every agent's adjusted reward is a weighted average of the raw rewards of
//! the `k` agents closest to it on the grid (itself included, at distance
//! zero). Weights are a softmax over negative Manhattan distances:
//!
//! ```text
//! w(n) = exp(-d(a, n) / τ) / Σ_{m ∈ selected} exp(-d(a, m) / τ)
//! adjusted[a] = Σ_{n ∈ selected} raw[n] × w(n)
//! ```

use tracing::trace;

use super::trait_::{RewardSharing, StepContext};
use crate::agent::{AgentId, RewardMap};
use crate::config::{validate_knn, ConfigError};
use crate::error::ContractError;
use crate::topology::GridTopology;

/// Selected agents with their softmax weights, in selection order.
pub type NeighborImportance = Vec<(AgentId, f64)>;

/// Selects the `k` agents nearest to `target` and weights them.
///
/// Candidates are scanned in the order given. Once `k` agents are held, a
/// candidate replaces the least important held agent only when it is
/// strictly closer; among equally unimportant held agents the earliest
/// inserted one is evicted. The replacement is appended at the end.
///
/// With `k == 0` the selection is empty. `temperature` must be positive.
pub fn knn_importance<I>(
    target: AgentId,
    candidates: I,
    topology: &GridTopology,
    k: usize,
    temperature: f64,
) -> Result<NeighborImportance, ContractError>
where
    I: IntoIterator<Item = AgentId>,
{
    topology.check(target)?;
    let mut selected: NeighborImportance = Vec::with_capacity(k);

    for agent in candidates {
        topology.check(agent)?;
        let score = -(topology.distance(agent, target) as f64);
        if selected.len() < k {
            selected.push((agent, score));
            continue;
        }
        let weakest = selected
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| a.1.total_cmp(&b.1))
            .map(|(pos, &(_, s))| (pos, s));
        if let Some((pos, weakest_score)) = weakest {
            if score > weakest_score {
                selected.remove(pos);
                selected.push((agent, score));
            }
        }
    }

    // Shift by the best score so the largest exponent is exp(0).
    let best = selected
        .iter()
        .map(|&(_, s)| s)
        .fold(f64::NEG_INFINITY, f64::max);
    let mut normalizer = 0.0;
    for (_, s) in selected.iter_mut() {
        *s = ((*s - best) / temperature).exp();
        normalizer += *s;
    }
    for (_, w) in selected.iter_mut() {
        *w /= normalizer;
    }

    trace!(%target, selected = selected.len(), "knn importance");
    Ok(selected)
}

/// Colight-style sharing over the `k` nearest agents.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KnnSoftmaxSharing {
    k: usize,
    temperature: f64,
}

impl KnnSoftmaxSharing {
    /// Creates k-NN softmax sharing.
    ///
    /// # Errors
    ///
    /// - `ZeroNeighborCount` if `k == 0`
    /// - `InvalidTemperature` if `temperature` is not a finite positive number
    pub fn new(k: usize, temperature: f64) -> Result<Self, ConfigError> {
        validate_knn(k, temperature)?;
        Ok(Self { k, temperature })
    }

    pub fn k(&self) -> usize {
        self.k
    }

    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    /// Neighbour weights for one agent given the agents reporting rewards.
    pub fn importance(
        &self,
        target: AgentId,
        raw_rewards: &RewardMap,
        topology: &GridTopology,
    ) -> Result<NeighborImportance, ContractError> {
        knn_importance(
            target,
            raw_rewards.keys().copied(),
            topology,
            self.k,
            self.temperature,
        )
    }
}

impl RewardSharing for KnnSoftmaxSharing {
    fn adjust(&self, step: &StepContext<'_>) -> Result<RewardMap, ContractError> {
        let mut adjusted = RewardMap::new();
        for &agent in step.raw_rewards.keys() {
            let importance = self.importance(agent, step.raw_rewards, step.topology)?;
            let reward: f64 = importance
                .iter()
                .map(|(neighbor, weight)| step.raw_rewards[neighbor] * weight)
                .sum();
            adjusted.insert(agent, reward);
        }
        Ok(adjusted)
    }

    fn name(&self) -> &str {
        "knn_softmax"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::{Orientation, Orientations};

    fn id(i: usize) -> AgentId {
        AgentId::new(i)
    }

    fn grid(rows: usize, cols: usize) -> GridTopology {
        GridTopology::new(rows, cols).unwrap()
    }

    fn weight_of(importance: &NeighborImportance, agent: AgentId) -> f64 {
        importance
            .iter()
            .find(|(a, _)| *a == agent)
            .map(|(_, w)| *w)
            .unwrap()
    }

    #[test]
    fn weights_sum_to_one() {
        let g = grid(4, 5);
        for k in [1, 3, 7, 20, 50] {
            for tau in [0.05, 0.5, 1.0, 10.0] {
                for target in g.agents() {
                    let imp = knn_importance(target, g.agents(), &g, k, tau).unwrap();
                    let total: f64 = imp.iter().map(|(_, w)| w).sum();
                    assert!((total - 1.0).abs() < 1e-9);
                    assert!(imp.iter().all(|(_, w)| *w >= 0.0));
                }
            }
        }
    }

    #[test]
    fn selection_size_is_min_of_k_and_agents() {
        let g = grid(3, 3);
        for k in 1..=12 {
            let imp = knn_importance(id(4), g.agents(), &g, k, 0.5).unwrap();
            assert_eq!(imp.len(), k.min(9));
        }
    }

    #[test]
    fn self_is_always_selected() {
        let g = grid(3, 3);
        let imp = knn_importance(id(8), g.agents(), &g, 1, 0.5).unwrap();
        assert_eq!(imp, vec![(id(8), 1.0)]);
    }

    #[test]
    fn closer_agents_weigh_more() {
        let g = grid(3, 3);
        let imp = knn_importance(id(0), g.agents(), &g, 9, 0.7).unwrap();
        let self_w = weight_of(&imp, id(0));
        let d1 = weight_of(&imp, id(1));
        let d2 = weight_of(&imp, id(2));
        let d4 = weight_of(&imp, id(8));
        assert!(self_w > d1);
        assert!(d1 > d2);
        assert!(d2 > d4);
        assert!((d1 - weight_of(&imp, id(3))).abs() < 1e-12);
    }

    #[test]
    fn softmax_matches_closed_form() {
        // 1x3 grid, target at the left end: distances 0, 1, 2
        let g = grid(1, 3);
        let tau = 0.5;
        let imp = knn_importance(id(0), g.agents(), &g, 3, tau).unwrap();
        let e: Vec<f64> = [0.0, -1.0, -2.0].iter().map(|s: &f64| (s / tau).exp()).collect();
        let z: f64 = e.iter().sum();
        for (i, expected) in e.iter().enumerate() {
            assert!((weight_of(&imp, id(i)) - expected / z).abs() < 1e-12);
        }
    }

    #[test]
    fn high_temperature_approaches_uniform() {
        let g = grid(1, 3);
        let imp = knn_importance(id(0), g.agents(), &g, 3, 1e6).unwrap();
        for (_, w) in imp {
            assert!((w - 1.0 / 3.0).abs() < 1e-5);
        }
    }

    #[test]
    fn tiny_temperature_concentrates_on_self() {
        let g = grid(3, 3);
        let imp = knn_importance(id(4), g.agents(), &g, 5, 1e-3).unwrap();
        assert!((weight_of(&imp, id(4)) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn ties_keep_first_seen() {
        // Target 4 in a 3x3 grid, k=3. Scan order 0..9:
        // 0(d2), 1(d1), 2(d2) fill; 3(d1) evicts 0; 4(d0) evicts 2;
        // 5(d1) ties with the weakest held (1, d1) and is not taken.
        let g = grid(3, 3);
        let imp = knn_importance(id(4), g.agents(), &g, 3, 0.5).unwrap();
        let order: Vec<AgentId> = imp.iter().map(|(a, _)| *a).collect();
        assert_eq!(order, vec![id(1), id(3), id(4)]);
    }

    #[test]
    fn scan_order_decides_ties() {
        let g = grid(3, 3);
        let reversed: Vec<AgentId> = g.agents().rev().collect();
        let imp = knn_importance(id(4), reversed, &g, 3, 0.5).unwrap();
        let order: Vec<AgentId> = imp.iter().map(|(a, _)| *a).collect();
        assert_eq!(order, vec![id(7), id(5), id(4)]);
    }

    #[test]
    fn zero_k_selects_nothing() {
        let g = grid(2, 2);
        assert!(knn_importance(id(0), g.agents(), &g, 0, 0.5)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn candidate_outside_grid_fails() {
        let g = grid(2, 2);
        assert!(matches!(
            knn_importance(id(0), [id(0), id(9)], &g, 2, 0.5),
            Err(ContractError::AgentOutOfGrid { .. })
        ));
    }

    #[test]
    fn adjusted_reward_is_weighted_average() {
        let g = grid(1, 2);
        let orientations = Orientations::uniform(&g, Orientation::Horizontal);
        let raw: RewardMap = [(id(0), 1.0), (id(1), 3.0)].into_iter().collect();
        let sharing = KnnSoftmaxSharing::new(2, 1.0).unwrap();
        let adjusted = sharing
            .adjust(&StepContext {
                topology: &g,
                raw_rewards: &raw,
                orientations: &orientations,
                observations: None,
            })
            .unwrap();
        let w_self = 1.0 / (1.0 + (-1.0f64).exp());
        let w_other = 1.0 - w_self;
        assert!((adjusted[&id(0)] - (1.0 * w_self + 3.0 * w_other)).abs() < 1e-12);
        assert!((adjusted[&id(1)] - (3.0 * w_self + 1.0 * w_other)).abs() < 1e-12);
    }

    #[test]
    fn k_one_is_identity() {
        let g = grid(2, 3);
        let orientations = Orientations::uniform(&g, Orientation::Vertical);
        let raw: RewardMap = g.agents().map(|a| (a, a.index() as f64 - 2.0)).collect();
        let sharing = KnnSoftmaxSharing::new(1, 0.5).unwrap();
        let adjusted = sharing
            .adjust(&StepContext {
                topology: &g,
                raw_rewards: &raw,
                orientations: &orientations,
                observations: None,
            })
            .unwrap();
        for (agent, r) in &raw {
            assert!((adjusted[agent] - r).abs() < 1e-12);
        }
    }

    #[test]
    fn invalid_parameters_rejected() {
        assert_eq!(
            KnnSoftmaxSharing::new(0, 0.5),
            Err(ConfigError::ZeroNeighborCount)
        );
        assert_eq!(
            KnnSoftmaxSharing::new(3, 0.0),
            Err(ConfigError::InvalidTemperature(0.0))
        );
    }
}
