//! Boundary to a budgeted black-box optimizer.
//!
//! The black-box strategy sees the anchor search space as one binary
//! decision per feature and leaves exploration to an optimizer behind
//! [`BlackBoxOptimizer`]. The optimizer proposes configurations, the
//! strategy scores them, and the scores flow back through `observe`.

use serde::{Deserialize, Serialize};

use crate::candidate::AnchorCandidate;

/// One include/exclude decision per feature.
pub type Configuration = Vec<bool>;

/// Score to minimize for an evaluated candidate.
pub type Objective = Box<dyn Fn(&AnchorCandidate) -> f64>;

/// Discrete search space of `n_dims` binary dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigSpace {
    /// Number of binary dimensions (one per feature).
    pub n_dims: usize,
}

impl ConfigSpace {
    /// Space with one binary dimension per feature.
    pub fn binary(n_dims: usize) -> Self {
        Self { n_dims }
    }

    /// Number of distinct configurations, if it fits in a `u128`.
    pub fn cardinality(&self) -> Option<u128> {
        1u128.checked_shl(self.n_dims as u32)
    }

    /// Feature indices switched on in `config`.
    pub fn mask_of(&self, config: &[bool]) -> Vec<usize> {
        config
            .iter()
            .enumerate()
            .filter_map(|(i, &on)| on.then_some(i))
            .collect()
    }

    /// Configuration that switches on exactly the features in `mask`.
    pub fn config_of(&self, mask: &[usize]) -> Configuration {
        let mut config = vec![false; self.n_dims];
        for &f in mask {
            if f < self.n_dims {
                config[f] = true;
            }
        }
        config
    }
}

/// Side information recorded with each evaluated configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrialInfo {
    /// Precision measured when the configuration was scored.
    pub precision: f64,
    /// Coverage of the configuration's mask.
    pub coverage: f64,
}

/// A budgeted minimizer over a [`ConfigSpace`].
pub trait BlackBoxOptimizer {
    /// Next configuration to evaluate, or `None` once nothing is left to try.
    fn propose(&mut self, space: &ConfigSpace) -> Option<Configuration>;

    /// Report the score (lower is better) of a proposed configuration.
    fn observe(&mut self, config: &[bool], score: f64, info: TrialInfo);

    /// Whether the budget is spent.
    fn budget_exhausted(&self) -> bool;
}
