//! Black-box (Bayesian-optimization style) anchor search.
//!
//! Each feature is one include/exclude dimension. The optimizer proposes
//! configurations until its budget runs out; every new configuration becomes
//! a candidate, is sampled once with the context's batch size, and is scored.
//! Evaluation is deterministic: a configuration proposed again is answered
//! from history without sampling.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use super::SearchRun;
use crate::candidate::AnchorCandidate;
use crate::error::{AnchorError, AnchorResult};
use crate::optimizer::{BlackBoxOptimizer, ConfigSpace, Configuration, Objective, TrialInfo};
use crate::sampler::{PrecisionSource, Sampler};

/// Parameters of the black-box search.
pub struct BlackBoxParams {
    /// Optimizer driving the exploration; owns the budget.
    pub optimizer: Box<dyn BlackBoxOptimizer>,

    /// Score to minimize. Defaults to [`default_objective`].
    pub objective: Option<Objective>,
}

impl BlackBoxParams {
    /// Parameters using the default objective.
    pub fn new(optimizer: Box<dyn BlackBoxOptimizer>) -> Self {
        Self {
            optimizer,
            objective: None,
        }
    }

    /// Builder method to set a custom objective.
    pub fn objective(mut self, objective: Objective) -> Self {
        self.objective = Some(objective);
        self
    }
}

/// Default score: mean of precision loss and relative anchor size.
///
/// `((1 - precision) + |mask| / num_features) / 2`, so a perfect empty
/// anchor scores 0.
pub fn default_objective(candidate: &AnchorCandidate, num_features: usize) -> f64 {
    let relative_size = if num_features == 0 {
        0.0
    } else {
        candidate.len() as f64 / num_features as f64
    };
    ((1.0 - candidate.precision) + relative_size) / 2.0
}

/// Run black-box search.
///
/// Returns the lowest-scoring configuration with the precision and coverage
/// recorded when it was scored; ties keep the earlier one.
///
/// # Errors
///
/// [`AnchorError::OptimizationExhausted`] if no configuration was evaluated.
pub fn blackbox_anchor<S: Sampler>(
    search: &mut SearchRun<'_, S>,
    params: BlackBoxParams,
) -> AnchorResult<AnchorCandidate> {
    let BlackBoxParams {
        mut optimizer,
        objective,
    } = params;
    let num_features = search.num_features();
    let space = ConfigSpace::binary(num_features);
    let batch_size = search.context().batch_size;

    let mut history: BTreeMap<Configuration, (f64, TrialInfo)> = BTreeMap::new();
    let mut best: Option<(f64, AnchorCandidate)> = None;

    while !optimizer.budget_exhausted() {
        let Some(config) = optimizer.propose(&space) else {
            debug!(evaluations = history.len(), "optimizer has nothing left to propose");
            break;
        };

        let (score, info) = match history.get(&config) {
            Some(&recorded) => recorded,
            None => {
                let mut candidate = search.candidate(space.mask_of(&config));
                search.draw(&mut candidate, batch_size)?;

                let raw = match &objective {
                    Some(objective) => objective(&candidate),
                    None => default_objective(&candidate, num_features),
                };
                let score = if raw.is_nan() { f64::INFINITY } else { raw };
                let info = TrialInfo {
                    precision: candidate.precision,
                    coverage: candidate.coverage,
                };
                debug!(mask = ?candidate.feature_mask, score, precision = info.precision, "trial");

                if best.as_ref().map_or(true, |(best_score, _)| score < *best_score) {
                    best = Some((score, candidate));
                }
                history.insert(config.clone(), (score, info));
                (score, info)
            }
        };

        optimizer.observe(&config, score, info);
    }

    match best {
        Some((_, candidate)) => Ok(candidate),
        None => {
            warn!("optimizer budget exhausted before any configuration was evaluated");
            Err(AnchorError::OptimizationExhausted {
                evaluations: history.len(),
            })
        }
    }
}
