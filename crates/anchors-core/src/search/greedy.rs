//! Greedy anchor search.
//!
//! Starts from the best singleton and keeps extending the current anchor by
//! its best one-feature extension until the anchor validates. The mask grows
//! by one feature per iteration, so at most `num_features` iterations run.
//! When nothing can be added the last anchor is returned, valid or not.

use tracing::{debug, warn};

use super::SearchRun;
use crate::candidate::AnchorCandidate;
use crate::constants::{DEFAULT_GREEDY_CONFIDENCE, DEFAULT_MIN_COVERAGE};
use crate::error::AnchorResult;
use crate::sampler::Sampler;

/// Parameters of the greedy search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GreedyParams {
    /// Precision the anchor must reach.
    pub desired_confidence: f64,

    /// Coverage floor for extensions beyond the first feature.
    pub min_coverage: f64,
}

impl Default for GreedyParams {
    fn default() -> Self {
        Self {
            desired_confidence: DEFAULT_GREEDY_CONFIDENCE,
            min_coverage: DEFAULT_MIN_COVERAGE,
        }
    }
}

/// Run greedy search.
pub fn greedy_anchor<S: Sampler>(
    search: &mut SearchRun<'_, S>,
    params: &GreedyParams,
) -> AnchorResult<AnchorCandidate> {
    let candidates = search.generate(&[], params.min_coverage);
    let Some(mut anchor) = search.select_top_k(candidates, 1)?.pop() else {
        warn!("no features to anchor on, returning the empty anchor");
        return Ok(AnchorCandidate::empty());
    };

    while !search.is_valid(&mut anchor, 1, params.desired_confidence)? {
        let candidates = search.generate(std::slice::from_ref(&anchor), params.min_coverage);
        let Some(next) = search.select_top_k(candidates, 1)?.pop() else {
            warn!(
                mask = ?anchor.feature_mask,
                precision = anchor.precision,
                "no extension left, returning an anchor below the desired confidence"
            );
            break;
        };
        debug!(
            from = ?anchor.feature_mask,
            to = ?next.feature_mask,
            precision = next.precision,
            "greedy step"
        );
        anchor = next;
    }

    Ok(anchor)
}
