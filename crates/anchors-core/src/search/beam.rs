//! Beam anchor search.
//!
//! For each anchor size the beam of the previous size is extended by one
//! feature, extensions below the best coverage found so far are dropped, and
//! KL-LUCB keeps the top `beam_size`. A beam member replaces the best anchor
//! when it validates and strictly improves coverage, so the coverage of the
//! returned anchor never decreases over the run.

use tracing::{debug, info};

use super::SearchRun;
use crate::candidate::AnchorCandidate;
use crate::constants::{DEFAULT_BEAM_CONFIDENCE, DEFAULT_BEAM_SIZE};
use crate::error::{AnchorError, AnchorResult};
use crate::sampler::Sampler;

/// Parameters of the beam search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BeamParams {
    /// Precision an anchor must reach.
    pub desired_confidence: f64,

    /// Candidates kept per anchor size.
    pub beam_size: usize,

    /// Largest anchor size explored. Defaults to one less than the number
    /// of features.
    pub max_anchor_size: Option<usize>,
}

impl Default for BeamParams {
    fn default() -> Self {
        Self {
            desired_confidence: DEFAULT_BEAM_CONFIDENCE,
            beam_size: DEFAULT_BEAM_SIZE,
            max_anchor_size: None,
        }
    }
}

/// Run beam search.
///
/// Returns the empty anchor when no candidate validates.
pub fn beam_anchor<S: Sampler>(
    search: &mut SearchRun<'_, S>,
    params: &BeamParams,
) -> AnchorResult<AnchorCandidate> {
    if params.beam_size == 0 {
        return Err(AnchorError::InvalidInput("beam_size must be > 0".to_string()));
    }

    let num_features = search.num_features();
    let max_size = params
        .max_anchor_size
        .map_or(num_features.saturating_sub(1), |m| m.min(num_features));

    let mut best = AnchorCandidate::empty();
    let mut beam: Vec<AnchorCandidate> = Vec::new();

    for size in 1..=max_size {
        let candidates = search.generate(&beam, best.coverage);
        if candidates.is_empty() {
            debug!(size, "no candidates left");
            break;
        }

        let k = params.beam_size.min(candidates.len());
        beam = search.select_top_k(candidates, k)?;

        for candidate in beam.iter_mut() {
            if search.is_valid(candidate, params.beam_size, params.desired_confidence)?
                && candidate.coverage > best.coverage
            {
                info!(
                    size,
                    mask = ?candidate.feature_mask,
                    precision = candidate.precision,
                    coverage = candidate.coverage,
                    "new best anchor"
                );
                best = candidate.clone();
            }
        }
    }

    Ok(best)
}
