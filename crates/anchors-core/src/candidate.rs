//! The anchor candidate: a feature mask plus its running estimates.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A candidate anchor under evaluation.
///
/// `feature_mask` lists predicate indices of the original instance. The
/// insertion order is kept for display; identity is the sorted form returned
/// by [`AnchorCandidate::canonical_mask`].
///
/// `precision` is the running estimate of P(prediction unchanged | mask fixed),
/// updated as batches arrive through [`AnchorCandidate::update_precision`].
/// `coverage` is the share of the reference population whose active
/// predicates are a superset of the mask.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnchorCandidate {
    /// Predicate indices composing the anchor.
    pub feature_mask: Vec<usize>,

    /// Estimated precision in [0, 1]. Zero until the first sample lands.
    pub precision: f64,

    /// Coverage in [0, 1] over the reference dataset.
    pub coverage: f64,

    /// Samples consumed so far for the precision estimate.
    pub n_samples: usize,

    /// Samples whose prediction matched the original instance.
    pub positive_samples: usize,
}

impl AnchorCandidate {
    /// Create a candidate for `feature_mask`, dropping repeated indices.
    pub fn new(feature_mask: Vec<usize>) -> Self {
        let mut mask = Vec::with_capacity(feature_mask.len());
        for feature in feature_mask {
            if !mask.contains(&feature) {
                mask.push(feature);
            }
        }
        Self {
            feature_mask: mask,
            precision: 0.0,
            coverage: 0.0,
            n_samples: 0,
            positive_samples: 0,
        }
    }

    /// The baseline candidate with an empty mask.
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// A fresh candidate whose mask is this one plus `feature`.
    ///
    /// Statistics are not carried over.
    pub fn with_feature(&self, feature: usize) -> Self {
        let mut mask = self.feature_mask.clone();
        mask.push(feature);
        Self::new(mask)
    }

    /// Sorted copy of the mask, used as the candidate's identity.
    pub fn canonical_mask(&self) -> Vec<usize> {
        let mut mask = self.feature_mask.clone();
        mask.sort_unstable();
        mask
    }

    /// Fold a sampled batch into the running precision estimate.
    pub fn update_precision(&mut self, positives: usize, n_samples: usize) {
        debug_assert!(positives <= n_samples, "positives exceed batch size");
        self.n_samples += n_samples;
        self.positive_samples += positives;
        self.precision = if self.n_samples == 0 {
            0.0
        } else {
            self.positive_samples as f64 / self.n_samples as f64
        };
    }

    /// Number of predicates in the mask.
    pub fn len(&self) -> usize {
        self.feature_mask.len()
    }

    /// Whether this is the empty baseline mask.
    pub fn is_empty(&self) -> bool {
        self.feature_mask.is_empty()
    }

    /// Whether `feature` is part of the mask.
    pub fn contains(&self, feature: usize) -> bool {
        self.feature_mask.contains(&feature)
    }
}

impl Default for AnchorCandidate {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Display for AnchorCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?} (precision {:.3}, coverage {:.3}, {} samples)",
            self.feature_mask, self.precision, self.coverage, self.n_samples
        )
    }
}
