//! Sampler boundary.
//!
//! A sampler is bound to one instance, one prediction function and one task
//! type (tabular, image, text). It draws perturbations that keep the masked
//! predicates fixed to the instance and randomizes the rest.

use crate::candidate::AnchorCandidate;
use crate::coverage::CoverageData;
use crate::error::{AnchorResult, SamplerError};

/// Outcome of a single sampler call.
#[derive(Debug, Clone, Default)]
pub struct SampleBatch {
    /// Perturbations whose prediction matched the instance's.
    /// Zero when labels were not requested.
    pub positives: usize,

    /// Perturbations drawn.
    pub n_samples: usize,

    /// Predicate activation rows of the drawn perturbations.
    pub coverage_rows: CoverageData,
}

/// Task-specific perturbation sampler.
pub trait Sampler {
    /// Number of predicates describing the instance.
    fn num_features(&self) -> usize;

    /// Draw `n` perturbations consistent with `candidate.feature_mask`.
    ///
    /// With `compute_labels` the prediction function is evaluated and
    /// [`SampleBatch::positives`] filled in; otherwise only the coverage rows
    /// are meaningful.
    fn sample(
        &mut self,
        candidate: &AnchorCandidate,
        n: usize,
        compute_labels: bool,
    ) -> Result<SampleBatch, SamplerError>;
}

impl<S: Sampler + ?Sized> Sampler for &mut S {
    fn num_features(&self) -> usize {
        (**self).num_features()
    }

    fn sample(
        &mut self,
        candidate: &AnchorCandidate,
        n: usize,
        compute_labels: bool,
    ) -> Result<SampleBatch, SamplerError> {
        (**self).sample(candidate, n, compute_labels)
    }
}

/// Something that can refine a candidate's precision with fresh samples.
///
/// The bandit and the validity verifier are written against this trait so
/// they work both on a live search run and on synthetic arms in tests.
pub trait PrecisionSource {
    /// Number of predicates describing the instance.
    fn num_features(&self) -> usize;

    /// Draw `n` labelled samples for `candidate` and fold them into its
    /// running precision.
    fn draw(&mut self, candidate: &mut AnchorCandidate, n: usize) -> AnchorResult<()>;
}
