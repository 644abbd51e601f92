//! Error types for anchor search.

use thiserror::Error;

/// Result type for anchor search operations.
pub type AnchorResult<T> = Result<T, AnchorError>;

/// Failure reported by a [`Sampler`](crate::sampler::Sampler).
///
/// The core never retries a failed draw. Retries, if wanted, belong to the
/// sampler implementation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SamplerError {
    /// The prediction function failed or returned a malformed label vector.
    #[error("prediction failed: {0}")]
    Prediction(String),

    /// Perturbed samples could not be produced.
    #[error("perturbation failed: {0}")]
    Perturbation(String),
}

/// Errors surfaced by an explanation request.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnchorError {
    /// The requested search method is not one of `greedy`, `beam`, `smac`.
    #[error("unsupported search method `{0}` (expected greedy, beam or smac)")]
    UnsupportedMethod(String),

    /// Sampling or prediction failed mid-search.
    #[error("explanation failed: {0}")]
    ExplanationFailure(#[from] SamplerError),

    /// The black-box optimizer stopped before evaluating a single configuration.
    #[error("optimizer budget exhausted after {evaluations} evaluations")]
    OptimizationExhausted {
        /// Configurations scored before the budget ran out.
        evaluations: usize,
    },

    /// Caller-supplied input is unusable.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}
