//! Main `AnchorExplainer` entry point and builder.

use tracing::{info, warn};

use anchors_core::constants::{
    DEFAULT_BEAM_CONFIDENCE, DEFAULT_BEAM_SIZE, DEFAULT_GREEDY_CONFIDENCE, DEFAULT_MIN_COVERAGE,
};
use anchors_core::search::{self, BeamParams, BlackBoxParams, GreedyParams, SearchStrategy};
use anchors_core::{AnchorCandidate, AnchorError, AnchorResult, SearchContext, Sampler};

use crate::config::{Config, Method, MethodOptions, DEFAULT_RUN_TIME};
use crate::optimizer::LocalSearchOptimizer;
use crate::sampler::{Classifier, TabularOptions, TabularSampler};

/// Main entry point for anchor explanations.
///
/// Use the builder pattern to configure, then explain as many instances as
/// needed. The explainer holds no per-call state.
///
/// # Example
///
/// ```ignore
/// use anchors::{AnchorExplainer, MethodOptions, TabularOptions};
///
/// let anchor = AnchorExplainer::new()
///     .num_coverage_samples(5_000)
///     .explain_instance(
///         &instance,
///         |rows: &[Vec<f64>]| model.predict(rows),
///         "beam",
///         TabularOptions::new(dataset),
///         MethodOptions::new().beam_size(4),
///     )?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct AnchorExplainer {
    config: Config,
}

impl AnchorExplainer {
    /// Create with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with an explicit configuration.
    pub fn with_config(config: Config) -> Self {
        Self { config }
    }

    /// Set the coverage reference sample size.
    pub fn num_coverage_samples(mut self, n: usize) -> Self {
        self.config = self.config.num_coverage_samples(n);
        self
    }

    /// Set the bandit tolerance.
    pub fn epsilon(mut self, epsilon: f64) -> Self {
        self.config = self.config.epsilon(epsilon);
        self
    }

    /// Set the error probability.
    pub fn delta(mut self, delta: f64) -> Self {
        self.config = self.config.delta(delta);
        self
    }

    /// Set the search batch size.
    pub fn batch_size(mut self, size: usize) -> Self {
        self.config = self.config.batch_size(size);
        self
    }

    /// Set the seed.
    pub fn seed(mut self, seed: u64) -> Self {
        self.config = self.config.seed(seed);
        self
    }

    /// Get the current configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Explain the prediction of `predict_fn` on a tabular `instance`.
    ///
    /// `method` is one of `greedy`, `beam` or `smac`.
    ///
    /// # Errors
    ///
    /// - [`AnchorError::UnsupportedMethod`] for an unknown method
    /// - [`AnchorError::InvalidInput`] for an empty or mis-shaped dataset
    /// - [`AnchorError::ExplanationFailure`] if the predictor misbehaves
    pub fn explain_instance<C: Classifier>(
        &self,
        instance: &[f64],
        predict_fn: C,
        method: &str,
        task_opts: TabularOptions,
        method_opts: MethodOptions,
    ) -> AnchorResult<AnchorCandidate> {
        let method: Method = method.parse()?;
        let sampler = TabularSampler::new(instance, task_opts, predict_fn, self.config.seed)?;
        self.explain_with(sampler, method, method_opts)
    }

    /// Explain with any sampler.
    ///
    /// Pass `&mut sampler` to keep the sampler for formatting afterwards.
    ///
    /// # Errors
    ///
    /// Same as [`AnchorExplainer::explain_instance`], with sampler failures
    /// surfaced as [`AnchorError::ExplanationFailure`].
    pub fn explain<S: Sampler>(
        &self,
        sampler: S,
        method: &str,
        method_opts: MethodOptions,
    ) -> AnchorResult<AnchorCandidate> {
        let method: Method = method.parse()?;
        self.explain_with(sampler, method, method_opts)
    }

    #[tracing::instrument(skip_all, fields(method = %method, features = sampler.num_features()))]
    fn explain_with<S: Sampler>(
        &self,
        mut sampler: S,
        method: Method,
        method_opts: MethodOptions,
    ) -> AnchorResult<AnchorCandidate> {
        self.config.validate().map_err(AnchorError::InvalidInput)?;

        let num_features = sampler.num_features();
        info!(samples = self.config.num_coverage_samples, "drawing coverage reference sample");
        let reference = sampler.sample(
            &AnchorCandidate::empty(),
            self.config.num_coverage_samples,
            false,
        )?;
        if reference.coverage_rows.n_features() != num_features {
            return Err(AnchorError::InvalidInput(format!(
                "sampler returned coverage rows with {} columns for {} features",
                reference.coverage_rows.n_features(),
                num_features
            )));
        }

        let ctx = SearchContext::new(reference.coverage_rows)
            .batch_size(self.config.batch_size)
            .epsilon(self.config.epsilon)
            .delta(self.config.delta)
            .eps_stop(self.config.eps_stop)
            .max_bandit_rounds(self.config.max_bandit_rounds);

        let strategy = self.strategy(method, method_opts);
        match search::run(&ctx, sampler, strategy) {
            Err(AnchorError::OptimizationExhausted { evaluations }) => {
                warn!(evaluations, "optimization exhausted, returning the empty anchor");
                Ok(AnchorCandidate::empty())
            }
            result => result,
        }
    }

    fn strategy(&self, method: Method, opts: MethodOptions) -> SearchStrategy {
        match method {
            Method::Greedy => SearchStrategy::Greedy(GreedyParams {
                desired_confidence: opts.desired_confidence.unwrap_or(DEFAULT_GREEDY_CONFIDENCE),
                min_coverage: opts.min_coverage.unwrap_or(DEFAULT_MIN_COVERAGE),
            }),
            Method::Beam => SearchStrategy::Beam(BeamParams {
                desired_confidence: opts.desired_confidence.unwrap_or(DEFAULT_BEAM_CONFIDENCE),
                beam_size: opts.beam_size.unwrap_or(DEFAULT_BEAM_SIZE),
                max_anchor_size: opts.max_anchor_size,
            }),
            Method::Smac => {
                let optimizer = LocalSearchOptimizer::new(self.config.seed)
                    .run_time(opts.run_time.unwrap_or(DEFAULT_RUN_TIME))
                    .max_evaluations(opts.max_evaluations);
                SearchStrategy::BlackBox(BlackBoxParams {
                    optimizer: Box::new(optimizer),
                    objective: opts.objective,
                })
            }
        }
    }
}
