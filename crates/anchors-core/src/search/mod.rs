//! Anchor search.
//!
//! A search walks the space of feature masks one feature at a time. Every
//! strategy is assembled from the same three steps:
//!
//! 1. **Generate**: extend the current frontier by one feature, dropping
//!    extensions below the coverage floor
//! 2. **Select**: rank the new frontier with KL-LUCB
//! 3. **Verify**: sample the leaders until their precision interval resolves
//!
//! The inputs shared by all steps live in an immutable [`SearchContext`].
//! Mutable per-search bookkeeping (the sampler and per-mask memo) lives in a
//! [`SearchRun`] that is created for one search and then dropped.

mod beam;
mod blackbox;
mod greedy;

use std::collections::{BTreeMap, BTreeSet};

use tracing::info;

use crate::bandit::KlLucb;
use crate::candidate::AnchorCandidate;
use crate::constants::{
    DEFAULT_BATCH_SIZE, DEFAULT_DELTA, DEFAULT_EPSILON, DEFAULT_EPS_STOP,
    DEFAULT_MAX_BANDIT_ROUNDS,
};
use crate::coverage::CoverageData;
use crate::error::AnchorResult;
use crate::sampler::{PrecisionSource, Sampler};
use crate::verify::{self, ValidityCheck};

pub use beam::{beam_anchor, BeamParams};
pub use blackbox::{blackbox_anchor, default_objective, BlackBoxParams};
pub use greedy::{greedy_anchor, GreedyParams};

/// Read-only inputs of one explanation.
#[derive(Debug, Clone)]
pub struct SearchContext {
    /// Reference coverage matrix drawn at the start of the explanation.
    pub coverage_data: CoverageData,

    /// Samples per sampler call.
    pub batch_size: usize,

    /// KL-LUCB separation tolerance.
    pub epsilon: f64,

    /// Error probability for both the bandit and the verifier.
    pub delta: f64,

    /// Verifier slack around the desired confidence.
    pub eps_stop: f64,

    /// KL-LUCB round cap per selection.
    pub max_bandit_rounds: usize,
}

impl SearchContext {
    /// A context over `coverage_data` with default parameters.
    pub fn new(coverage_data: CoverageData) -> Self {
        Self {
            coverage_data,
            batch_size: DEFAULT_BATCH_SIZE,
            epsilon: DEFAULT_EPSILON,
            delta: DEFAULT_DELTA,
            eps_stop: DEFAULT_EPS_STOP,
            max_bandit_rounds: DEFAULT_MAX_BANDIT_ROUNDS,
        }
    }

    /// Builder method to set the batch size.
    pub fn batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Builder method to set epsilon.
    pub fn epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Builder method to set delta.
    pub fn delta(mut self, delta: f64) -> Self {
        self.delta = delta;
        self
    }

    /// Builder method to set eps_stop.
    pub fn eps_stop(mut self, eps_stop: f64) -> Self {
        self.eps_stop = eps_stop;
        self
    }

    /// Builder method to set the bandit round cap.
    pub fn max_bandit_rounds(mut self, rounds: usize) -> Self {
        self.max_bandit_rounds = rounds;
        self
    }

    /// Bandit configured from this context.
    pub fn bandit(&self) -> KlLucb {
        KlLucb::new(self.epsilon, self.delta, self.batch_size).max_rounds(self.max_bandit_rounds)
    }

    /// Validity check for a beam of `beam_size` at `desired_confidence`.
    pub fn validity(&self, beam_size: usize, desired_confidence: f64) -> ValidityCheck {
        ValidityCheck::new(beam_size, self.batch_size, desired_confidence)
            .delta(self.delta)
            .eps_stop(self.eps_stop)
    }
}

/// Which strategy to run, with its parameters.
pub enum SearchStrategy {
    /// Extend the single best candidate until it validates.
    Greedy(GreedyParams),
    /// Keep the best `beam_size` candidates of every anchor size.
    Beam(BeamParams),
    /// Hand the binary feature space to a budgeted optimizer.
    BlackBox(BlackBoxParams),
}

impl SearchStrategy {
    /// Short name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            SearchStrategy::Greedy(_) => "greedy",
            SearchStrategy::Beam(_) => "beam",
            SearchStrategy::BlackBox(_) => "smac",
        }
    }
}

/// Run `strategy` to completion and return its anchor.
pub fn run<S: Sampler>(
    ctx: &SearchContext,
    sampler: S,
    strategy: SearchStrategy,
) -> AnchorResult<AnchorCandidate> {
    let name = strategy.name();
    info!(strategy = name, features = sampler.num_features(), "starting anchor search");

    let mut search = SearchRun::new(ctx, sampler);
    let anchor = match strategy {
        SearchStrategy::Greedy(params) => greedy_anchor(&mut search, &params)?,
        SearchStrategy::Beam(params) => beam_anchor(&mut search, &params)?,
        SearchStrategy::BlackBox(params) => blackbox_anchor(&mut search, params)?,
    };

    info!(
        strategy = name,
        mask = ?anchor.feature_mask,
        precision = anchor.precision,
        coverage = anchor.coverage,
        samples = search.samples_drawn(),
        "anchor search finished"
    );
    Ok(anchor)
}

/// Statistics remembered for one canonical mask.
#[derive(Debug, Clone, Copy, Default)]
struct MaskStats {
    coverage: f64,
    n_samples: usize,
    positive_samples: usize,
}

/// Mutable state of one search: the sampler plus a memo keyed by canonical mask.
///
/// The memo means a mask reached through several parents has its coverage
/// computed once and keeps accumulating samples instead of starting over.
pub struct SearchRun<'a, S: Sampler> {
    ctx: &'a SearchContext,
    sampler: S,
    memo: BTreeMap<Vec<usize>, MaskStats>,
    samples_drawn: usize,
}

impl<'a, S: Sampler> SearchRun<'a, S> {
    /// Start a search over `ctx` drawing from `sampler`.
    pub fn new(ctx: &'a SearchContext, sampler: S) -> Self {
        Self {
            ctx,
            sampler,
            memo: BTreeMap::new(),
            samples_drawn: 0,
        }
    }

    /// The shared search inputs.
    pub fn context(&self) -> &'a SearchContext {
        self.ctx
    }

    /// Number of predicates describing the instance.
    pub fn num_features(&self) -> usize {
        self.sampler.num_features()
    }

    /// Labelled samples drawn so far in this search.
    pub fn samples_drawn(&self) -> usize {
        self.samples_drawn
    }

    /// Candidate for `mask`, with coverage and any samples already gathered
    /// for the same set of features.
    pub fn candidate(&mut self, mask: Vec<usize>) -> AnchorCandidate {
        let mut candidate = AnchorCandidate::new(mask);
        let key = candidate.canonical_mask();
        let ctx = self.ctx;
        let stats = self.memo.entry(key).or_insert_with_key(|key| MaskStats {
            coverage: ctx.coverage_data.coverage(key),
            ..MaskStats::default()
        });
        candidate.coverage = stats.coverage;
        candidate.update_precision(stats.positive_samples, stats.n_samples);
        candidate
    }

    /// Extend `prev` by one feature each.
    ///
    /// With no parents, one singleton per feature is returned and the
    /// coverage floor is not applied. Otherwise every `(feature, parent)`
    /// pair with the feature outside the parent's mask yields
    /// `parent + feature`, kept if its coverage reaches `min_coverage`.
    /// A mask reachable from several parents is emitted once.
    pub fn generate(&mut self, prev: &[AnchorCandidate], min_coverage: f64) -> Vec<AnchorCandidate> {
        let num_features = self.num_features();
        if prev.is_empty() {
            return (0..num_features).map(|f| self.candidate(vec![f])).collect();
        }

        let mut seen = BTreeSet::new();
        let mut candidates = Vec::new();
        for feature in 0..num_features {
            for parent in prev {
                if parent.contains(feature) {
                    continue;
                }
                let mut mask = parent.feature_mask.clone();
                mask.push(feature);
                let candidate = self.candidate(mask);
                if candidate.coverage >= min_coverage && seen.insert(candidate.canonical_mask()) {
                    candidates.push(candidate);
                }
            }
        }
        candidates
    }

    /// Top `k` of `candidates` by KL-LUCB.
    pub fn select_top_k(
        &mut self,
        candidates: Vec<AnchorCandidate>,
        k: usize,
    ) -> AnchorResult<Vec<AnchorCandidate>> {
        let bandit = self.ctx.bandit();
        bandit.select_top_k(self, candidates, k)
    }

    /// Run the validity verifier on `candidate`.
    pub fn is_valid(
        &mut self,
        candidate: &mut AnchorCandidate,
        beam_size: usize,
        desired_confidence: f64,
    ) -> AnchorResult<bool> {
        let check = self.ctx.validity(beam_size, desired_confidence);
        verify::is_valid(self, candidate, &check)
    }
}

impl<S: Sampler> PrecisionSource for SearchRun<'_, S> {
    fn num_features(&self) -> usize {
        SearchRun::num_features(self)
    }

    fn draw(&mut self, candidate: &mut AnchorCandidate, n: usize) -> AnchorResult<()> {
        let batch = self.sampler.sample(candidate, n, true)?;
        candidate.update_precision(batch.positives, batch.n_samples);
        self.samples_drawn += batch.n_samples;

        let stats = self.memo.entry(candidate.canonical_mask()).or_default();
        stats.coverage = candidate.coverage;
        stats.n_samples = candidate.n_samples;
        stats.positive_samples = candidate.positive_samples;
        Ok(())
    }
}
