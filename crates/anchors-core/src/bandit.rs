//! KL-LUCB best-arm identification over anchor candidates.
//!
//! Each candidate is a Bernoulli arm whose mean is its precision. Every
//! round the arms are split into the current top-k (J) and the rest. The
//! weakest member of J (lowest lower bound, `lt`) and the strongest outsider
//! (highest upper bound, `ut`) each receive another batch until
//! `ub(ut) - lb(lt) <= epsilon`.
//!
//! Most of an explanation's sampling budget is spent here.

use std::cmp::Ordering;

use tracing::{debug, warn};

use crate::bounds::{compute_beta, dlow_bernoulli, dup_bernoulli};
use crate::candidate::AnchorCandidate;
use crate::constants::{DEFAULT_BATCH_SIZE, DEFAULT_DELTA, DEFAULT_EPSILON, DEFAULT_MAX_BANDIT_ROUNDS};
use crate::error::AnchorResult;
use crate::sampler::PrecisionSource;

/// KL-LUCB parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KlLucb {
    /// Stop once the separation gap drops to this value.
    pub epsilon: f64,

    /// Error probability of the identification.
    pub delta: f64,

    /// Samples drawn per arm per round.
    pub batch_size: usize,

    /// Round cap; the current ranking is returned once it is hit.
    pub max_rounds: usize,
}

impl Default for KlLucb {
    fn default() -> Self {
        Self {
            epsilon: DEFAULT_EPSILON,
            delta: DEFAULT_DELTA,
            batch_size: DEFAULT_BATCH_SIZE,
            max_rounds: DEFAULT_MAX_BANDIT_ROUNDS,
        }
    }
}

impl KlLucb {
    /// Create a bandit with the default round cap.
    pub fn new(epsilon: f64, delta: f64, batch_size: usize) -> Self {
        Self {
            epsilon,
            delta,
            batch_size,
            ..Self::default()
        }
    }

    /// Builder method to set the round cap.
    pub fn max_rounds(mut self, rounds: usize) -> Self {
        self.max_rounds = rounds;
        self
    }

    /// Return the `k` candidates with the highest precision, best first.
    ///
    /// Candidates that have never been sampled get one sample before any
    /// bound is computed. When `k` covers every candidate no further sampling
    /// happens. The returned candidates carry every sample drawn for them.
    pub fn select_top_k<P: PrecisionSource>(
        &self,
        source: &mut P,
        mut candidates: Vec<AnchorCandidate>,
        k: usize,
    ) -> AnchorResult<Vec<AnchorCandidate>> {
        if candidates.is_empty() || k == 0 {
            return Ok(Vec::new());
        }

        for candidate in candidates.iter_mut().filter(|c| c.n_samples == 0) {
            source.draw(candidate, 1)?;
        }

        let n_arms = candidates.len();
        let k = k.min(n_arms);

        if k < n_arms {
            let mut lb = vec![0.0; n_arms];
            let mut ub = vec![0.0; n_arms];
            let mut t = 1;
            let (mut ut, mut lt) = self.update_bounds(&candidates, k, t, &mut lb, &mut ub);
            let mut gap = ub[ut] - lb[lt];
            let mut rounds = 0;

            while gap > self.epsilon {
                if rounds >= self.max_rounds {
                    warn!(
                        rounds,
                        gap, "KL-LUCB round cap reached before arms separated"
                    );
                    break;
                }
                source.draw(&mut candidates[ut], self.batch_size)?;
                source.draw(&mut candidates[lt], self.batch_size)?;

                t += 1;
                rounds += 1;
                (ut, lt) = self.update_bounds(&candidates, k, t, &mut lb, &mut ub);
                gap = ub[ut] - lb[lt];
                debug!(round = t, ut, lt, gap, "KL-LUCB round");
            }
        }

        candidates.sort_by(|a, b| {
            b.precision
                .partial_cmp(&a.precision)
                .unwrap_or(Ordering::Equal)
        });
        candidates.truncate(k);
        Ok(candidates)
    }

    /// Recompute the bounds that matter for round `t` and return `(ut, lt)`.
    fn update_bounds(
        &self,
        candidates: &[AnchorCandidate],
        k: usize,
        t: usize,
        lb: &mut [f64],
        ub: &mut [f64],
    ) -> (usize, usize) {
        let n_arms = candidates.len();
        let mut sorted: Vec<usize> = (0..n_arms).collect();
        sorted.sort_by(|&a, &b| {
            candidates[a]
                .precision
                .partial_cmp(&candidates[b].precision)
                .unwrap_or(Ordering::Equal)
        });
        let (not_top, top) = sorted.split_at(n_arms - k);

        let beta = compute_beta(n_arms, t, self.delta);
        for &i in not_top {
            let c = &candidates[i];
            ub[i] = dup_bernoulli(c.precision, beta / c.n_samples.max(1) as f64);
        }
        for &i in top {
            let c = &candidates[i];
            lb[i] = dlow_bernoulli(c.precision, beta / c.n_samples.max(1) as f64);
        }

        let ut = not_top
            .iter()
            .copied()
            .fold(None, |best: Option<usize>, i| match best {
                Some(b) if ub[b] >= ub[i] => Some(b),
                _ => Some(i),
            })
            .unwrap_or(sorted[0]);
        let lt = top
            .iter()
            .copied()
            .fold(None, |best: Option<usize>, i| match best {
                Some(b) if lb[b] <= lb[i] => Some(b),
                _ => Some(i),
            })
            .unwrap_or(sorted[n_arms - 1]);
        (ut, lt)
    }
}
