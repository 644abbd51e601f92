//! Validity verifier.
//!
//! Samples a single candidate until its KL confidence interval resolves
//! against the desired precision, then reports whether it cleared it.

use tracing::debug;

use crate::bounds::{dlow_bernoulli, dup_bernoulli, validity_beta};
use crate::candidate::AnchorCandidate;
use crate::constants::{DEFAULT_DELTA, DEFAULT_EPS_STOP};
use crate::error::{AnchorError, AnchorResult, SamplerError};
use crate::sampler::PrecisionSource;

/// Parameters of one validity check.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidityCheck {
    /// Beam width of the search; enters the Bonferroni correction.
    pub beam_size: usize,

    /// Samples drawn per refinement round.
    pub sample_count: usize,

    /// Precision the anchor must reach.
    pub desired_confidence: f64,

    /// Family-wise error rate.
    pub delta: f64,

    /// Slack around `desired_confidence` within which the interval counts as resolved.
    pub eps_stop: f64,
}

impl ValidityCheck {
    /// A check with the default `delta` and `eps_stop`.
    pub fn new(beam_size: usize, sample_count: usize, desired_confidence: f64) -> Self {
        Self {
            beam_size,
            sample_count,
            desired_confidence,
            delta: DEFAULT_DELTA,
            eps_stop: DEFAULT_EPS_STOP,
        }
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
}

/// Decide whether `candidate` meets the precision target.
///
/// While the interval straddles the target (precision above it but lower
/// bound short of `target - eps_stop`, or precision below it but upper bound
/// past `target + eps_stop`), another `sample_count` samples are drawn.
/// Each round grows `n_samples`, so the interval shrinks toward the estimate
/// and the loop ends.
///
/// Valid iff precision >= target and lower bound > target - eps_stop.
/// A candidate without samples gets one round before any bound is computed.
///
/// # Errors
///
/// `InvalidInput` when `eps_stop` is not positive: the lower bound never
/// reaches a target of exactly 1.0, so the loop would not end. A source whose
/// draw leaves `n_samples` unchanged fails with `ExplanationFailure` for the
/// same reason.
pub fn is_valid<P: PrecisionSource>(
    source: &mut P,
    candidate: &mut AnchorCandidate,
    check: &ValidityCheck,
) -> AnchorResult<bool> {
    let beta = validity_beta(check.delta, check.beam_size, source.num_features());
    let target = check.desired_confidence;
    let sample_count = check.sample_count.max(1);
    if check.eps_stop.is_nan() || check.eps_stop <= 0.0 {
        return Err(AnchorError::InvalidInput(format!(
            "eps_stop must be positive, got {}",
            check.eps_stop
        )));
    }

    // No data yet: the bounds would describe a precision of zero.
    if candidate.n_samples == 0 {
        draw_more(source, candidate, sample_count)?;
    }

    let (mut lb, mut ub) = interval(candidate, beta);
    let mut rounds = 0usize;
    while (candidate.precision >= target && lb < target - check.eps_stop)
        || (candidate.precision < target && ub >= target + check.eps_stop)
    {
        draw_more(source, candidate, sample_count)?;
        (lb, ub) = interval(candidate, beta);
        rounds += 1;
    }

    let valid = candidate.precision >= target && lb > target - check.eps_stop;
    debug!(
        mask = ?candidate.feature_mask,
        precision = candidate.precision,
        lb,
        ub,
        rounds,
        valid,
        "validity check"
    );
    Ok(valid)
}

/// Draw a round and fail if it added no samples.
fn draw_more<P: PrecisionSource>(
    source: &mut P,
    candidate: &mut AnchorCandidate,
    n: usize,
) -> AnchorResult<()> {
    let before = candidate.n_samples;
    source.draw(candidate, n)?;
    if candidate.n_samples <= before {
        return Err(SamplerError::Perturbation(format!(
            "no samples drawn for anchor {:?}",
            candidate.feature_mask
        ))
        .into());
    }
    Ok(())
}

fn interval(candidate: &AnchorCandidate, beta: f64) -> (f64, f64) {
    let level = beta / candidate.n_samples.max(1) as f64;
    (
        dlow_bernoulli(candidate.precision, level),
        dup_bernoulli(candidate.precision, level),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};
    use rand_xoshiro::Xoshiro256PlusPlus;

    struct FixedRate {
        rate: f64,
        features: usize,
        rng: Xoshiro256PlusPlus,
        draws: usize,
    }

    impl FixedRate {
        fn new(rate: f64) -> Self {
            Self {
                rate,
                features: 5,
                rng: Xoshiro256PlusPlus::seed_from_u64(42),
                draws: 0,
            }
        }
    }

    impl PrecisionSource for FixedRate {
        fn num_features(&self) -> usize {
            self.features
        }

        fn draw(&mut self, candidate: &mut AnchorCandidate, n: usize) -> AnchorResult<()> {
            let positives = (0..n).filter(|_| self.rng.random_bool(self.rate)).count();
            candidate.update_precision(positives, n);
            self.draws += n;
            Ok(())
        }
    }

    #[test]
    fn test_perfect_candidate_validates() {
        let mut source = FixedRate::new(1.0);
        let mut candidate = AnchorCandidate::new(vec![0]);
        let check = ValidityCheck::new(1, 16, 0.95);

        assert!(is_valid(&mut source, &mut candidate, &check).unwrap());
        assert_eq!(candidate.precision, 1.0);
        assert!(candidate.n_samples > 0);
    }

    #[test]
    fn test_coin_flip_rejected() {
        let mut source = FixedRate::new(0.5);
        let mut candidate = AnchorCandidate::new(vec![0]);
        let check = ValidityCheck::new(1, 16, 0.95);

        assert!(!is_valid(&mut source, &mut candidate, &check).unwrap());
        assert!(candidate.precision < 0.95);
    }

    #[test]
    fn test_unsampled_candidate_forces_sampling() {
        let mut source = FixedRate::new(1.0);
        let mut candidate = AnchorCandidate::new(vec![1]);
        let check = ValidityCheck::new(2, 8, 0.9);

        is_valid(&mut source, &mut candidate, &check).unwrap();
        assert!(source.draws >= 8);
        assert_eq!(candidate.n_samples, source.draws);
    }

    #[test]
    fn test_resolved_interval_needs_no_samples() {
        let mut source = FixedRate::new(1.0);
        let mut candidate = AnchorCandidate::new(vec![1]);
        candidate.update_precision(10_000, 10_000);
        let check = ValidityCheck::new(1, 16, 0.95);

        assert!(is_valid(&mut source, &mut candidate, &check).unwrap());
        assert_eq!(source.draws, 0);
    }

    #[test]
    fn test_target_of_one_stops() {
        let mut source = FixedRate::new(1.0);
        let mut candidate = AnchorCandidate::new(vec![0]);
        let check = ValidityCheck::new(1, 16, 1.0);

        assert!(is_valid(&mut source, &mut candidate, &check).unwrap());
    }

    #[test]
    fn test_zero_eps_stop_rejected() {
        // A perfect source with target 1.0 would never resolve without slack.
        let mut source = FixedRate::new(1.0);
        let mut candidate = AnchorCandidate::new(vec![0]);
        let check = ValidityCheck::new(1, 16, 1.0).eps_stop(0.0);

        let result = is_valid(&mut source, &mut candidate, &check);
        assert!(matches!(result, Err(AnchorError::InvalidInput(_))));
        assert_eq!(source.draws, 0);

        let check = ValidityCheck::new(1, 16, 1.0).eps_stop(-0.1);
        assert!(is_valid(&mut source, &mut candidate, &check).is_err());
    }

    /// Reports success but never adds a sample.
    struct Stalled {
        calls: usize,
    }

    impl PrecisionSource for Stalled {
        fn num_features(&self) -> usize {
            3
        }

        fn draw(&mut self, _candidate: &mut AnchorCandidate, _n: usize) -> AnchorResult<()> {
            self.calls += 1;
            Ok(())
        }
    }

    #[test]
    fn test_stalled_source_on_empty_candidate_errors() {
        let mut source = Stalled { calls: 0 };
        let mut candidate = AnchorCandidate::new(vec![2]);
        let check = ValidityCheck::new(1, 16, 0.95);

        let result = is_valid(&mut source, &mut candidate, &check);
        assert!(matches!(
            result,
            Err(AnchorError::ExplanationFailure(SamplerError::Perturbation(_)))
        ));
        assert_eq!(source.calls, 1);
    }

    #[test]
    fn test_stalled_source_mid_refinement_errors() {
        // Precision on the target keeps the loop asking for more samples.
        let mut source = Stalled { calls: 0 };
        let mut candidate = AnchorCandidate::new(vec![0]);
        candidate.update_precision(16, 16);
        let check = ValidityCheck::new(1, 16, 1.0);

        let result = is_valid(&mut source, &mut candidate, &check);
        assert!(matches!(
            result,
            Err(AnchorError::ExplanationFailure(SamplerError::Perturbation(_)))
        ));
        assert_eq!(source.calls, 1);
        assert_eq!(candidate.n_samples, 16);
    }
}
