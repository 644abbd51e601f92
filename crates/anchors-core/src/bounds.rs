//! KL-divergence confidence bounds for Bernoulli proportions.
//!
//! Given an empirical success rate `p` and an information level (usually
//! `beta / n_samples`), the bounds are the points `q` on either side of `p`
//! where KL(Bernoulli(p) || Bernoulli(q)) reaches the level. Both are found
//! by bisection inside the Pinsker bracket `p ± sqrt(level / 2)`.

use crate::constants::{
    BOUND_BISECTION_STEPS, KL_CLAMP_HIGH, KL_CLAMP_LOW, LUCB_ALPHA, LUCB_K,
};

/// KL divergence between Bernoulli(p) and Bernoulli(q), in nats.
///
/// Both parameters are clamped away from 0 and 1 so the logarithms stay finite.
pub fn kl_bernoulli(p: f64, q: f64) -> f64 {
    let p = p.clamp(KL_CLAMP_LOW, KL_CLAMP_HIGH);
    let q = q.clamp(KL_CLAMP_LOW, KL_CLAMP_HIGH);
    p * (p / q).ln() + (1.0 - p) * ((1.0 - p) / (1.0 - q)).ln()
}

/// Upper confidence bound: the smallest `q >= p` with KL(p, q) at `level`.
pub fn dup_bernoulli(p: f64, level: f64) -> f64 {
    let mut lm = p;
    let mut um = (p + (level / 2.0).sqrt()).min(1.0);
    for _ in 0..BOUND_BISECTION_STEPS {
        let qm = (um + lm) / 2.0;
        if kl_bernoulli(p, qm) > level {
            um = qm;
        } else {
            lm = qm;
        }
    }
    um
}

/// Lower confidence bound: the largest `q <= p` with KL(p, q) at `level`.
pub fn dlow_bernoulli(p: f64, level: f64) -> f64 {
    let mut um = p;
    let mut lm = (p - (level / 2.0).sqrt()).clamp(0.0, 1.0);
    for _ in 0..BOUND_BISECTION_STEPS {
        let qm = (um + lm) / 2.0;
        if kl_bernoulli(p, qm) > level {
            lm = qm;
        } else {
            um = qm;
        }
    }
    lm
}

/// Exploration rate for round `t` of KL-LUCB over `n_arms` arms.
///
/// `beta(t) = ln(k n t^alpha / delta) + ln ln(k n t^alpha / delta)` with
/// `alpha = 1.1`, `k = 405.5`.
pub fn compute_beta(n_arms: usize, t: usize, delta: f64) -> f64 {
    let temp = (LUCB_K * n_arms as f64 * (t as f64).powf(LUCB_ALPHA) / delta).ln();
    temp + temp.ln()
}

/// Information budget for validating one candidate, Bonferroni-corrected
/// over every candidate a beam of `beam_size` may test.
pub fn validity_beta(delta: f64, beam_size: usize, num_features: usize) -> f64 {
    let tests = 1.0 + beam_size.saturating_sub(1) as f64 * num_features as f64;
    (1.0 / (delta / tests)).ln()
}
