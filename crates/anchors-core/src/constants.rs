//! Constants shared by the bounds, the bandit and the search strategies.

/// Lower clamp applied to Bernoulli parameters before taking logarithms.
pub const KL_CLAMP_LOW: f64 = 0.0000001;

/// Upper clamp applied to Bernoulli parameters before taking logarithms.
pub const KL_CLAMP_HIGH: f64 = 0.9999999999999999;

/// Bisection steps used by the KL confidence bounds.
pub const BOUND_BISECTION_STEPS: usize = 16;

/// Exponent on the round counter in the LUCB exploration rate.
pub const LUCB_ALPHA: f64 = 1.1;

/// Constant factor in the LUCB exploration rate.
pub const LUCB_K: f64 = 405.5;

// =============================================================================
// Default configuration constants
// =============================================================================

/// Default bandit tolerance: stop once `ub(ut) - lb(lt) <= epsilon`.
pub const DEFAULT_EPSILON: f64 = 0.1;

/// Default family-wise error rate.
pub const DEFAULT_DELTA: f64 = 0.1;

/// Default number of samples drawn per sampler call.
pub const DEFAULT_BATCH_SIZE: usize = 16;

/// Default slack around the desired confidence used by the verifier.
pub const DEFAULT_EPS_STOP: f64 = 0.05;

/// Default cap on KL-LUCB rounds per selection.
pub const DEFAULT_MAX_BANDIT_ROUNDS: usize = 10_000;

/// Default precision a greedy anchor must reach.
pub const DEFAULT_GREEDY_CONFIDENCE: f64 = 1.0;

/// Default minimum coverage for greedy extensions.
pub const DEFAULT_MIN_COVERAGE: f64 = 0.2;

/// Default precision a beam anchor must reach.
pub const DEFAULT_BEAM_CONFIDENCE: f64 = 0.95;

/// Default beam width.
pub const DEFAULT_BEAM_SIZE: usize = 2;
