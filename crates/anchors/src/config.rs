//! Configuration for anchor explanations.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use anchors_core::constants::{
    DEFAULT_BATCH_SIZE, DEFAULT_DELTA, DEFAULT_EPSILON, DEFAULT_EPS_STOP,
    DEFAULT_MAX_BANDIT_ROUNDS,
};
use anchors_core::{AnchorError, Objective};
use serde::{Deserialize, Serialize};

/// Default size of the coverage reference sample.
pub const DEFAULT_NUM_COVERAGE_SAMPLES: usize = 10_000;

/// Default seed for samplers and the black-box optimizer.
pub const DEFAULT_SEED: u64 = 69;

/// Default wall-clock budget of the black-box search.
pub const DEFAULT_RUN_TIME: Duration = Duration::from_secs(10);

/// Engine-wide settings shared by every explanation.
///
/// Per-method settings live in [`MethodOptions`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // =========================================================================
    // Coverage
    // =========================================================================
    /// Perturbations drawn once per explanation to estimate coverage.
    ///
    /// Default: 10,000.
    pub num_coverage_samples: usize,

    // =========================================================================
    // Bandit and verifier
    // =========================================================================
    /// KL-LUCB stops once the upper bound of the best challenger is within
    /// `epsilon` of the lower bound of the weakest leader. Default: 0.1.
    pub epsilon: f64,

    /// Error probability of the bandit and the verifier. Default: 0.1.
    pub delta: f64,

    /// Samples per sampler call during the search. Default: 16.
    pub batch_size: usize,

    /// Verifier slack around the desired confidence. Default: 0.05.
    pub eps_stop: f64,

    /// Upper bound on KL-LUCB rounds per selection. Default: 10,000.
    pub max_bandit_rounds: usize,

    // =========================================================================
    // Reproducibility
    // =========================================================================
    /// Seed for the tabular sampler and the default optimizer. Default: 69.
    pub seed: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            num_coverage_samples: DEFAULT_NUM_COVERAGE_SAMPLES,
            epsilon: DEFAULT_EPSILON,
            delta: DEFAULT_DELTA,
            batch_size: DEFAULT_BATCH_SIZE,
            eps_stop: DEFAULT_EPS_STOP,
            max_bandit_rounds: DEFAULT_MAX_BANDIT_ROUNDS,
            seed: DEFAULT_SEED,
        }
    }
}

impl Config {
    /// Create a new configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a quick configuration for development.
    ///
    /// - 1,000 coverage samples
    /// - epsilon 0.15
    pub fn quick() -> Self {
        Self {
            num_coverage_samples: 1_000,
            epsilon: 0.15,
            ..Default::default()
        }
    }

    /// Create a thorough configuration for final explanations.
    ///
    /// - 50,000 coverage samples
    /// - epsilon 0.05
    /// - 32 sample batches
    pub fn thorough() -> Self {
        Self {
            num_coverage_samples: 50_000,
            epsilon: 0.05,
            batch_size: 32,
            ..Default::default()
        }
    }

    // =========================================================================
    // Builder methods
    // =========================================================================

    /// Set the coverage reference sample size.
    pub fn num_coverage_samples(mut self, n: usize) -> Self {
        assert!(n > 0, "num_coverage_samples must be positive");
        self.num_coverage_samples = n;
        self
    }

    /// Set the bandit tolerance.
    pub fn epsilon(mut self, epsilon: f64) -> Self {
        assert!(epsilon > 0.0 && epsilon < 1.0, "epsilon must be in (0, 1)");
        self.epsilon = epsilon;
        self
    }

    /// Set the error probability.
    pub fn delta(mut self, delta: f64) -> Self {
        assert!(delta > 0.0 && delta < 1.0, "delta must be in (0, 1)");
        self.delta = delta;
        self
    }

    /// Set the search batch size.
    pub fn batch_size(mut self, size: usize) -> Self {
        assert!(size > 0, "batch_size must be positive");
        self.batch_size = size;
        self
    }

    /// Set the verifier slack.
    pub fn eps_stop(mut self, eps_stop: f64) -> Self {
        assert!(eps_stop > 0.0 && eps_stop < 1.0, "eps_stop must be in (0, 1)");
        self.eps_stop = eps_stop;
        self
    }

    /// Set the KL-LUCB round cap.
    pub fn max_bandit_rounds(mut self, rounds: usize) -> Self {
        assert!(rounds > 0, "max_bandit_rounds must be positive");
        self.max_bandit_rounds = rounds;
        self
    }

    /// Set the seed.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    // =========================================================================
    // Validation
    // =========================================================================

    /// Check if the configuration is valid.
    ///
    /// Returns an error message if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.num_coverage_samples == 0 {
            return Err("num_coverage_samples must be positive".to_string());
        }
        if self.epsilon <= 0.0 || self.epsilon >= 1.0 {
            return Err("epsilon must be in (0, 1)".to_string());
        }
        if self.delta <= 0.0 || self.delta >= 1.0 {
            return Err("delta must be in (0, 1)".to_string());
        }
        if self.batch_size == 0 {
            return Err("batch_size must be positive".to_string());
        }
        if self.eps_stop <= 0.0 || self.eps_stop >= 1.0 || self.eps_stop.is_nan() {
            return Err("eps_stop must be in (0, 1)".to_string());
        }
        if self.max_bandit_rounds == 0 {
            return Err("max_bandit_rounds must be positive".to_string());
        }
        Ok(())
    }
}

/// Search strategy selected by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    /// Extend the best anchor one feature at a time.
    Greedy,
    /// Beam search over anchor sizes.
    Beam,
    /// Budgeted black-box optimization over feature subsets.
    Smac,
}

impl Method {
    /// Name accepted by [`FromStr`].
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Greedy => "greedy",
            Method::Beam => "beam",
            Method::Smac => "smac",
        }
    }
}

impl FromStr for Method {
    type Err = AnchorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "greedy" => Ok(Method::Greedy),
            "beam" => Ok(Method::Beam),
            "smac" => Ok(Method::Smac),
            other => Err(AnchorError::UnsupportedMethod(other.to_string())),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-call options. Unset fields fall back to the method's defaults.
///
/// | Field | Used by | Default |
/// |---|---|---|
/// | `desired_confidence` | greedy, beam | 1.0 greedy, 0.95 beam |
/// | `min_coverage` | greedy | 0.2 |
/// | `beam_size` | beam | 2 |
/// | `max_anchor_size` | beam | features - 1 |
/// | `run_time` | smac | 10 s |
/// | `max_evaluations` | smac | unlimited |
/// | `objective` | smac | precision loss plus relative size |
#[derive(Default)]
pub struct MethodOptions {
    pub desired_confidence: Option<f64>,
    pub min_coverage: Option<f64>,
    pub beam_size: Option<usize>,
    pub max_anchor_size: Option<usize>,
    pub run_time: Option<Duration>,
    pub max_evaluations: Option<usize>,
    pub objective: Option<Objective>,
}

impl MethodOptions {
    /// Options with every field unset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the precision an anchor must reach.
    pub fn desired_confidence(mut self, confidence: f64) -> Self {
        assert!(
            confidence > 0.0 && confidence <= 1.0,
            "desired_confidence must be in (0, 1]"
        );
        self.desired_confidence = Some(confidence);
        self
    }

    /// Set the greedy coverage floor.
    pub fn min_coverage(mut self, coverage: f64) -> Self {
        assert!(
            (0.0..=1.0).contains(&coverage),
            "min_coverage must be in [0, 1]"
        );
        self.min_coverage = Some(coverage);
        self
    }

    /// Set the beam width.
    pub fn beam_size(mut self, size: usize) -> Self {
        assert!(size > 0, "beam_size must be positive");
        self.beam_size = Some(size);
        self
    }

    /// Set the largest anchor size beam search explores.
    pub fn max_anchor_size(mut self, size: usize) -> Self {
        self.max_anchor_size = Some(size);
        self
    }

    /// Set the black-box wall-clock budget.
    pub fn run_time(mut self, budget: Duration) -> Self {
        self.run_time = Some(budget);
        self
    }

    /// Set the black-box wall-clock budget in seconds.
    pub fn run_time_secs(self, secs: u64) -> Self {
        self.run_time(Duration::from_secs(secs))
    }

    /// Cap the number of black-box evaluations.
    pub fn max_evaluations(mut self, n: usize) -> Self {
        assert!(n > 0, "max_evaluations must be positive");
        self.max_evaluations = Some(n);
        self
    }

    /// Set the black-box objective to minimize.
    pub fn objective(mut self, objective: Objective) -> Self {
        self.objective = Some(objective);
        self
    }
}

impl fmt::Debug for MethodOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodOptions")
            .field("desired_confidence", &self.desired_confidence)
            .field("min_coverage", &self.min_coverage)
            .field("beam_size", &self.beam_size)
            .field("max_anchor_size", &self.max_anchor_size)
            .field("run_time", &self.run_time)
            .field("max_evaluations", &self.max_evaluations)
            .field("objective", &self.objective.as_ref().map(|_| "<fn>"))
            .finish()
    }
}
