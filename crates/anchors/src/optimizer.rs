//! Default black-box optimizer: randomized local search over feature subsets.
//!
//! Starts with a random initial design, then mostly walks one-bit-flip
//! neighbours of the incumbent (the lowest score seen so far), with an
//! occasional random restart. Every configuration is proposed at most once.

use std::collections::BTreeSet;
use std::time::{Duration, Instant};

use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use tracing::debug;

use anchors_core::{BlackBoxOptimizer, ConfigSpace, Configuration, TrialInfo};

use crate::config::{DEFAULT_RUN_TIME, DEFAULT_SEED};

/// Random configurations proposed before local moves start.
pub const DEFAULT_N_INIT: usize = 10;

/// Probability of a random restart instead of a local move.
pub const DEFAULT_RANDOM_PROBABILITY: f64 = 0.2;

/// Random draws attempted before giving up on finding an unseen configuration.
const MAX_RANDOM_DRAWS: usize = 64;

/// Spaces up to this many dimensions are scanned exhaustively once random
/// draws and local moves stop finding unseen configurations.
const MAX_SCAN_DIMS: usize = 20;

/// Seeded local-search optimizer with a wall-clock budget.
#[derive(Debug, Clone)]
pub struct LocalSearchOptimizer {
    rng: Xoshiro256PlusPlus,
    run_time: Duration,
    max_evaluations: Option<usize>,
    n_init: usize,
    random_probability: f64,

    started: Option<Instant>,
    seen: BTreeSet<Configuration>,
    incumbent: Option<(f64, Configuration)>,
    evaluations: usize,
    space_exhausted: bool,
}

impl Default for LocalSearchOptimizer {
    fn default() -> Self {
        Self::new(DEFAULT_SEED)
    }
}

impl LocalSearchOptimizer {
    /// Create an optimizer seeded with `seed` and the default budget.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Xoshiro256PlusPlus::seed_from_u64(seed),
            run_time: DEFAULT_RUN_TIME,
            max_evaluations: None,
            n_init: DEFAULT_N_INIT,
            random_probability: DEFAULT_RANDOM_PROBABILITY,
            started: None,
            seen: BTreeSet::new(),
            incumbent: None,
            evaluations: 0,
            space_exhausted: false,
        }
    }

    /// Set the wall-clock budget. The clock starts at the first proposal;
    /// a zero budget allows none.
    pub fn run_time(mut self, budget: Duration) -> Self {
        self.run_time = budget;
        self
    }

    /// Cap the number of evaluations.
    pub fn max_evaluations(mut self, cap: Option<usize>) -> Self {
        self.max_evaluations = cap;
        self
    }

    /// Set the size of the random initial design.
    pub fn n_init(mut self, n: usize) -> Self {
        self.n_init = n;
        self
    }

    /// Set the random-restart probability.
    pub fn random_probability(mut self, p: f64) -> Self {
        assert!((0.0..=1.0).contains(&p), "random_probability must be in [0, 1]");
        self.random_probability = p;
        self
    }

    /// Evaluations observed so far.
    pub fn evaluations(&self) -> usize {
        self.evaluations
    }

    /// Lowest observed score and its configuration.
    pub fn incumbent(&self) -> Option<(f64, &[bool])> {
        self.incumbent
            .as_ref()
            .map(|(score, config)| (*score, config.as_slice()))
    }

    fn random_config(&mut self, n_dims: usize) -> Option<Configuration> {
        for _ in 0..MAX_RANDOM_DRAWS {
            let config: Configuration = (0..n_dims).map(|_| self.rng.random_bool(0.5)).collect();
            if !self.seen.contains(&config) {
                return Some(config);
            }
        }
        None
    }

    fn neighbour_of_incumbent(&mut self) -> Option<Configuration> {
        let (_, incumbent) = self.incumbent.as_ref()?;
        let unseen: Vec<Configuration> = (0..incumbent.len())
            .map(|i| {
                let mut flipped = incumbent.clone();
                flipped[i] = !flipped[i];
                flipped
            })
            .filter(|c| !self.seen.contains(c))
            .collect();
        if unseen.is_empty() {
            return None;
        }
        let pick = self.rng.random_range(0..unseen.len());
        unseen.into_iter().nth(pick)
    }

    fn first_unseen(&self, space: &ConfigSpace) -> Option<Configuration> {
        if space.n_dims > MAX_SCAN_DIMS {
            return None;
        }
        (0..1usize << space.n_dims)
            .map(|bits| (0..space.n_dims).map(|i| bits & (1 << i) != 0).collect())
            .find(|c: &Configuration| !self.seen.contains(c))
    }
}

impl BlackBoxOptimizer for LocalSearchOptimizer {
    fn propose(&mut self, space: &ConfigSpace) -> Option<Configuration> {
        self.started.get_or_insert_with(Instant::now);

        if space
            .cardinality()
            .is_some_and(|total| self.seen.len() as u128 >= total)
        {
            self.space_exhausted = true;
            return None;
        }

        let explore = self.seen.len() < self.n_init
            || self.incumbent.is_none()
            || self.rng.random_bool(self.random_probability);
        let proposal = if explore {
            self.random_config(space.n_dims)
                .or_else(|| self.neighbour_of_incumbent())
        } else {
            self.neighbour_of_incumbent()
                .or_else(|| self.random_config(space.n_dims))
        }
        .or_else(|| self.first_unseen(space));

        match proposal {
            Some(config) => {
                self.seen.insert(config.clone());
                Some(config)
            }
            None => {
                debug!(proposed = self.seen.len(), "no unseen configuration found");
                self.space_exhausted = true;
                None
            }
        }
    }

    fn observe(&mut self, config: &[bool], score: f64, _info: TrialInfo) {
        self.evaluations += 1;
        let improves = self
            .incumbent
            .as_ref()
            .map_or(true, |(best, _)| score < *best);
        if improves {
            self.incumbent = Some((score, config.to_vec()));
        }
    }

    fn budget_exhausted(&self) -> bool {
        if self.space_exhausted {
            return true;
        }
        if self.run_time.is_zero() || self.max_evaluations.is_some_and(|cap| self.evaluations >= cap) {
            return true;
        }
        self.started
            .is_some_and(|start| start.elapsed() >= self.run_time)
    }
}
