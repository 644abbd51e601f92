//! Core anchor search.
//!
//! An anchor is a conjunction of feature predicates that "anchors" a
//! black-box prediction: as long as the predicates hold, the prediction
//! stays the same with high probability. This crate holds the search
//! machinery and knows nothing about concrete data types; perturbation and
//! prediction sit behind the [`Sampler`] trait.
//!
//! # Features
//!
//! - `parallel`: scan the coverage reference matrix with rayon
//!
//! # Usage
//!
//! This crate is typically used through the `anchors` crate, which provides
//! a tabular sampler, a default black-box optimizer, configuration and output
//! formatting. Custom samplers plug in directly:
//!
//! ```ignore
//! use anchors_core::{search, CoverageData, GreedyParams, SearchContext, SearchStrategy};
//!
//! let ctx = SearchContext::new(coverage_data);
//! let anchor = search::run(&ctx, my_sampler, SearchStrategy::Greedy(GreedyParams::default()))?;
//! ```

pub mod bandit;
pub mod bounds;
pub mod candidate;
pub mod constants;
pub mod coverage;
pub mod error;
pub mod optimizer;
pub mod sampler;
pub mod search;
pub mod verify;

// Re-export commonly used items at crate root
pub use bandit::KlLucb;
pub use candidate::AnchorCandidate;
pub use coverage::CoverageData;
pub use error::{AnchorError, AnchorResult, SamplerError};
pub use optimizer::{BlackBoxOptimizer, ConfigSpace, Configuration, Objective, TrialInfo};
pub use sampler::{PrecisionSource, SampleBatch, Sampler};
pub use search::{
    default_objective, BeamParams, BlackBoxParams, GreedyParams, SearchContext, SearchRun,
    SearchStrategy,
};
pub use verify::{is_valid, ValidityCheck};
