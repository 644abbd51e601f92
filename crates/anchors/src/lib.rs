//! # anchors
//!
//! Explain individual predictions of black-box classifiers with anchors.
//!
//! An anchor is a conjunction of feature predicates such that, as long as
//! the predicates hold, the model's prediction stays the same with high
//! probability. Every anchor comes with:
//! - a precision estimate backed by KL confidence bounds
//! - its coverage over a reference sample
//! - the number of perturbations the estimate rests on
//!
//! Three search methods are available: `greedy`, `beam` and `smac`
//! (budgeted black-box optimization over feature subsets).
//!
//! ## Quick Start
//!
//! ```ignore
//! use anchors::{output, AnchorExplainer, MethodOptions, TabularOptions, TabularSampler};
//!
//! let explainer = AnchorExplainer::new().seed(7);
//! let mut sampler = TabularSampler::new(&instance, TabularOptions::new(dataset), model, 7)?;
//! let anchor = explainer.explain(&mut sampler, "beam", MethodOptions::new())?;
//!
//! println!(
//!     "{}",
//!     output::format_anchor(&anchor, &sampler.predicate_names(), sampler.target())
//! );
//! ```
//!
//! ## Logging
//!
//! The crate logs through `tracing` and never installs a subscriber.
//! Search stages log at `info`, bandit rounds and trials at `debug`.

pub mod config;
pub mod explainer;
pub mod optimizer;
pub mod output;
pub mod sampler;

pub use config::{Config, Method, MethodOptions};
pub use explainer::AnchorExplainer;
pub use optimizer::LocalSearchOptimizer;
pub use sampler::{Classifier, Fallible, TabularOptions, TabularSampler};

// Re-export the core types callers need.
pub use anchors_core::{
    AnchorCandidate, AnchorError, AnchorResult, BlackBoxOptimizer, ConfigSpace, Configuration,
    CoverageData, Objective, SampleBatch, Sampler, SamplerError, TrialInfo,
};
