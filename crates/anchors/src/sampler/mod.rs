//! Perturbation samplers.
//!
//! Any [`Sampler`](anchors_core::Sampler) works with the explainer. This
//! module ships the tabular one used by
//! [`AnchorExplainer::explain_instance`](crate::AnchorExplainer::explain_instance).

mod tabular;

pub use tabular::{Classifier, Fallible, TabularOptions, TabularSampler};
