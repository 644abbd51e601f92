//! End-to-end explanations on binary tabular data.

use std::time::Duration;

use anchors::output::format_anchor;
use anchors::{
    AnchorError, AnchorExplainer, Config, Fallible, MethodOptions, SamplerError, TabularOptions,
    TabularSampler,
};
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

const FEATURES: usize = 5;

/// Uniform random binary rows.
fn binary_dataset(rows: usize, seed: u64) -> Vec<Vec<f64>> {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
    (0..rows)
        .map(|_| (0..FEATURES).map(|_| rng.random_range(0..2) as f64).collect())
        .collect()
}

fn constant(rows: &[Vec<f64>]) -> Vec<usize> {
    vec![1; rows.len()]
}

/// Predicts 1 only when features 0 and 1 are both set.
fn both_first_features(rows: &[Vec<f64>]) -> Vec<usize> {
    rows.iter()
        .map(|r| usize::from(r[0] == 1.0 && r[1] == 1.0))
        .collect()
}

fn explainer() -> AnchorExplainer {
    AnchorExplainer::new().num_coverage_samples(2_000).seed(11)
}

// =============================================================================
// CONSTANT MODEL
// =============================================================================

#[test]
fn constant_model_singleton_anchor() {
    let anchor = explainer()
        .explain_instance(
            &[1.0; FEATURES],
            constant,
            "greedy",
            TabularOptions::new(binary_dataset(256, 1)),
            MethodOptions::new().desired_confidence(0.95).min_coverage(0.0),
        )
        .unwrap();

    assert_eq!(anchor.len(), 1);
    assert_eq!(anchor.precision, 1.0);
    assert!(anchor.n_samples > 0);
    assert!(anchor.coverage > 0.3 && anchor.coverage < 0.7);
}

#[test]
fn constant_model_smac_prefers_empty_anchor() {
    let anchor = explainer()
        .explain_instance(
            &[1.0; FEATURES],
            constant,
            "smac",
            TabularOptions::new(binary_dataset(256, 2)),
            MethodOptions::new()
                .run_time(Duration::from_secs(600))
                .max_evaluations(40),
        )
        .unwrap();

    // 32 configurations fit in the cap, so the empty mask is scored.
    assert!(anchor.is_empty());
    assert_eq!(anchor.precision, 1.0);
    assert_eq!(anchor.coverage, 1.0);
    assert_eq!(anchor.n_samples, explainer().config().batch_size);
}

// =============================================================================
// CONJUNCTION MODEL
// =============================================================================

#[test]
fn conjunction_model_greedy_finds_both_features() {
    let anchor = explainer()
        .explain_instance(
            &[1.0, 1.0, 0.0, 1.0, 0.0],
            both_first_features,
            "greedy",
            TabularOptions::new(binary_dataset(512, 3)),
            MethodOptions::new().desired_confidence(0.95).min_coverage(0.1),
        )
        .unwrap();

    assert_eq!(anchor.canonical_mask(), vec![0, 1]);
    assert!(anchor.precision >= 0.95);
}

#[test]
fn conjunction_model_beam_finds_both_features() {
    let anchor = explainer()
        .explain_instance(
            &[1.0, 1.0, 0.0, 1.0, 0.0],
            both_first_features,
            "beam",
            TabularOptions::new(binary_dataset(512, 4)),
            MethodOptions::new().beam_size(2).desired_confidence(0.95),
        )
        .unwrap();

    assert_eq!(anchor.canonical_mask(), vec![0, 1]);
    assert!(anchor.coverage > 0.1 && anchor.coverage < 0.4);
}

#[test]
fn smac_respects_evaluation_cap() {
    let anchor = explainer()
        .explain_instance(
            &[1.0, 1.0, 0.0, 1.0, 0.0],
            both_first_features,
            "smac",
            TabularOptions::new(binary_dataset(512, 5)),
            MethodOptions::new()
                .run_time(Duration::from_secs(600))
                .max_evaluations(3),
        )
        .unwrap();

    // Every configuration is sampled exactly once.
    assert_eq!(anchor.n_samples, explainer().config().batch_size);
}

#[test]
fn explain_with_borrowed_sampler_and_format() {
    let mut sampler = TabularSampler::new(
        &[1.0, 1.0, 0.0, 1.0, 0.0],
        TabularOptions::new(binary_dataset(512, 6))
            .feature_names(["fever", "cough", "rash", "age", "smoker"]),
        both_first_features,
        11,
    )
    .unwrap();

    let anchor = explainer()
        .explain(&mut sampler, "beam", MethodOptions::new())
        .unwrap();

    colored::control::set_override(false);
    let text = format_anchor(&anchor, &sampler.predicate_names(), sampler.target());
    assert!(text.contains("fever = 1"));
    assert!(text.contains("cough = 1"));
    assert!(text.contains("THEN predict 1"));
}

// =============================================================================
// ERROR PATHS
// =============================================================================

#[test]
fn unknown_method_is_rejected() {
    let err = explainer()
        .explain_instance(
            &[1.0; FEATURES],
            constant,
            "anneal",
            TabularOptions::new(binary_dataset(16, 7)),
            MethodOptions::new(),
        )
        .unwrap_err();

    assert_eq!(err, AnchorError::UnsupportedMethod("anneal".to_string()));
}

#[test]
fn predictor_label_count_mismatch_on_instance() {
    let err = explainer()
        .explain_instance(
            &[1.0; FEATURES],
            |rows: &[Vec<f64>]| vec![1; rows.len() + 1],
            "greedy",
            TabularOptions::new(binary_dataset(16, 8)),
            MethodOptions::new(),
        )
        .unwrap_err();

    assert!(matches!(
        err,
        AnchorError::ExplanationFailure(SamplerError::Prediction(_))
    ));
}

#[test]
fn predictor_label_count_mismatch_mid_search() {
    // Labels the instance correctly, then drops a label on every batch.
    let err = explainer()
        .explain_instance(
            &[1.0; FEATURES],
            |rows: &[Vec<f64>]| vec![1; rows.len().saturating_sub(usize::from(rows.len() > 1))],
            "beam",
            TabularOptions::new(binary_dataset(16, 9)),
            MethodOptions::new(),
        )
        .unwrap_err();

    assert!(matches!(
        err,
        AnchorError::ExplanationFailure(SamplerError::Prediction(_))
    ));
}

#[test]
fn classifier_error_mid_search_is_explanation_failure() {
    // Labels the instance, then refuses every perturbation batch.
    let model = Fallible(|rows: &[Vec<f64>]| {
        if rows.len() == 1 {
            Ok(vec![1usize])
        } else {
            Err(SamplerError::Prediction("model offline".to_string()))
        }
    });
    let err = explainer()
        .explain_instance(
            &[1.0; FEATURES],
            model,
            "beam",
            TabularOptions::new(binary_dataset(16, 12)),
            MethodOptions::new(),
        )
        .unwrap_err();

    assert_eq!(
        err,
        AnchorError::ExplanationFailure(SamplerError::Prediction("model offline".to_string()))
    );
}

#[test]
fn zero_eps_stop_fails_instead_of_looping() {
    // Constant model, greedy's default target of 1.0: without slack the
    // verifier could never settle.
    let config = Config {
        eps_stop: 0.0,
        num_coverage_samples: 100,
        ..Config::default()
    };
    let err = AnchorExplainer::with_config(config)
        .explain_instance(
            &[1.0; FEATURES],
            constant,
            "greedy",
            TabularOptions::new(binary_dataset(64, 11)),
            MethodOptions::new(),
        )
        .unwrap_err();

    assert!(matches!(err, AnchorError::InvalidInput(_)));
}

#[test]
fn mismatched_dataset_width_is_invalid_input() {
    let err = explainer()
        .explain_instance(
            &[1.0; 3],
            constant,
            "greedy",
            TabularOptions::new(binary_dataset(16, 10)),
            MethodOptions::new(),
        )
        .unwrap_err();

    assert!(matches!(err, AnchorError::InvalidInput(_)));
}
