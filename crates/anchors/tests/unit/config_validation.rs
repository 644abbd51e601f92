//! Tests for configuration validation.
//!
//! Invalid values are rejected by the builder methods with panic messages
//! naming the field.

use std::time::Duration;

use anchors::{AnchorError, AnchorExplainer, Config, Method, MethodOptions};

// =============================================================================
// EXPLAINER BUILDERS
// =============================================================================

#[test]
#[should_panic(expected = "epsilon must be in (0, 1)")]
fn epsilon_zero_panics() {
    let _ = AnchorExplainer::new().epsilon(0.0);
}

#[test]
#[should_panic(expected = "epsilon must be in (0, 1)")]
fn epsilon_one_panics() {
    let _ = AnchorExplainer::new().epsilon(1.0);
}

#[test]
#[should_panic(expected = "delta must be in (0, 1)")]
fn delta_negative_panics() {
    let _ = AnchorExplainer::new().delta(-0.1);
}

#[test]
#[should_panic(expected = "batch_size must be positive")]
fn batch_size_zero_panics() {
    let _ = AnchorExplainer::new().batch_size(0);
}

#[test]
#[should_panic(expected = "num_coverage_samples must be positive")]
fn coverage_samples_zero_panics() {
    let _ = AnchorExplainer::new().num_coverage_samples(0);
}

#[test]
fn builder_values_reach_config() {
    let explainer = AnchorExplainer::new()
        .epsilon(0.05)
        .delta(0.01)
        .batch_size(1)
        .num_coverage_samples(1)
        .seed(u64::MAX);
    let config = explainer.config();
    assert_eq!(config.epsilon, 0.05);
    assert_eq!(config.delta, 0.01);
    assert_eq!(config.batch_size, 1);
    assert_eq!(config.num_coverage_samples, 1);
    assert_eq!(config.seed, u64::MAX);
}

#[test]
fn with_config_keeps_preset() {
    let explainer = AnchorExplainer::with_config(Config::quick());
    assert_eq!(explainer.config(), &Config::quick());
}

// =============================================================================
// CONFIG VALIDATION
// =============================================================================

#[test]
fn config_validate_rejects_out_of_range() {
    let mut config = Config::default();
    config.eps_stop = 1.0;
    assert_eq!(config.validate().unwrap_err(), "eps_stop must be in (0, 1)");

    let mut config = Config::default();
    config.max_bandit_rounds = 0;
    assert!(config.validate().is_err());
}

#[test]
fn config_validate_rejects_zero_eps_stop() {
    let config = Config {
        eps_stop: 0.0,
        ..Config::default()
    };
    assert_eq!(config.validate().unwrap_err(), "eps_stop must be in (0, 1)");
}

#[test]
#[should_panic(expected = "eps_stop must be in (0, 1)")]
fn eps_stop_panics() {
    let _ = Config::new().eps_stop(1.5);
}

#[test]
#[should_panic(expected = "eps_stop must be in (0, 1)")]
fn eps_stop_zero_panics() {
    let _ = Config::new().eps_stop(0.0);
}

// =============================================================================
// METHOD OPTIONS
// =============================================================================

#[test]
#[should_panic(expected = "desired_confidence must be in (0, 1]")]
fn desired_confidence_zero_panics() {
    let _ = MethodOptions::new().desired_confidence(0.0);
}

#[test]
fn desired_confidence_one_valid() {
    let opts = MethodOptions::new().desired_confidence(1.0);
    assert_eq!(opts.desired_confidence, Some(1.0));
}

#[test]
#[should_panic(expected = "beam_size must be positive")]
fn beam_size_zero_panics() {
    let _ = MethodOptions::new().beam_size(0);
}

#[test]
#[should_panic(expected = "min_coverage must be in [0, 1]")]
fn min_coverage_above_one_panics() {
    let _ = MethodOptions::new().min_coverage(1.5);
}

#[test]
fn run_time_seconds() {
    let opts = MethodOptions::new().run_time_secs(3);
    assert_eq!(opts.run_time, Some(Duration::from_secs(3)));
}

// =============================================================================
// METHOD NAMES
// =============================================================================

#[test]
fn method_names_round_trip() {
    for method in [Method::Greedy, Method::Beam, Method::Smac] {
        assert_eq!(method.as_str().parse::<Method>().unwrap(), method);
    }
}

#[test]
fn method_names_are_case_sensitive() {
    assert!(matches!(
        "Greedy".parse::<Method>(),
        Err(AnchorError::UnsupportedMethod(name)) if name == "Greedy"
    ));
}
