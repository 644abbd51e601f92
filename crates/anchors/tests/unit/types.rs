//! Tests for public types: candidates, coverage data and output.

use anchors::output::{format_rule, to_json, to_json_pretty};
use anchors::{AnchorCandidate, AnchorError, CoverageData, SamplerError};

#[test]
fn candidate_drops_duplicate_features() {
    let candidate = AnchorCandidate::new(vec![3, 1, 3, 0, 1]);
    assert_eq!(candidate.feature_mask, vec![3, 1, 0]);
    assert_eq!(candidate.canonical_mask(), vec![0, 1, 3]);
    assert_eq!(candidate.len(), 3);
}

#[test]
fn candidate_precision_guarded() {
    let mut candidate = AnchorCandidate::empty();
    assert_eq!(candidate.precision, 0.0);

    candidate.update_precision(0, 0);
    assert_eq!(candidate.precision, 0.0);

    candidate.update_precision(3, 4);
    candidate.update_precision(1, 4);
    assert_eq!(candidate.precision, 0.5);
    assert_eq!(candidate.n_samples, 8);
    assert_eq!(candidate.positive_samples, 4);
}

#[test]
fn coverage_shrinks_as_mask_grows() {
    let rows = vec![
        vec![true, true, true],
        vec![true, true, false],
        vec![true, false, false],
        vec![false, false, false],
    ];
    let data = CoverageData::from_rows(3, &rows).unwrap();

    assert_eq!(data.coverage(&[]), 1.0);
    assert_eq!(data.coverage(&[0]), 0.75);
    assert_eq!(data.coverage(&[0, 1]), 0.5);
    assert_eq!(data.coverage(&[0, 1, 2]), 0.25);
}

#[test]
fn coverage_rejects_ragged_rows() {
    let rows = vec![vec![true, true], vec![true]];
    assert!(matches!(
        CoverageData::from_rows(2, &rows),
        Err(AnchorError::InvalidInput(_))
    ));
}

#[test]
fn sampler_error_converts_to_explanation_failure() {
    let err: AnchorError = SamplerError::Prediction("model crashed".to_string()).into();
    assert_eq!(
        err.to_string(),
        "explanation failed: prediction failed: model crashed"
    );
}

#[test]
fn json_output_is_stable() {
    let mut anchor = AnchorCandidate::new(vec![1]);
    anchor.coverage = 0.5;
    anchor.update_precision(4, 4);

    assert_eq!(
        to_json(&anchor).unwrap(),
        r#"{"feature_mask":[1],"precision":1.0,"coverage":0.5,"n_samples":4,"positive_samples":4}"#
    );
    assert!(to_json_pretty(&anchor).unwrap().starts_with("{\n"));
}

#[test]
fn rule_lists_features_in_insertion_order() {
    let names: Vec<String> = ["a = 1", "b = 2", "c = 3"].map(String::from).into();
    let anchor = AnchorCandidate::new(vec![2, 0]);
    assert_eq!(format_rule(&anchor, &names, "spam"), "IF c = 3 AND a = 1 THEN predict spam");
}
