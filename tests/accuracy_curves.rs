//! Integration tests for the accuracy-curve engine and Gini computation.

use loan_models::curves::{accuracy_curve, calculate_gini, count_true_false_by_score};
use loan_models::error::CurveError;

// ---------------------------------------------------------------------------
// Worked reference scenario
// ---------------------------------------------------------------------------

#[test]
fn four_point_reference_curve() {
    let labels = vec![true, false, true, false];
    let scores = vec![0.9, 0.8, 0.4, 0.1];

    let curve = accuracy_curve(&labels, &scores).unwrap();

    assert_eq!(curve.threshold, vec![0.9, 0.8, 0.4, 0.1]);
    assert_eq!(curve.true_pos, vec![1, 1, 2, 2]);
    assert_eq!(curve.false_pos, vec![0, 1, 1, 2]);
    assert_eq!(curve.true_neg, vec![2, 1, 1, 0]);
    assert_eq!(curve.false_neg, vec![1, 1, 0, 0]);
    assert_eq!(curve.recall, vec![0.5, 0.5, 1.0, 1.0]);
    assert_eq!(curve.fallout, vec![0.0, 0.5, 0.5, 1.0]);

    // AUC over (fallout, recall) is 0.75, so gini = 2 * 0.75 - 1.
    let gini = calculate_gini(&curve.fallout, &curve.recall);
    assert!((gini - 0.5).abs() < 1e-12, "gini was {}", gini);
}

// ---------------------------------------------------------------------------
// Edge cases
// ---------------------------------------------------------------------------

#[test]
fn single_observation_has_one_bucket() {
    let buckets = count_true_false_by_score(&[true], &[0.7]).unwrap();
    assert_eq!(buckets.score, vec![0.7]);
    assert_eq!(buckets.n_true, vec![1]);
    assert_eq!(buckets.n_false, vec![0]);

    // A lone positive has no negatives, so the curve itself is refused.
    let err = accuracy_curve(&[true], &[0.7]).unwrap_err();
    assert!(matches!(err, CurveError::SingleClass { .. }));
}

#[test]
fn single_observation_per_class() {
    let curve = accuracy_curve(&[true, false], &[0.8, 0.3]).unwrap();
    assert_eq!(curve.recall, vec![1.0, 1.0]);
    assert_eq!(curve.fallout, vec![0.0, 1.0]);
}

#[test]
fn all_positive_labels_yield_single_class_error() {
    let labels = vec![true; 5];
    let scores = vec![0.9, 0.7, 0.5, 0.3, 0.1];
    let err = accuracy_curve(&labels, &scores).unwrap_err();
    assert_eq!(
        err,
        CurveError::SingleClass {
            positives: 5,
            negatives: 0
        }
    );
}

#[test]
fn all_negative_labels_yield_single_class_error() {
    let labels = vec![false; 3];
    let scores = vec![0.9, 0.5, 0.1];
    let err = accuracy_curve(&labels, &scores).unwrap_err();
    assert_eq!(
        err,
        CurveError::SingleClass {
            positives: 0,
            negatives: 3
        }
    );
}

#[test]
fn tied_scores_share_a_threshold() {
    let labels = vec![true, false, true, false];
    let scores = vec![0.5, 0.5, 0.5, 0.5];

    let curve = accuracy_curve(&labels, &scores).unwrap();
    assert_eq!(curve.len(), 1);
    assert_eq!(curve.true_pos, vec![2]);
    assert_eq!(curve.false_pos, vec![2]);
    assert_eq!(curve.recall, vec![1.0]);
    assert_eq!(curve.fallout, vec![1.0]);
}

// ---------------------------------------------------------------------------
// Gini behavior
// ---------------------------------------------------------------------------

#[test]
fn inverted_scores_have_negative_gini() {
    // Scores anti-correlated with the labels.
    let labels = vec![false, false, true, true];
    let scores = vec![0.9, 0.8, 0.2, 0.1];
    let curve = accuracy_curve(&labels, &scores).unwrap();
    let gini = calculate_gini(&curve.fallout, &curve.recall);
    assert!((gini + 1.0).abs() < 1e-12, "gini was {}", gini);
}

#[test]
fn gini_handles_unsorted_inputs() {
    // calculate_gini sorts by fallout itself; feeding points out of order
    // must not change the result.
    let fallout = vec![1.0, 0.0, 0.5, 0.5];
    let recall = vec![1.0, 0.5, 1.0, 0.5];
    let gini = calculate_gini(&fallout, &recall);
    assert!((gini - 0.5).abs() < 1e-12, "gini was {}", gini);
}

#[test]
#[should_panic(expected = "equal lengths")]
fn gini_mismatched_lengths_panics() {
    let _ = calculate_gini(&[0.0, 1.0], &[1.0]);
}
