//! Empirical ROC curve construction and Gini computation.
//!
//! Scores are bucketed by exact value, the confusion matrix is accumulated
//! over buckets from the highest threshold downward, and the Gini
//! coefficient is derived from the trapezoidal area under the
//! (fallout, recall) curve.
use std::collections::HashMap;

use crate::error::CurveError;

/// Unique score values observed in a sample, with per-score label counts.
///
/// Scores are sorted ascending; `n_true` and `n_false` are aligned with
/// `score`. The counts across all buckets sum to the sample size.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreBuckets {
    pub score: Vec<f64>,
    pub n_true: Vec<usize>,
    pub n_false: Vec<usize>,
}

/// Per-threshold confusion counts and rates, ordered by descending
/// threshold. An observation counts as positive-predicted at threshold `t`
/// when its score is >= `t`.
#[derive(Debug, Clone, PartialEq)]
pub struct AccuracyCurve {
    pub threshold: Vec<f64>,
    pub true_pos: Vec<usize>,
    pub true_neg: Vec<usize>,
    pub false_pos: Vec<usize>,
    pub false_neg: Vec<usize>,
    pub recall: Vec<f64>,
    pub fallout: Vec<f64>,
}

impl AccuracyCurve {
    pub fn len(&self) -> usize {
        self.threshold.len()
    }

    pub fn is_empty(&self) -> bool {
        self.threshold.is_empty()
    }
}

/// Group observations by exact score value and count true/false labels per
/// unique score. Required for making ROC curves when scores are not
/// necessarily unique.
///
/// # Arguments
///
/// * `y_true` - Boolean ground-truth labels
/// * `y_score` - Corresponding scores, same length
///
/// # Returns
///
/// `ScoreBuckets` with unique scores sorted ascending.
pub fn count_true_false_by_score(
    y_true: &[bool],
    y_score: &[f64],
) -> Result<ScoreBuckets, CurveError> {
    assert_eq!(
        y_true.len(),
        y_score.len(),
        "Labels and scores must have equal lengths"
    );
    if y_true.is_empty() {
        return Err(CurveError::EmptyInput);
    }

    let nan_count = y_score.iter().filter(|s| s.is_nan()).count();
    if nan_count > 0 {
        return Err(CurveError::NaNFound(nan_count));
    }

    // Key on the bit pattern; scores are NaN-free so equal bits means equal
    // values and the final ordering comes from a numeric sort.
    let mut counts: HashMap<u64, (f64, usize, usize)> = HashMap::new();
    for (&yt, &ys) in y_true.iter().zip(y_score.iter()) {
        let entry = counts.entry(ys.to_bits()).or_insert((ys, 0, 0));
        if yt {
            entry.1 += 1;
        } else {
            entry.2 += 1;
        }
    }

    let mut buckets: Vec<(f64, usize, usize)> = counts.into_values().collect();
    buckets.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap());

    Ok(ScoreBuckets {
        score: buckets.iter().map(|b| b.0).collect(),
        n_true: buckets.iter().map(|b| b.1).collect(),
        n_false: buckets.iter().map(|b| b.2).collect(),
    })
}

/// Build the accuracy curve for a scored binary sample.
///
/// Buckets the sample by unique score, then sweeps thresholds from the
/// highest score downward accumulating the confusion matrix:
/// `true_neg = F - false_pos` and `false_neg = T - true_pos`, where `T` and
/// `F` are the total positive and negative counts.
///
/// # Errors
///
/// Returns `CurveError::SingleClass` when the sample contains only one
/// class, since recall or fallout would be undefined (0/0).
pub fn accuracy_curve(y_true: &[bool], y_score: &[f64]) -> Result<AccuracyCurve, CurveError> {
    let buckets = count_true_false_by_score(y_true, y_score)?;

    let total_true: usize = buckets.n_true.iter().sum();
    let total_false: usize = buckets.n_false.iter().sum();
    if total_true == 0 || total_false == 0 {
        return Err(CurveError::SingleClass {
            positives: total_true,
            negatives: total_false,
        });
    }

    let n_buckets = buckets.score.len();
    let mut curve = AccuracyCurve {
        threshold: Vec::with_capacity(n_buckets),
        true_pos: Vec::with_capacity(n_buckets),
        true_neg: Vec::with_capacity(n_buckets),
        false_pos: Vec::with_capacity(n_buckets),
        false_neg: Vec::with_capacity(n_buckets),
        recall: Vec::with_capacity(n_buckets),
        fallout: Vec::with_capacity(n_buckets),
    };

    let mut true_pos = 0usize;
    let mut false_pos = 0usize;

    // Descending-score traversal over the ascending buckets.
    for i in (0..n_buckets).rev() {
        true_pos += buckets.n_true[i];
        false_pos += buckets.n_false[i];

        let true_neg = total_false - false_pos;
        let false_neg = total_true - true_pos;

        curve.threshold.push(buckets.score[i]);
        curve.true_pos.push(true_pos);
        curve.true_neg.push(true_neg);
        curve.false_pos.push(false_pos);
        curve.false_neg.push(false_neg);
        curve.recall.push(true_pos as f64 / (true_pos + false_neg) as f64);
        curve.fallout.push(false_pos as f64 / (false_pos + true_neg) as f64);
    }

    Ok(curve)
}

/// Calculate the Gini coefficient from fallout and recall.
///
/// Points are sorted by fallout with recall as a tie breaker, then recall
/// is integrated over fallout with the trapezoidal rule and the area is
/// rescaled: `gini = 2 * auc - 1`.
pub fn calculate_gini(fallout: &[f64], recall: &[f64]) -> f64 {
    assert_eq!(
        fallout.len(),
        recall.len(),
        "Fallout and recall must have equal lengths"
    );

    // Approximate tie-break: fallout values closer together than
    // 1e-9 * recall can still be misordered. Kept for parity with the
    // historical behavior of this computation.
    let mut order: Vec<usize> = (0..fallout.len()).collect();
    order.sort_by(|&a, &b| {
        let ka = fallout[a] + 1e-9 * recall[a];
        let kb = fallout[b] + 1e-9 * recall[b];
        ka.partial_cmp(&kb).unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut auc = 0.0;
    for pair in order.windows(2) {
        let (i, j) = (pair[0], pair[1]);
        auc += 0.5 * (recall[i] + recall[j]) * (fallout[j] - fallout[i]);
    }

    let gini = 2.0 * auc - 1.0;
    log::debug!("Calculated Gini is: {}", gini);
    gini
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bucket_counts_sum_to_sample_size() {
        let y_true = vec![true, false, true, true, false];
        let y_score = vec![0.9, 0.9, 0.4, 0.4, 0.1];

        let buckets = count_true_false_by_score(&y_true, &y_score).unwrap();
        assert_eq!(buckets.score, vec![0.1, 0.4, 0.9]);

        let total: usize =
            buckets.n_true.iter().sum::<usize>() + buckets.n_false.iter().sum::<usize>();
        assert_eq!(total, y_true.len());
        assert_eq!(buckets.n_true, vec![0, 2, 1]);
        assert_eq!(buckets.n_false, vec![1, 0, 1]);
    }

    #[test]
    fn identical_scores_collapse_to_one_bucket() {
        let y_true = vec![true, false, true];
        let y_score = vec![0.5, 0.5, 0.5];

        let buckets = count_true_false_by_score(&y_true, &y_score).unwrap();
        assert_eq!(buckets.score.len(), 1);
        assert_eq!(buckets.n_true, vec![2]);
        assert_eq!(buckets.n_false, vec![1]);
    }

    #[test]
    fn empty_input_is_rejected() {
        let err = count_true_false_by_score(&[], &[]).unwrap_err();
        assert_eq!(err, CurveError::EmptyInput);
    }

    #[test]
    fn nan_scores_are_rejected() {
        let err =
            count_true_false_by_score(&[true, false], &[0.3, f64::NAN]).unwrap_err();
        assert_eq!(err, CurveError::NaNFound(1));
    }

    #[test]
    #[should_panic(expected = "equal lengths")]
    fn mismatched_lengths_panic() {
        let _ = count_true_false_by_score(&[true, false], &[0.5]);
    }

    #[test]
    fn confusion_totals_are_constant_across_thresholds() {
        let y_true = vec![true, false, true, false, true, false, false];
        let y_score = vec![0.9, 0.8, 0.8, 0.5, 0.4, 0.4, 0.2];
        let curve = accuracy_curve(&y_true, &y_score).unwrap();

        let total_true = y_true.iter().filter(|&&v| v).count();
        let total_false = y_true.len() - total_true;

        for i in 0..curve.len() {
            assert_eq!(curve.true_pos[i] + curve.false_neg[i], total_true);
            assert_eq!(curve.false_pos[i] + curve.true_neg[i], total_false);
        }
    }

    #[test]
    fn recall_and_fallout_are_monotone_down_the_sweep() {
        let y_true = vec![true, false, true, false, true, false];
        let y_score = vec![0.95, 0.9, 0.7, 0.5, 0.3, 0.1];
        let curve = accuracy_curve(&y_true, &y_score).unwrap();

        for i in 1..curve.len() {
            assert!(curve.threshold[i] < curve.threshold[i - 1]);
            assert!(curve.recall[i] >= curve.recall[i - 1]);
            assert!(curve.fallout[i] >= curve.fallout[i - 1]);
        }
        assert!((curve.recall[curve.len() - 1] - 1.0).abs() < f64::EPSILON);
        assert!((curve.fallout[curve.len() - 1] - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn curve_is_idempotent() {
        let y_true = vec![true, false, true, false];
        let y_score = vec![0.9, 0.8, 0.4, 0.1];
        let a = accuracy_curve(&y_true, &y_score).unwrap();
        let b = accuracy_curve(&y_true, &y_score).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn single_class_yields_explicit_error() {
        let err = accuracy_curve(&[true, true, true], &[0.9, 0.5, 0.1]).unwrap_err();
        assert_eq!(
            err,
            CurveError::SingleClass {
                positives: 3,
                negatives: 0
            }
        );
    }

    #[test]
    fn perfect_separation_has_gini_one() {
        let y_true = vec![true, true, false, false];
        let y_score = vec![0.9, 0.8, 0.2, 0.1];
        let curve = accuracy_curve(&y_true, &y_score).unwrap();
        let gini = calculate_gini(&curve.fallout, &curve.recall);
        assert!((gini - 1.0).abs() < 1e-12);
    }

    #[test]
    fn gini_stays_in_range_for_monotone_curves() {
        let y_true = vec![false, true, false, true, true, false, true, false];
        let y_score = vec![0.9, 0.85, 0.7, 0.6, 0.55, 0.3, 0.2, 0.1];
        let curve = accuracy_curve(&y_true, &y_score).unwrap();
        let gini = calculate_gini(&curve.fallout, &curve.recall);
        assert!((-1.0..=1.0).contains(&gini));
    }
}
