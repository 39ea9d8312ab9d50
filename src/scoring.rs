//! Scoring adapter: turns a fitted model and a validation frame into the
//! (labels, scores) pair the curve engine consumes.
use anyhow::Result;

use crate::curves;
use crate::data_handling::LoanFrame;
use crate::models::model_trait::LoanModel;

/// Predict a positive-class probability per row of `frame`.
///
/// Panics when the backend returns a score column whose length does not
/// match the frame, since every downstream computation would silently
/// misalign.
pub fn score_frame(model: &dyn LoanModel, frame: &LoanFrame) -> Result<Vec<f64>> {
    let scores = model.predict(&frame.x)?;
    assert_eq!(
        scores.len(),
        frame.nrows(),
        "Score column length must match the frame row count"
    );
    Ok(scores.into_iter().map(f64::from).collect())
}

/// Row-aligned bad-loan labels and predicted scores for `frame`.
pub fn labels_and_scores(
    model: &dyn LoanModel,
    frame: &LoanFrame,
) -> Result<(Vec<bool>, Vec<f64>)> {
    let scores = score_frame(model, frame)?;
    Ok((frame.bad_loan.clone(), scores))
}

/// Score `frame` with `model` and return the (fallout, recall) pair of the
/// resulting accuracy curve.
pub fn fallout_recall(model: &dyn LoanModel, frame: &LoanFrame) -> Result<(Vec<f64>, Vec<f64>)> {
    let (labels, scores) = labels_and_scores(model, frame)?;
    let curve = curves::accuracy_curve(&labels, &scores)?;
    Ok((curve.fallout, curve.recall))
}
