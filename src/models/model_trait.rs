use std::path::Path;

use anyhow::Result;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// What a model is fitted to predict. Selects the training loss and how
/// predictions are interpreted downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Objective {
    /// Predict the probability of the positive class, in [0, 1].
    BinaryClassification,
    /// Predict a continuous value.
    Regression,
}

/// Contract for the pluggable training backends.
///
/// The trainer only ever talks to models through this trait, so backends
/// can be swapped without touching the orchestration.
pub trait LoanModel {
    /// Fit the model. Classification targets use 0.0/1.0; regression
    /// targets are raw values. Evaluation data is optional and backends may
    /// ignore it.
    fn fit(
        &mut self,
        x: &Array2<f32>,
        y: &[f32],
        x_eval: Option<&Array2<f32>>,
        y_eval: Option<&[f32]>,
    ) -> Result<()>;

    /// Predict one score per row: a positive-class probability for
    /// classification models, a raw value for regression models.
    fn predict(&self, x: &Array2<f32>) -> Result<Vec<f32>>;

    /// Persist a portable scoring artifact for the fitted model.
    fn save(&self, path: &Path) -> Result<()>;

    /// Human readable model name
    fn name(&self) -> &str {
        "loan model"
    }
}

impl std::fmt::Debug for dyn LoanModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoanModel")
            .field("name", &self.name())
            .finish()
    }
}
