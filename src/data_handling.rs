//! Loading and splitting of the loan dataset.
//!
//! The loader reads a LendingClub-style CSV, encodes categorical predictors
//! to integer codes, and exposes a numeric predictor matrix alongside the
//! `bad_loan` and `int_rate` target columns.
use std::collections::HashMap;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use csv::StringRecord;
use ndarray::Array2;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Input variables (predictors) used to train the models.
pub fn input_variables() -> Vec<&'static str> {
    vec![
        "loan_amnt",
        "longest_credit_length",
        "revol_util",
        "emp_length",
        "home_ownership",
        "annual_inc",
        "purpose",
        "addr_state",
        "dti",
        "delinq_2yrs",
        "total_acc",
        "verification_status",
        "term",
    ]
}

/// Predictors holding free-text levels rather than numbers.
const CATEGORICAL_COLUMNS: &[&str] = &[
    "home_ownership",
    "purpose",
    "addr_state",
    "verification_status",
    "term",
];

const BAD_LOAN_COLUMN: &str = "bad_loan";
const INT_RATE_COLUMN: &str = "int_rate";

/// A loaded loan frame: encoded predictor matrix plus target columns,
/// row-aligned.
#[derive(Debug, Clone)]
pub struct LoanFrame {
    pub feature_names: Vec<String>,
    pub x: Array2<f32>,
    pub bad_loan: Vec<bool>,
    pub int_rate: Vec<f32>,
}

impl LoanFrame {
    pub fn nrows(&self) -> usize {
        self.x.nrows()
    }

    pub fn ncols(&self) -> usize {
        self.x.ncols()
    }

    /// New frame holding only the given rows, in the given order.
    pub fn select(&self, indices: &[usize]) -> LoanFrame {
        let mut data = Vec::with_capacity(indices.len() * self.ncols());
        for &i in indices {
            data.extend(self.x.row(i).iter().copied());
        }
        LoanFrame {
            feature_names: self.feature_names.clone(),
            x: Array2::from_shape_vec((indices.len(), self.ncols()), data)
                .expect("row selection preserves shape"),
            bad_loan: indices.iter().map(|&i| self.bad_loan[i]).collect(),
            int_rate: indices.iter().map(|&i| self.int_rate[i]).collect(),
        }
    }

    /// Split the frame into `fractions.len() + 1` disjoint frames after a
    /// seeded shuffle. The last frame holds the remainder.
    ///
    /// # Arguments
    ///
    /// * `fractions` - Relative sizes of the leading splits, e.g. `[0.79, 0.2]`
    /// * `seed` - RNG seed, so splits are reproducible across runs
    pub fn split_frame(&self, fractions: &[f64], seed: u64) -> Vec<LoanFrame> {
        let mut rng = StdRng::seed_from_u64(seed);
        let n = self.nrows();
        let mut indices: Vec<usize> = (0..n).collect();
        indices.shuffle(&mut rng);

        let mut splits = Vec::with_capacity(fractions.len() + 1);
        let mut start = 0usize;
        let mut cumulative = 0.0;
        for &fraction in fractions {
            cumulative += fraction;
            let end = ((n as f64) * cumulative).floor() as usize;
            let end = end.min(n);
            splits.push(self.select(&indices[start..end]));
            start = end;
        }
        splits.push(self.select(&indices[start..]));
        splits
    }
}

/// Read a loan CSV into a `LoanFrame`.
///
/// Categorical predictors are encoded to per-column integer codes in order
/// of first appearance. Empty numeric fields are imputed with zero.
// TODO: impute missing numerics with the column mean instead of zero.
pub fn read_loan_csv<P: AsRef<Path>>(path: P) -> Result<LoanFrame> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(&path)
        .with_context(|| format!("Failed to open loan file: {}", path.as_ref().display()))?;

    let headers = reader
        .headers()
        .context("Failed to read loan CSV header row")?
        .clone();

    let predictors = input_variables();
    let mut predictor_indices = Vec::with_capacity(predictors.len());
    for name in &predictors {
        let idx = find_column(&headers, name)
            .ok_or_else(|| anyhow!("Missing predictor column '{}'", name))?;
        predictor_indices.push(idx);
    }
    let bad_loan_idx = find_column(&headers, BAD_LOAN_COLUMN)
        .ok_or_else(|| anyhow!("Missing target column '{}'", BAD_LOAN_COLUMN))?;
    let int_rate_idx = find_column(&headers, INT_RATE_COLUMN)
        .ok_or_else(|| anyhow!("Missing target column '{}'", INT_RATE_COLUMN))?;

    let categorical: Vec<bool> = predictors
        .iter()
        .map(|name| CATEGORICAL_COLUMNS.contains(name))
        .collect();
    let mut level_maps: Vec<HashMap<String, usize>> =
        vec![HashMap::new(); predictors.len()];

    let mut features = Vec::new();
    let mut bad_loan = Vec::new();
    let mut int_rate = Vec::new();

    for (row_idx, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("Failed to read row {}", row_idx + 1))?;

        for (col, &idx) in predictor_indices.iter().enumerate() {
            let value = record
                .get(idx)
                .ok_or_else(|| anyhow!("Missing value for '{}' at row {}", predictors[col], row_idx + 1))?
                .trim();
            let encoded = if categorical[col] {
                encode_level(value, &mut level_maps[col]) as f32
            } else {
                parse_numeric(value, predictors[col], row_idx)?
            };
            features.push(encoded);
        }

        let bad = record
            .get(bad_loan_idx)
            .unwrap_or_default()
            .trim()
            .parse::<f32>()
            .with_context(|| format!("Invalid bad_loan value at row {}", row_idx + 1))?;
        bad_loan.push(bad != 0.0);

        let rate = record
            .get(int_rate_idx)
            .unwrap_or_default()
            .trim()
            .parse::<f32>()
            .with_context(|| format!("Invalid int_rate value at row {}", row_idx + 1))?;
        int_rate.push(rate);
    }

    let n_samples = bad_loan.len();
    let x = Array2::from_shape_vec((n_samples, predictors.len()), features)
        .context("Failed to build predictor matrix")?;

    log::info!(
        "Loaded {} loans with {} predictors from {}",
        n_samples,
        predictors.len(),
        path.as_ref().display()
    );

    Ok(LoanFrame {
        feature_names: predictors.iter().map(|s| s.to_string()).collect(),
        x,
        bad_loan,
        int_rate,
    })
}

fn find_column(headers: &StringRecord, name: &str) -> Option<usize> {
    headers
        .iter()
        .position(|header| header.eq_ignore_ascii_case(name))
}

fn parse_numeric(value: &str, column: &str, row_idx: usize) -> Result<f32> {
    if value.is_empty() || value.eq_ignore_ascii_case("na") {
        return Ok(0.0);
    }
    value
        .parse::<f32>()
        .with_context(|| format!("Invalid numeric '{}' for '{}' at row {}", value, column, row_idx + 1))
}

fn encode_level(value: &str, map: &mut HashMap<String, usize>) -> usize {
    if let Some(&code) = map.get(value) {
        return code;
    }
    let next = map.len();
    map.insert(value.to_string(), next);
    next
}
