use std::error::Error;
use std::fmt;

/// Custom error type for accuracy-curve construction failures
#[derive(Debug, PartialEq, Eq)]
pub enum CurveError {
    NaNFound(usize), // Number of NaN scores found
    EmptyInput,
    SingleClass { positives: usize, negatives: usize },
}

impl fmt::Display for CurveError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CurveError::NaNFound(count) => {
                write!(f, "Found {} NaN values in scores array", count)
            }
            CurveError::EmptyInput => write!(f, "Labels and scores must contain at least one observation"),
            CurveError::SingleClass { positives, negatives } => write!(
                f,
                "Both classes must be present to build an ROC curve ({} positives, {} negatives)",
                positives, negatives
            ),
        }
    }
}

impl Error for CurveError {}
