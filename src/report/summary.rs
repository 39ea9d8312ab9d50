use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Summary record written for each trained model.
///
/// Only the bad-loan model carries a Gini coefficient; the regression
/// model's record holds just its identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelSummary {
    pub model_name: String,
    pub model_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gini: Option<f64>,
    pub generated_at: DateTime<Utc>,
}

impl ModelSummary {
    pub fn new(model_name: &str, model_type: &str, gini: Option<f64>) -> Self {
        ModelSummary {
            model_name: model_name.to_string(),
            model_type: model_type.to_string(),
            gini,
            generated_at: Utc::now(),
        }
    }
}

/// Write the summary as pretty JSON to
/// `<dir>/model_output_data_<name>_<type>.json` and return the path.
pub fn write_summary<P: AsRef<Path>>(dir: P, summary: &ModelSummary) -> Result<PathBuf> {
    let path = dir.as_ref().join(format!(
        "model_output_data_{}_{}.json",
        summary.model_name, summary.model_type
    ));
    let file = File::create(&path)
        .with_context(|| format!("Failed to create summary file: {}", path.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), summary)
        .with_context(|| format!("Failed to write summary to {}", path.display()))?;
    log::info!("Wrote model summary to {}", path.display());
    Ok(path)
}
