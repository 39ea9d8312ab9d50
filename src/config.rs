use std::fs::File;
use std::path::Path;
use std::str::FromStr;

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Central configuration for models in the crate.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct ModelConfig {
    pub learning_rate: f32,

    #[serde(flatten)]
    pub model_type: ModelType,
}

/// Supported model types and their hyper-parameters.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub enum ModelType {
    RandomForest {
        ntrees: u32,
        max_features: Option<u32>,
    },
    GradientBoosting {
        ntrees: u32,
        max_depth: u32,
        debug: bool,
        training_optimization_level: u8,
    },
    DeepLearning {
        hidden: Vec<usize>,
        epochs: u32,
    },
}

impl ModelType {
    /// Snake-case tag used in parameter file names and summary records.
    pub fn tag(&self) -> &'static str {
        match self {
            ModelType::RandomForest { .. } => "random_forest",
            ModelType::GradientBoosting { .. } => "gradient_boosting",
            ModelType::DeepLearning { .. } => "deep_learning",
        }
    }
}

impl Default for ModelType {
    fn default() -> Self {
        ModelType::GradientBoosting {
            ntrees: 50,
            max_depth: 6,
            debug: false,
            training_optimization_level: 2,
        }
    }
}

impl FromStr for ModelType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "random_forest" => Ok(ModelType::RandomForest {
                ntrees: 50,
                max_features: None,
            }),
            "gradient_boosting" => Ok(ModelType::GradientBoosting {
                ntrees: 50,
                max_depth: 6,
                debug: false,
                training_optimization_level: 2,
            }),
            "deep_learning" => Ok(ModelType::DeepLearning {
                hidden: vec![32, 32],
                epochs: 100,
            }),
            _ => Err(format!(
                "Unrecognized model_type: {}. Expected one of: random_forest, gradient_boosting, deep_learning",
                s
            )),
        }
    }
}

impl ModelConfig {
    pub fn new(learning_rate: f32, model_type: ModelType) -> Self {
        Self {
            learning_rate,
            model_type,
        }
    }

    /// Load the configuration for `tag` from `<dir>/<tag>_params.json`.
    ///
    /// The tag must name a known model type; the JSON record carries the
    /// learning rate and the per-variant hyper-parameters.
    pub fn from_params_dir<P: AsRef<Path>>(dir: P, tag: &str) -> anyhow::Result<Self> {
        // Reject unknown tags before touching the filesystem.
        let _ = tag
            .parse::<ModelType>()
            .map_err(|e| anyhow::anyhow!(e))?;

        let path = dir.as_ref().join(format!("{}_params.json", tag));
        let file = File::open(&path)
            .with_context(|| format!("Failed to open parameter file: {}", path.display()))?;
        let config: ModelConfig = serde_json::from_reader(file)
            .with_context(|| format!("Failed to parse parameter file: {}", path.display()))?;

        if config.model_type.tag() != tag {
            anyhow::bail!(
                "Parameter file {} holds {} parameters, expected {}",
                path.display(),
                config.model_type.tag(),
                tag
            );
        }

        Ok(config)
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.1,
            model_type: ModelType::default(),
        }
    }
}
