use anyhow::Result;

use crate::config::{ModelConfig, ModelType};
use crate::models::model_trait::{LoanModel, Objective};

/// Build a boxed, untrained model from a `ModelConfig`.
///
/// Dispatch is an exhaustive match over the model-type variants. Variants
/// whose backend is not compiled in return an explicit error naming the
/// cargo feature to enable.
pub fn build_model(
    config: ModelConfig,
    objective: Objective,
    name: &str,
) -> Result<Box<dyn LoanModel>> {
    match config.model_type {
        ModelType::GradientBoosting { .. } => Ok(Box::new(
            crate::models::gradient_boosting::GradientBoostingModel::new(config, objective, name),
        )),

        #[cfg(feature = "random-forest")]
        ModelType::RandomForest { .. } => Ok(Box::new(
            crate::models::random_forest::RandomForestModel::new(config, objective, name),
        )),
        #[cfg(not(feature = "random-forest"))]
        ModelType::RandomForest { .. } => Err(anyhow::anyhow!(
            "The random forest backend is not compiled in. Rebuild with `--features random-forest`"
        )),

        #[cfg(feature = "deep-learning")]
        ModelType::DeepLearning { .. } => Ok(Box::new(
            crate::models::deep_learning::DeepLearningModel::new(config, objective, name),
        )),
        #[cfg(not(feature = "deep-learning"))]
        ModelType::DeepLearning { .. } => Err(anyhow::anyhow!(
            "The deep learning backend is not compiled in. Rebuild with `--features deep-learning`"
        )),
    }
}
