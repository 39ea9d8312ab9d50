use std::num::NonZeroUsize;
use std::path::Path;

use anyhow::{Context, Result};
use ndarray::Array2;
use randomforest::criterion::Mse;
use randomforest::table::TableBuilder;
use randomforest::{RandomForestRegressor, RandomForestRegressorOptions};

use crate::config::{ModelConfig, ModelType};
use crate::models::model_trait::{LoanModel, Objective};

/// Random forest model backed by the `randomforest` crate.
///
/// Both objectives are served by a regression forest: for classification
/// the forest is grown on 0/1 targets, so the tree average is the
/// positive-class probability.
pub struct RandomForestModel {
    forest: Option<RandomForestRegressor>,
    config: ModelConfig,
    objective: Objective,
    name: String,
}

impl RandomForestModel {
    pub fn new(config: ModelConfig, objective: Objective, name: &str) -> Self {
        RandomForestModel {
            forest: None,
            config,
            objective,
            name: name.to_string(),
        }
    }
}

impl LoanModel for RandomForestModel {
    fn fit(
        &mut self,
        x: &Array2<f32>,
        y: &[f32],
        _x_eval: Option<&Array2<f32>>,
        _y_eval: Option<&[f32]>,
    ) -> Result<()> {
        match &self.config.model_type {
            ModelType::RandomForest {
                ntrees,
                max_features,
            } => {
                let mut table_builder = TableBuilder::new();
                for i in 0..x.nrows() {
                    let row: Vec<f64> = x.row(i).iter().map(|&v| f64::from(v)).collect();
                    let target = match self.objective {
                        Objective::BinaryClassification => {
                            if y[i] > 0.5 {
                                1.0
                            } else {
                                0.0
                            }
                        }
                        Objective::Regression => f64::from(y[i]),
                    };
                    table_builder
                        .add_row(&row, target)
                        .map_err(|e| anyhow::anyhow!("Failed to add training row {}: {}", i, e))?;
                }
                let table = table_builder
                    .build()
                    .map_err(|e| anyhow::anyhow!("Failed to build training table: {}", e))?;

                let mut options = RandomForestRegressorOptions::new();
                options.trees(
                    NonZeroUsize::new(*ntrees as usize)
                        .context("ntrees must be greater than zero")?,
                );
                if let Some(mf) = max_features {
                    options.max_features(
                        NonZeroUsize::new(*mf as usize)
                            .context("max_features must be greater than zero")?,
                    );
                }
                options.seed(1234);

                self.forest = Some(options.fit(Mse, table));
                Ok(())
            }
            other => anyhow::bail!("Expected ModelType::RandomForest params, got {:?}", other),
        }
    }

    fn predict(&self, x: &Array2<f32>) -> Result<Vec<f32>> {
        let forest = self
            .forest
            .as_ref()
            .context("Random forest model has not been fitted")?;

        let mut predictions = Vec::with_capacity(x.nrows());
        for i in 0..x.nrows() {
            let row: Vec<f64> = x.row(i).iter().map(|&v| f64::from(v)).collect();
            predictions.push(forest.predict(&row) as f32);
        }
        Ok(predictions)
    }

    fn save(&self, path: &Path) -> Result<()> {
        anyhow::bail!(
            "The random-forest backend does not support model export (requested: {})",
            path.display()
        )
    }

    fn name(&self) -> &str {
        &self.name
    }
}
