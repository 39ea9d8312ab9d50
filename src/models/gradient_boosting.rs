use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use anyhow::{Context, Result};
use gbdt::config::Config;
use gbdt::decision_tree::{Data, DataVec};
use gbdt::gradient_boost::GBDT;
use ndarray::Array2;

use crate::config::{ModelConfig, ModelType};
use crate::models::model_trait::{LoanModel, Objective};

/// Gradient boosting model backed by the `gbdt` crate.
pub struct GradientBoostingModel {
    model: Option<GBDT>,
    config: ModelConfig,
    objective: Objective,
    name: String,
}

impl GradientBoostingModel {
    pub fn new(config: ModelConfig, objective: Objective, name: &str) -> Self {
        GradientBoostingModel {
            model: None,
            config,
            objective,
            name: name.to_string(),
        }
    }

    fn loss_name(&self) -> &'static str {
        match self.objective {
            // Log-likelihood loss trains on {-1, 1} labels and predicts a
            // logistic-transformed probability.
            Objective::BinaryClassification => "LogLikelyhood",
            Objective::Regression => "SquaredError",
        }
    }
}

impl LoanModel for GradientBoostingModel {
    fn fit(
        &mut self,
        x: &Array2<f32>,
        y: &[f32],
        _x_eval: Option<&Array2<f32>>,
        _y_eval: Option<&[f32]>,
    ) -> Result<()> {
        let feature_size = x.ncols();

        match &self.config.model_type {
            ModelType::GradientBoosting {
                ntrees,
                max_depth,
                debug,
                training_optimization_level,
            } => {
                let mut config = Config::new();

                config.set_feature_size(feature_size);
                config.set_shrinkage(self.config.learning_rate);
                config.set_max_depth(*max_depth);
                config.set_iterations(*ntrees as usize);
                config.set_debug(*debug);
                config.set_training_optimization_level(*training_optimization_level);
                config.set_loss(self.loss_name());

                let mut gbdt = GBDT::new(&config);

                let mut train_x = DataVec::new();
                for row in 0..x.nrows() {
                    let train_row = x.row(row).to_vec();
                    let label = match self.objective {
                        Objective::BinaryClassification => {
                            if y[row] > 0.5 {
                                1.0
                            } else {
                                -1.0
                            }
                        }
                        Objective::Regression => y[row],
                    };
                    train_x.push(Data::new_training_data(train_row, 1.0, label, None));
                }

                gbdt.fit(&mut train_x);

                self.model = Some(gbdt);
                Ok(())
            }
            other => anyhow::bail!(
                "Expected ModelType::GradientBoosting params, got {:?}",
                other
            ),
        }
    }

    fn predict(&self, x: &Array2<f32>) -> Result<Vec<f32>> {
        let model = self
            .model
            .as_ref()
            .context("Gradient boosting model has not been fitted")?;

        let mut test_x = DataVec::new();
        for row in 0..x.nrows() {
            let test_row = x.row(row).to_vec();
            test_x.push(Data::new_training_data(test_row, 1.0, 0.0, None));
        }
        Ok(model.predict(&test_x))
    }

    fn save(&self, path: &Path) -> Result<()> {
        let model = self
            .model
            .as_ref()
            .context("Gradient boosting model has not been fitted")?;
        let file = File::create(path)
            .with_context(|| format!("Failed to create model file: {}", path.display()))?;
        serde_json::to_writer(BufWriter::new(file), model)
            .with_context(|| format!("Failed to serialize model to {}", path.display()))?;
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    fn separable_sample() -> (Array2<f32>, Vec<f32>) {
        // Second feature tracks the class exactly.
        let x = Array2::from_shape_vec(
            (10, 3),
            vec![
                0.1, 1.0, 5.0, 0.4, 0.0, 5.0, 0.6, 1.0, 5.0, 0.9, 0.0, 5.0, 1.2, 1.0, 5.0, 1.5,
                0.0, 5.0, 1.8, 1.0, 5.0, 2.1, 0.0, 5.0, 2.4, 1.0, 5.0, 2.7, 0.0, 5.0,
            ],
        )
        .unwrap();
        let y = vec![1.0, 0.0, 1.0, 0.0, 1.0, 0.0, 1.0, 0.0, 1.0, 0.0];
        (x, y)
    }

    #[test]
    fn classification_predicts_probabilities() {
        let (x, y) = separable_sample();
        let config = ModelConfig::new(
            0.1,
            ModelType::GradientBoosting {
                ntrees: 5,
                max_depth: 3,
                debug: false,
                training_optimization_level: 2,
            },
        );
        let mut model =
            GradientBoostingModel::new(config, Objective::BinaryClassification, "test");
        model.fit(&x, &y, None, None).unwrap();

        let predictions = model.predict(&x).unwrap();
        assert_eq!(predictions.len(), x.nrows());
        for p in &predictions {
            assert!((0.0..=1.0).contains(p), "probability out of range: {}", p);
        }
    }

    #[test]
    fn predict_before_fit_errors() {
        let model = GradientBoostingModel::new(
            ModelConfig::default(),
            Objective::Regression,
            "unfitted",
        );
        let x = Array2::from_shape_vec((1, 2), vec![1.0, 2.0]).unwrap();
        assert!(model.predict(&x).is_err());
    }

    #[test]
    fn fit_rejects_foreign_params() {
        let config = ModelConfig::new(
            0.1,
            ModelType::RandomForest {
                ntrees: 10,
                max_features: None,
            },
        );
        let mut model =
            GradientBoostingModel::new(config, Objective::BinaryClassification, "test");
        let (x, y) = separable_sample();
        assert!(model.fit(&x, &y, None, None).is_err());
    }
}
