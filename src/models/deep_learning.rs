use std::path::Path;

use anyhow::{Context, Result};
use candle_core::{DType, Device, Tensor};
use candle_nn::{linear, AdamW, Linear, Module, Optimizer, ParamsAdamW, VarBuilder, VarMap};
use ndarray::Array2;

use crate::config::{ModelConfig, ModelType};
use crate::models::model_trait::{LoanModel, Objective};

/// Small fully-connected network trained with candle.
struct Mlp {
    hidden: Vec<Linear>,
    out: Linear,
}

impl Mlp {
    fn forward(&self, xs: &Tensor) -> candle_core::Result<Tensor> {
        let mut h = xs.clone();
        for layer in &self.hidden {
            h = layer.forward(&h)?.relu()?;
        }
        self.out.forward(&h)
    }
}

/// Deep learning model: an MLP on the candle stack.
///
/// For classification the network is trained with BCE-with-logits and
/// predictions are passed through a sigmoid; for regression it is trained
/// with MSE and predictions are raw outputs.
pub struct DeepLearningModel {
    varmap: VarMap,
    net: Option<Mlp>,
    config: ModelConfig,
    objective: Objective,
    name: String,
}

impl DeepLearningModel {
    pub fn new(config: ModelConfig, objective: Objective, name: &str) -> Self {
        DeepLearningModel {
            varmap: VarMap::new(),
            net: None,
            config,
            objective,
            name: name.to_string(),
        }
    }

    fn to_tensor(x: &Array2<f32>, device: &Device) -> Result<Tensor> {
        let flat: Vec<f32> = x.iter().copied().collect();
        Tensor::from_vec(flat, (x.nrows(), x.ncols()), device)
            .context("Failed to build input tensor")
    }
}

impl LoanModel for DeepLearningModel {
    fn fit(
        &mut self,
        x: &Array2<f32>,
        y: &[f32],
        x_eval: Option<&Array2<f32>>,
        y_eval: Option<&[f32]>,
    ) -> Result<()> {
        let (hidden_dims, epochs) = match &self.config.model_type {
            ModelType::DeepLearning { hidden, epochs } => (hidden.clone(), *epochs),
            other => anyhow::bail!("Expected ModelType::DeepLearning params, got {:?}", other),
        };

        let device = Device::Cpu;
        let vb = VarBuilder::from_varmap(&self.varmap, DType::F32, &device);

        let mut layers = Vec::with_capacity(hidden_dims.len());
        let mut in_dim = x.ncols();
        for (i, &dim) in hidden_dims.iter().enumerate() {
            layers.push(
                linear(in_dim, dim, vb.pp(format!("hidden{}", i)))
                    .context("Failed to build hidden layer")?,
            );
            in_dim = dim;
        }
        let out = linear(in_dim, 1, vb.pp("out")).context("Failed to build output layer")?;
        let net = Mlp {
            hidden: layers,
            out,
        };

        let xs = Self::to_tensor(x, &device)?;
        let ys = Tensor::from_vec(y.to_vec(), (y.len(), 1), &device)
            .context("Failed to build target tensor")?;

        let eval = match (x_eval, y_eval) {
            (Some(xe), Some(ye)) => Some((
                Self::to_tensor(xe, &device)?,
                Tensor::from_vec(ye.to_vec(), (ye.len(), 1), &device)
                    .context("Failed to build eval target tensor")?,
            )),
            _ => None,
        };

        let params = ParamsAdamW {
            lr: f64::from(self.config.learning_rate),
            ..Default::default()
        };
        let mut optimizer = AdamW::new(self.varmap.all_vars(), params)
            .context("Failed to build optimizer")?;

        for epoch in 0..epochs {
            let logits = net.forward(&xs).context("Forward pass failed")?;
            let loss = match self.objective {
                Objective::BinaryClassification => {
                    candle_nn::loss::binary_cross_entropy_with_logit(&logits, &ys)
                }
                Objective::Regression => candle_nn::loss::mse(&logits, &ys),
            }
            .context("Loss computation failed")?;
            optimizer
                .backward_step(&loss)
                .context("Optimizer step failed")?;

            if let Some((ref xe, ref ye)) = eval {
                if epoch % 10 == 0 {
                    let eval_logits = net.forward(xe).context("Eval forward pass failed")?;
                    let eval_loss = match self.objective {
                        Objective::BinaryClassification => {
                            candle_nn::loss::binary_cross_entropy_with_logit(&eval_logits, ye)
                        }
                        Objective::Regression => candle_nn::loss::mse(&eval_logits, ye),
                    }
                    .context("Eval loss computation failed")?;
                    log::debug!(
                        "epoch {}: train loss {:.5}, eval loss {:.5}",
                        epoch,
                        loss.to_scalar::<f32>().unwrap_or(f32::NAN),
                        eval_loss.to_scalar::<f32>().unwrap_or(f32::NAN)
                    );
                }
            }
        }

        self.net = Some(net);
        Ok(())
    }

    fn predict(&self, x: &Array2<f32>) -> Result<Vec<f32>> {
        let net = self
            .net
            .as_ref()
            .context("Deep learning model has not been fitted")?;

        let device = Device::Cpu;
        let xs = Self::to_tensor(x, &device)?;
        let logits = net.forward(&xs).context("Forward pass failed")?;
        let outputs = match self.objective {
            Objective::BinaryClassification => {
                candle_nn::ops::sigmoid(&logits).context("Sigmoid failed")?
            }
            Objective::Regression => logits,
        };
        let rows = outputs
            .to_vec2::<f32>()
            .context("Failed to read predictions")?;
        Ok(rows.into_iter().map(|row| row[0]).collect())
    }

    fn save(&self, path: &Path) -> Result<()> {
        if self.net.is_none() {
            anyhow::bail!("Deep learning model has not been fitted");
        }
        self.varmap
            .save(path)
            .with_context(|| format!("Failed to save model weights to {}", path.display()))
    }

    fn name(&self) -> &str {
        &self.name
    }
}
