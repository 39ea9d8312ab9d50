//! Training orchestration: load and split the loan data, fit the bad-loan
//! and interest-rate models, and persist artifacts and summaries.
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::config::ModelConfig;
use crate::curves;
use crate::data_handling::{read_loan_csv, LoanFrame};
use crate::models::factory;
use crate::models::model_trait::{LoanModel, Objective};
use crate::report::summary::{write_summary, ModelSummary};
use crate::scoring;

pub const BAD_LOAN_MODEL: &str = "BadLoanModel";
pub const INTEREST_RATE_MODEL: &str = "InterestRateModel";

/// Run-scoped training state: the output directory, the split seed, and
/// the split fractions. Replaces any ambient process-global setup; every
/// run owns its context explicitly.
#[derive(Debug, Clone)]
pub struct TrainingContext {
    pub output_dir: PathBuf,
    pub seed: u64,
    pub split_fractions: Vec<f64>,
}

impl TrainingContext {
    /// Create a context, creating the output directory if needed.
    pub fn new<P: Into<PathBuf>>(output_dir: P) -> Result<Self> {
        let output_dir = output_dir.into();
        fs::create_dir_all(&output_dir).with_context(|| {
            format!("Failed to create output directory: {}", output_dir.display())
        })?;
        Ok(TrainingContext {
            output_dir,
            seed: 1234,
            split_fractions: vec![0.79, 0.2],
        })
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

/// Both fitted models plus the validation frame used to score them.
pub struct TrainingOutcome {
    pub bad_loan_model: Box<dyn LoanModel>,
    pub interest_rate_model: Box<dyn LoanModel>,
    pub valid: LoanFrame,
}

/// Train both the bad-loan and interest-rate models.
///
/// Loads the dataset, splits it into train/validation (the trailing test
/// remainder is discarded), fits one model per target through the factory,
/// writes each model's artifact and JSON summary, and returns the fitted
/// models with the validation frame.
pub fn train_both_models(
    ctx: &TrainingContext,
    data_path: &Path,
    config: &ModelConfig,
) -> Result<TrainingOutcome> {
    let frame = read_loan_csv(data_path)?;
    let mut splits = frame.split_frame(&ctx.split_fractions, ctx.seed).into_iter();
    let (train, valid) = match (splits.next(), splits.next()) {
        (Some(train), Some(valid)) => (train, valid),
        _ => anyhow::bail!("Split must produce train and validation frames"),
    };

    log::info!(
        "Training Bad Loan Model with {} ({} train rows, {} validation rows)",
        config.model_type.tag(),
        train.nrows(),
        valid.nrows()
    );
    let bad_loan_targets: Vec<f32> = train
        .bad_loan
        .iter()
        .map(|&b| if b { 1.0 } else { 0.0 })
        .collect();
    let bad_loan_eval: Vec<f32> = valid
        .bad_loan
        .iter()
        .map(|&b| if b { 1.0 } else { 0.0 })
        .collect();
    let bad_loan_model = train_one(
        ctx,
        config,
        Objective::BinaryClassification,
        BAD_LOAN_MODEL,
        &train,
        &valid,
        &bad_loan_targets,
        &bad_loan_eval,
    )?;

    // Only the classifier gets a Gini; scoring failures degrade to a
    // summary without one rather than aborting the run.
    let gini = match scoring::fallout_recall(&*bad_loan_model, &valid) {
        Ok((fallout, recall)) => Some(curves::calculate_gini(&fallout, &recall)),
        Err(e) => {
            log::warn!("Skipping Gini for {}: {}", BAD_LOAN_MODEL, e);
            None
        }
    };
    write_summary(
        &ctx.output_dir,
        &ModelSummary::new(BAD_LOAN_MODEL, config.model_type.tag(), gini),
    )?;

    log::info!(
        "Training Interest Rate Model with {}",
        config.model_type.tag()
    );
    let interest_rate_model = train_one(
        ctx,
        config,
        Objective::Regression,
        INTEREST_RATE_MODEL,
        &train,
        &valid,
        &train.int_rate,
        &valid.int_rate,
    )?;
    write_summary(
        &ctx.output_dir,
        &ModelSummary::new(INTEREST_RATE_MODEL, config.model_type.tag(), None),
    )?;

    Ok(TrainingOutcome {
        bad_loan_model,
        interest_rate_model,
        valid,
    })
}

#[allow(clippy::too_many_arguments)]
fn train_one(
    ctx: &TrainingContext,
    config: &ModelConfig,
    objective: Objective,
    name: &str,
    train: &LoanFrame,
    valid: &LoanFrame,
    y_train: &[f32],
    y_valid: &[f32],
) -> Result<Box<dyn LoanModel>> {
    let mut model = factory::build_model(config.clone(), objective, name)?;
    model
        .fit(&train.x, y_train, Some(&valid.x), Some(y_valid))
        .with_context(|| format!("Failed to fit {}", name))?;

    let artifact = ctx.output_dir.join(format!("{}.model", name));
    if let Err(e) = model.save(&artifact) {
        log::warn!("Could not persist {} artifact: {}", name, e);
    }

    Ok(model)
}
