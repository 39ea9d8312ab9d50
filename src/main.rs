use anyhow::Result;
use clap::{Arg, Command, ValueHint};
use log::LevelFilter;
use std::path::PathBuf;

use loan_models::config::{ModelConfig, ModelType};
use loan_models::curves::calculate_gini;
use loan_models::report::plots::write_roc_plot;
use loan_models::scoring::fallout_recall;
use loan_models::trainer::{train_both_models, TrainingContext};

fn main() -> Result<()> {
    env_logger::Builder::default()
        .filter_level(LevelFilter::Error)
        .parse_env(env_logger::Env::default().filter_or("LOAN_MODELS_LOG", "error,loan_models=info"))
        .init();

    let matches = Command::new("loan-models")
        .version(clap::crate_version!())
        .about("Train loan models and report an ROC curve with a Gini coefficient")
        .arg(
            Arg::new("data")
                .help("Path to the loan CSV file")
                .required(true)
                .value_parser(clap::value_parser!(PathBuf))
                .value_hint(ValueHint::FilePath),
        )
        .arg(
            Arg::new("model_type")
                .short('m')
                .long("model-type")
                .help("Model variant to train")
                .value_parser(["random_forest", "gradient_boosting", "deep_learning"])
                .default_value("gradient_boosting"),
        )
        .arg(
            Arg::new("output_dir")
                .short('o')
                .long("output-dir")
                .help("Directory for model artifacts, summaries and the ROC plot")
                .value_parser(clap::value_parser!(PathBuf))
                .default_value("build")
                .value_hint(ValueHint::DirPath),
        )
        .arg(
            Arg::new("params_dir")
                .short('p')
                .long("params-dir")
                .help(
                    "Directory holding <model_type>_params.json files. \
                     Built-in defaults are used when omitted.",
                )
                .value_parser(clap::value_parser!(PathBuf))
                .value_hint(ValueHint::DirPath),
        )
        .arg(
            Arg::new("seed")
                .long("seed")
                .help("Seed for the train/validation split")
                .value_parser(clap::value_parser!(u64))
                .default_value("1234"),
        )
        .get_matches();

    let data = matches
        .get_one::<PathBuf>("data")
        .expect("data is required")
        .clone();
    let tag = matches
        .get_one::<String>("model_type")
        .expect("model_type has a default");
    let output_dir = matches
        .get_one::<PathBuf>("output_dir")
        .expect("output_dir has a default")
        .clone();
    let seed = *matches.get_one::<u64>("seed").expect("seed has a default");

    let config = match matches.get_one::<PathBuf>("params_dir") {
        Some(dir) => ModelConfig::from_params_dir(dir, tag)?,
        None => {
            let model_type = tag
                .parse::<ModelType>()
                .map_err(|e| anyhow::anyhow!(e))?;
            ModelConfig::new(0.1, model_type)
        }
    };

    let ctx = TrainingContext::new(output_dir)?.with_seed(seed);
    let outcome = train_both_models(&ctx, &data, &config)?;

    let (fallout, recall) = fallout_recall(&*outcome.bad_loan_model, &outcome.valid)?;
    let gini = calculate_gini(&fallout, &recall);
    log::info!("Gini coefficient: {}", gini);

    write_roc_plot(
        ctx.output_dir.join("roc_plot.html"),
        &fallout,
        &recall,
        gini,
    )?;

    Ok(())
}
