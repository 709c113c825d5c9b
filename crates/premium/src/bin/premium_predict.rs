//! One-shot premium estimate from the command line.
//!
//! ```text
//! premium-predict --age 40 --sex male --bmi 27.5 --children 2 \
//!     --smoker no --region northeast --model random_forest
//! ```

use anyhow::Context;
use clap::Parser;

use premium::config::ModelArgs;
use premium::logging::init_tracing;
use premium::utils::format_currency;
use premium::{InsuranceRecord, PremiumPredictor};

/// premium-predict: estimate one insurance premium
#[derive(Parser, Debug)]
#[command(name = "premium-predict")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Age in years (18-100)
    #[arg(long)]
    age: i64,

    /// male or female
    #[arg(long)]
    sex: String,

    /// Body mass index (10-50)
    #[arg(long)]
    bmi: f64,

    /// Number of children (0-10)
    #[arg(long, default_value_t = 0)]
    children: i64,

    /// yes or no
    #[arg(long)]
    smoker: String,

    /// northeast, northwest, southeast or southwest
    #[arg(long)]
    region: String,

    /// xgboost, decision_tree, random_forest, linear or polynomial
    #[arg(long, default_value = "xgboost")]
    model: String,

    #[command(flatten)]
    models: ModelArgs,

    /// Log filter directives
    #[arg(long, env = "RUST_LOG", default_value = "warn")]
    log_filter: String,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_filter);

    let predictor = PremiumPredictor::load(&cli.models.artifact_paths(), cli.models.linear_scaling);
    let record = InsuranceRecord {
        age: cli.age,
        sex: cli.sex,
        bmi: cli.bmi,
        children: cli.children,
        smoker: cli.smoker,
        region: cli.region,
    };

    let result = predictor
        .predict_validated(&record, &cli.model)
        .with_context(|| format!("prediction with model '{}' failed", cli.model))?;

    println!(
        "Estimated Insurance Premium: {}",
        format_currency(result.prediction)
    );
    Ok(())
}
