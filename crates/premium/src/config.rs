//! Command line / environment configuration.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser};

use crate::model::{ArtifactPaths, LinearScaling, ModelKind};

/// Where the five artifacts live.
#[derive(Args, Debug, Clone)]
pub struct ModelArgs {
    /// Directory holding the model artifacts
    #[arg(long, env = "PREMIUM_MODEL_DIR", default_value = ".")]
    pub model_dir: PathBuf,

    /// XGBoost model (relative paths resolve against --model-dir)
    #[arg(long, env = "PREMIUM_XGBOOST_FILE")]
    pub xgboost_file: Option<PathBuf>,

    /// Decision tree export
    #[arg(long, env = "PREMIUM_DECISION_TREE_FILE")]
    pub decision_tree_file: Option<PathBuf>,

    /// Random forest export
    #[arg(long, env = "PREMIUM_RANDOM_FOREST_FILE")]
    pub random_forest_file: Option<PathBuf>,

    /// Linear regression export
    #[arg(long, env = "PREMIUM_LINEAR_FILE")]
    pub linear_file: Option<PathBuf>,

    /// Polynomial regression bundle
    #[arg(long, env = "PREMIUM_POLYNOMIAL_FILE")]
    pub polynomial_file: Option<PathBuf>,

    /// How the linear model standardises its input
    #[arg(long, env = "PREMIUM_LINEAR_SCALING", value_enum, default_value_t = LinearScaling::PerRequest)]
    pub linear_scaling: LinearScaling,
}

impl ModelArgs {
    /// Resolve the five artifact paths; overrides win over default names.
    pub fn artifact_paths(&self) -> ArtifactPaths {
        let overrides = [
            (ModelKind::XGBoost, &self.xgboost_file),
            (ModelKind::DecisionTree, &self.decision_tree_file),
            (ModelKind::RandomForest, &self.random_forest_file),
            (ModelKind::Linear, &self.linear_file),
            (ModelKind::Polynomial, &self.polynomial_file),
        ];

        overrides
            .into_iter()
            .fold(ArtifactPaths::in_dir(&self.model_dir), |paths, (kind, file)| {
                match file {
                    Some(file) => paths.with_path(kind, self.model_dir.join(file)),
                    None => paths,
                }
            })
    }
}

/// premium-server: insurance premium prediction over HTTP
#[derive(Parser, Debug, Clone)]
#[command(name = "premium-server")]
#[command(version, about, long_about = None)]
pub struct ServeConfig {
    /// Address to bind
    #[arg(long, env = "PREMIUM_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "PREMIUM_PORT", default_value_t = 7860)]
    pub port: u16,

    #[command(flatten)]
    pub models: ModelArgs,

    /// Log filter directives (e.g. `info`, `premium=debug`)
    #[arg(long, env = "RUST_LOG", default_value = "info")]
    pub log_filter: String,
}

impl ServeConfig {
    pub fn bind_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }
}
