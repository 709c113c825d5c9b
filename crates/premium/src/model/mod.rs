//! The five model kinds and the registry that holds them.
//!
//! - [`ModelKind`]: the supported model identifiers
//! - [`ModelEntry`]: one loaded model with its per-kind transform chain
//! - [`ModelRegistry`]: identifier → entry mapping built once at startup

mod entry;
mod registry;

pub use entry::ModelEntry;
pub use registry::{ArtifactPaths, ModelRegistry};

use std::fmt;
use std::str::FromStr;

use crate::compat::{ArtifactError, ConversionError};

// =============================================================================
// ModelKind
// =============================================================================

/// Supported model identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ModelKind {
    XGBoost,
    DecisionTree,
    RandomForest,
    Linear,
    Polynomial,
}

impl ModelKind {
    /// Every kind, in registry order.
    pub const ALL: [ModelKind; 5] = [
        ModelKind::XGBoost,
        ModelKind::DecisionTree,
        ModelKind::RandomForest,
        ModelKind::Linear,
        ModelKind::Polynomial,
    ];

    /// Identifier used on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            ModelKind::XGBoost => "xgboost",
            ModelKind::DecisionTree => "decision_tree",
            ModelKind::RandomForest => "random_forest",
            ModelKind::Linear => "linear",
            ModelKind::Polynomial => "polynomial",
        }
    }

    /// Default artifact file name inside the model directory.
    pub fn default_file_name(self) -> &'static str {
        match self {
            ModelKind::XGBoost => "best_xgboost_model.json",
            ModelKind::DecisionTree => "DecisionTree_model.json",
            ModelKind::RandomForest => "RandomForest_model.json",
            ModelKind::Linear => "LinearRegression_model.json",
            ModelKind::Polynomial => "insurance_model.json",
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl serde::Serialize for ModelKind {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Error parsing an unknown model identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown model type '{0}'")]
pub struct UnknownModelKind(pub String);

impl FromStr for ModelKind {
    type Err = UnknownModelKind;

    /// Exact match on the lower-case identifier.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ModelKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownModelKind(s.to_string()))
    }
}

// =============================================================================
// LinearScaling
// =============================================================================

/// How the `linear` model standardises its input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum LinearScaling {
    /// Fit a fresh scaler on the request row itself. A one-row fit has zero
    /// variance, so every input maps to zeros and the model returns its
    /// intercept. Matches the deployed service.
    #[default]
    PerRequest,
    /// Apply the scaler stored alongside the linear artifact.
    Artifact,
}

// =============================================================================
// LoadError
// =============================================================================

/// Why one model failed to load.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error(transparent)]
    Artifact(#[from] ArtifactError),
    #[error("{model} expects {actual} input features but the encoder produces {expected}")]
    WidthMismatch {
        model: ModelKind,
        expected: usize,
        actual: usize,
    },
    #[error("{model} artifact has no scaler, required by artifact scaling")]
    MissingScaler { model: ModelKind },
}

impl LoadError {
    pub(crate) fn conversion(path: &std::path::Path, source: ConversionError) -> Self {
        Self::Artifact(ArtifactError::conversion(path, source))
    }
}
