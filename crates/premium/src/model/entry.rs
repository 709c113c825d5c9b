//! A loaded model and its inference path.

use std::path::Path;

use ndarray::{ArrayView1, Axis};

use crate::compat::sklearn::{SkDecisionTree, SkLinear, SkPolynomialBundle, SkRandomForest};
use crate::compat::xgboost::XgbModel;
use crate::compat::read_json;
use crate::error::PredictError;
use crate::repr::{Forest, LinearModel, PolynomialFeatures, StandardScaler};

use super::{LinearScaling, LoadError, ModelKind};

/// One trained model, ready for single-row inference.
///
/// Each variant owns the transform chain that runs before its predictor:
///
/// | variant        | chain                                         |
/// |----------------|-----------------------------------------------|
/// | `XGBoost`      | one-row batch → forest                        |
/// | `DecisionTree` | forest                                        |
/// | `RandomForest` | forest (mean of trees)                        |
/// | `Linear`       | scaler (artifact or per-request) → linear     |
/// | `Polynomial`   | polynomial expansion → scaler → linear        |
///
/// Outputs are in the training target space, `log(charge + 1)`.
#[derive(Debug, Clone)]
pub enum ModelEntry {
    XGBoost {
        forest: Forest,
    },
    DecisionTree {
        forest: Forest,
    },
    RandomForest {
        forest: Forest,
    },
    Linear {
        model: LinearModel,
        /// `None` fits a scaler on each request row.
        scaler: Option<StandardScaler>,
    },
    Polynomial {
        expander: PolynomialFeatures,
        scaler: StandardScaler,
        model: LinearModel,
    },
}

impl ModelEntry {
    /// Read and convert the artifact for `kind` from `path`.
    pub fn from_artifact(
        kind: ModelKind,
        path: &Path,
        scaling: LinearScaling,
    ) -> Result<Self, LoadError> {
        let conversion = |e| LoadError::conversion(path, e);

        let entry = match kind {
            ModelKind::XGBoost => {
                let model = XgbModel::from_file(path)?;
                ModelEntry::XGBoost {
                    forest: model.to_forest().map_err(conversion)?,
                }
            }
            ModelKind::DecisionTree => {
                let model: SkDecisionTree = read_json(path)?;
                ModelEntry::DecisionTree {
                    forest: model.to_forest().map_err(conversion)?,
                }
            }
            ModelKind::RandomForest => {
                let model: SkRandomForest = read_json(path)?;
                ModelEntry::RandomForest {
                    forest: model.to_forest().map_err(conversion)?,
                }
            }
            ModelKind::Linear => {
                let artifact: SkLinear = read_json(path)?;
                let model = artifact.to_linear().map_err(conversion)?;
                let scaler = match scaling {
                    LinearScaling::PerRequest => None,
                    LinearScaling::Artifact => Some(
                        artifact
                            .to_scaler()
                            .map_err(conversion)?
                            .ok_or(LoadError::MissingScaler { model: kind })?,
                    ),
                };
                ModelEntry::Linear { model, scaler }
            }
            ModelKind::Polynomial => {
                let bundle: SkPolynomialBundle = read_json(path)?;
                let (expander, scaler, model) = bundle.to_parts().map_err(conversion)?;
                ModelEntry::Polynomial {
                    expander,
                    scaler,
                    model,
                }
            }
        };

        Ok(entry)
    }

    pub fn kind(&self) -> ModelKind {
        match self {
            ModelEntry::XGBoost { .. } => ModelKind::XGBoost,
            ModelEntry::DecisionTree { .. } => ModelKind::DecisionTree,
            ModelEntry::RandomForest { .. } => ModelKind::RandomForest,
            ModelEntry::Linear { .. } => ModelKind::Linear,
            ModelEntry::Polynomial { .. } => ModelKind::Polynomial,
        }
    }

    /// Width of the feature vector this entry consumes.
    pub fn n_features(&self) -> usize {
        match self {
            ModelEntry::XGBoost { forest }
            | ModelEntry::DecisionTree { forest }
            | ModelEntry::RandomForest { forest } => forest.n_features(),
            ModelEntry::Linear { model, .. } => model.n_features(),
            ModelEntry::Polynomial { expander, .. } => expander.n_inputs(),
        }
    }

    /// Short human-readable summary for startup logs.
    pub fn summary(&self) -> String {
        match self {
            ModelEntry::XGBoost { forest }
            | ModelEntry::DecisionTree { forest }
            | ModelEntry::RandomForest { forest } => {
                format!("{} trees, {} nodes", forest.n_trees(), forest.n_nodes())
            }
            ModelEntry::Linear { model, scaler } => format!(
                "{} weights, {} scaling",
                model.n_features(),
                if scaler.is_some() { "artifact" } else { "per-request" }
            ),
            ModelEntry::Polynomial { expander, .. } => format!(
                "{} inputs expanded to {} terms",
                expander.n_inputs(),
                expander.n_outputs()
            ),
        }
    }

    /// Raw model output (log space) for one encoded feature vector.
    pub fn predict(&self, features: ArrayView1<'_, f64>) -> Result<f64, PredictError> {
        let kind = self.kind();
        if features.len() != self.n_features() {
            return Err(PredictError::prediction(
                kind,
                format!(
                    "expected {} features, got {}",
                    self.n_features(),
                    features.len()
                ),
            ));
        }

        match self {
            ModelEntry::XGBoost { forest } => {
                let batch = features.insert_axis(Axis(0));
                forest
                    .predict_batch(batch)
                    .first()
                    .copied()
                    .ok_or_else(|| PredictError::prediction(kind, "empty prediction batch"))
            }
            ModelEntry::DecisionTree { forest } | ModelEntry::RandomForest { forest } => {
                Ok(match features.as_slice() {
                    Some(row) => forest.predict_row(row),
                    None => forest.predict_row(&features.to_vec()),
                })
            }
            ModelEntry::Linear { model, scaler } => {
                let scaled = match scaler {
                    Some(scaler) => scaler.transform(features),
                    None => StandardScaler::fit(features.insert_axis(Axis(0)))
                        .and_then(|fitted| fitted.transform(features)),
                }
                .map_err(|e| PredictError::prediction(kind, e))?;
                Ok(model.predict_row(scaled.view()))
            }
            ModelEntry::Polynomial {
                expander,
                scaler,
                model,
            } => {
                let expanded = expander
                    .transform(features)
                    .map_err(|e| PredictError::prediction(kind, e))?;
                let scaled = scaler
                    .transform(expanded.view())
                    .map_err(|e| PredictError::prediction(kind, e))?;
                Ok(model.predict_row(scaled.view()))
            }
        }
    }
}
