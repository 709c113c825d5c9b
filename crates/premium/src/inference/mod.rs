//! Prediction dispatch: record → feature vector → model → premium.
//!
//! [`PremiumPredictor`] is the process-wide, read-only context: a fitted
//! [`FeatureEncoder`] and a loaded [`ModelRegistry`]. It is built once at
//! startup and shared (behind an `Arc`) by every request.

use serde::Serialize;
use tracing::debug;

use crate::error::{PredictError, Result};
use crate::features::{FeatureEncoder, InsuranceRecord};
use crate::model::{ArtifactPaths, LinearScaling, ModelKind, ModelRegistry};
use crate::utils::{inverse_log1p, round_to};

/// Outcome of one prediction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionResult {
    pub model_type: ModelKind,
    /// Premium in currency units, rounded to cents.
    pub prediction: f64,
}

/// Encoder + registry, the whole inference state.
#[derive(Debug)]
pub struct PremiumPredictor {
    encoder: FeatureEncoder,
    registry: ModelRegistry,
}

impl PremiumPredictor {
    pub fn new(encoder: FeatureEncoder, registry: ModelRegistry) -> Self {
        Self { encoder, registry }
    }

    /// Fit the reference encoder and load every artifact under `paths`.
    pub fn load(paths: &ArtifactPaths, scaling: LinearScaling) -> Self {
        let encoder = FeatureEncoder::fit_reference();
        let registry = ModelRegistry::load(paths, scaling, encoder.n_features());
        Self::new(encoder, registry)
    }

    pub fn encoder(&self) -> &FeatureEncoder {
        &self.encoder
    }

    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }

    /// Predict the premium for `record` with the model named `model_type`.
    ///
    /// 1. lower-case the categorical fields
    /// 2. resolve `model_type` (unknown → [`PredictError::InvalidModel`])
    /// 3. assemble the feature vector
    /// 4. run the model's transform chain and predictor
    /// 5. invert the log target: `exp(raw) - 1`
    /// 6. reject non-finite results, round to 2 decimals
    ///
    /// Field domains are not re-checked here; see [`InsuranceRecord::validate`].
    pub fn predict(&self, record: &InsuranceRecord, model_type: &str) -> Result<PredictionResult> {
        let record = record.normalized();
        let kind: ModelKind = model_type
            .parse()
            .map_err(|_| PredictError::InvalidModel(model_type.to_string()))?;

        let features = self.encoder.assemble(&record)?;

        let entry = self.registry.get(kind).ok_or_else(|| PredictError::ModelUnavailable {
            model: kind,
            reason: self
                .registry
                .failure(kind)
                .unwrap_or("not loaded")
                .to_string(),
        })?;

        debug!(model = %kind, features = ?features.as_slice(), "running inference");
        let raw = entry.predict(features.view())?;

        let premium = inverse_log1p(raw);
        if !premium.is_finite() {
            return Err(PredictError::InvalidResult {
                model: kind,
                value: premium,
            });
        }

        Ok(PredictionResult {
            model_type: kind,
            prediction: round_to(premium, 2),
        })
    }

    /// [`InsuranceRecord::validate`] followed by [`predict`](Self::predict).
    pub fn predict_validated(
        &self,
        record: &InsuranceRecord,
        model_type: &str,
    ) -> Result<PredictionResult> {
        record.normalized().validate()?;
        self.predict(record, model_type)
    }
}
