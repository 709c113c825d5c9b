//! Request and response bodies.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::features::InsuranceRecord;
use crate::inference::PredictionResult;
use crate::model::ModelKind;

/// `POST /predict` body.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PredictRequest {
    pub age: i64,
    pub sex: String,
    pub bmi: f64,
    pub children: i64,
    pub smoker: String,
    pub region: String,
    pub model_type: String,
}

impl PredictRequest {
    pub fn record(&self) -> InsuranceRecord {
        InsuranceRecord {
            age: self.age,
            sex: self.sex.clone(),
            bmi: self.bmi,
            children: self.children,
            smoker: self.smoker.clone(),
            region: self.region.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictResponse {
    pub model_type: String,
    pub prediction: f64,
}

impl From<PredictionResult> for PredictResponse {
    fn from(result: PredictionResult) -> Self {
        Self {
            model_type: result.model_type.to_string(),
            prediction: result.prediction,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub models_loaded: Vec<ModelKind>,
    pub features: Vec<String>,
    pub failed: BTreeMap<ModelKind, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub detail: String,
}

/// Reply to a `/pipeline` body that is not JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineError {
    pub error: String,
}
