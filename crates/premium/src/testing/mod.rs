//! Test fixtures shared by unit and integration tests.
//!
//! The fixtures live under `tests/test-cases/`:
//!
//! - `models/`: one artifact per model kind, under the default file names
//! - `expected.json`: input records and the premium each model must produce

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Deserialize;

use crate::compat::{read_json, ArtifactError};
use crate::features::InsuranceRecord;
use crate::model::{ArtifactPaths, LinearScaling};
use crate::PremiumPredictor;

/// Absolute tolerance when comparing premiums against `expected.json`.
///
/// Expected values are already rounded to cents, so allow one cent of drift.
pub const PREMIUM_TOLERANCE: f64 = 0.011;

/// Key in [`ExpectedCases::predictions`] for the linear model under
/// [`LinearScaling::Artifact`].
pub const LINEAR_ARTIFACT_KEY: &str = "linear_artifact_scaling";

/// Records and per-model expected premiums, loaded from JSON.
///
/// Expects JSON format:
/// ```json
/// {
///   "records": [{"age": 40, "sex": "male", ...}],
///   "predictions": {"xgboost": [6538.4], ...}
/// }
/// ```
///
/// `predictions[model][i]` is the premium for `records[i]`.
#[derive(Debug, Deserialize)]
pub struct ExpectedCases {
    pub records: Vec<InsuranceRecord>,
    pub predictions: BTreeMap<String, Vec<f64>>,
}

impl ExpectedCases {
    /// Records paired with the expected premiums of `key`.
    pub fn cases(&self, key: &str) -> impl Iterator<Item = (&InsuranceRecord, f64)> + '_ {
        let expected = self.predictions.get(key).map(Vec::as_slice).unwrap_or(&[]);
        self.records.iter().zip(expected.iter().copied())
    }
}

/// Root of the test-case fixtures.
pub fn test_cases_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/test-cases")
}

/// Directory holding the five fixture artifacts.
pub fn fixture_models_dir() -> PathBuf {
    test_cases_dir().join("models")
}

pub fn load_expected() -> Result<ExpectedCases, ArtifactError> {
    read_json(test_cases_dir().join("expected.json"))
}

/// Predictor over the fixture artifacts.
pub fn fixture_predictor(scaling: LinearScaling) -> PremiumPredictor {
    PremiumPredictor::load(&ArtifactPaths::in_dir(fixture_models_dir()), scaling)
}

/// `40, male, 27.5, 2 children, non-smoker, northeast`.
pub fn sample_record() -> InsuranceRecord {
    InsuranceRecord {
        age: 40,
        sex: "male".to_string(),
        bmi: 27.5,
        children: 2,
        smoker: "no".to_string(),
        region: "northeast".to_string(),
    }
}
