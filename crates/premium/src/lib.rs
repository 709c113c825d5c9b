//! premium: insurance premium prediction over five regression models.
//!
//! A raw applicant record (age, sex, BMI, children, smoker, region) is encoded
//! into a fixed 8-column feature vector and routed to one of five trained
//! models. All models were trained on `log(charge + 1)`; the answer is
//! `exp(prediction) - 1`, rounded to cents.
//!
//! # Key Types
//!
//! - [`PremiumPredictor`] - Encoder + model registry, the whole inference state
//! - [`InsuranceRecord`] - One applicant
//! - [`ModelKind`] / [`ModelEntry`] / [`ModelRegistry`] - The loaded models
//! - [`PredictError`] - Request-path failures
//!
//! # Loading Models
//!
//! Artifacts are JSON: XGBoost's native model format, and JSON exports of
//! the scikit-learn estimators. See the [`compat`] module for the schemas and
//! [`repr`] for the native representations they convert to.
//!
//! # Serving
//!
//! [`service::router`] exposes the predictor over HTTP; the `premium-server`
//! binary wires it to [`config::ServeConfig`] and [`logging`].

pub mod compat;
pub mod config;
pub mod error;
pub mod features;
pub mod inference;
pub mod logging;
pub mod model;
pub mod repr;
pub mod service;
pub mod testing;
pub mod utils;

// =============================================================================
// Convenience Re-exports
// =============================================================================

pub use error::{PredictError, Result};
pub use features::{FeatureEncoder, InsuranceRecord};
pub use inference::{PredictionResult, PremiumPredictor};
pub use model::{ArtifactPaths, LinearScaling, ModelEntry, ModelKind, ModelRegistry};
