//! Request-path error taxonomy.
//!
//! Every failure between receiving a record and returning a premium maps to one
//! [`PredictError`] variant. Load-time failures live in
//! [`crate::compat::ArtifactError`] and [`crate::model::LoadError`] instead:
//! they never reach a request.

use thiserror::Error;

use crate::model::ModelKind;

/// Errors raised while turning a record into a premium.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PredictError {
    /// A record field is outside its domain.
    #[error("invalid {field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    /// A categorical value was never seen when the encoder was fitted.
    #[error("unknown category '{value}' for field '{field}'")]
    Encoding { field: String, value: String },

    /// The requested model identifier is not one of the supported kinds.
    #[error("Invalid model type: {0}")]
    InvalidModel(String),

    /// The identifier is valid but its artifact did not load at startup.
    #[error("model '{model}' is not loaded: {reason}")]
    ModelUnavailable { model: ModelKind, reason: String },

    /// A transform or inference step failed.
    #[error("prediction with model '{model}' failed: {message}")]
    Prediction { model: ModelKind, message: String },

    /// Inference produced NaN or infinity.
    #[error("model '{model}' produced a non-finite result ({value})")]
    InvalidResult { model: ModelKind, value: f64 },
}

impl PredictError {
    pub(crate) fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    pub(crate) fn prediction(model: ModelKind, message: impl ToString) -> Self {
        Self::Prediction {
            model,
            message: message.to_string(),
        }
    }

    /// True when the caller sent something wrong (HTTP 4xx), false for server faults.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Validation { .. } | Self::InvalidModel(_))
    }

    /// Message safe to return to callers.
    ///
    /// Client errors are returned verbatim. Server errors only name their class
    /// so internal details stay in the logs.
    pub fn public_message(&self) -> String {
        match self {
            Self::Validation { .. } | Self::InvalidModel(_) => self.to_string(),
            Self::Encoding { field, .. } => format!("Failed to encode field '{field}'"),
            Self::ModelUnavailable { model, .. } => format!("Model '{model}' is not available"),
            Self::Prediction { model, .. } => format!("Prediction with model '{model}' failed"),
            Self::InvalidResult { model, .. } => {
                format!("Model '{model}' produced an invalid prediction")
            }
        }
    }
}

/// Result alias for the request path.
pub type Result<T> = std::result::Result<T, PredictError>;
