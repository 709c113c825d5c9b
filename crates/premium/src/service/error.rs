//! HTTP mapping of request errors.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::error;

use crate::error::PredictError;

use super::dto::ErrorResponse;

/// Error returned by the HTTP handlers.
///
/// Rendered as `{"detail": "<message>"}`. Client errors answer 400 with the
/// full message; server errors answer 500 with a generic one and are logged.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("malformed request body: {0}")]
    Body(String),
    #[error(transparent)]
    Predict(#[from] PredictError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Body(_) => StatusCode::BAD_REQUEST,
            ApiError::Predict(e) if e.is_client_error() => StatusCode::BAD_REQUEST,
            ApiError::Predict(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn detail(&self) -> String {
        match self {
            ApiError::Body(_) => self.to_string(),
            ApiError::Predict(e) => e.public_message(),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Body(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "prediction failed");
        }
        (status, Json(ErrorResponse { detail: self.detail() })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ModelKind;

    #[test]
    fn status_follows_error_class() {
        assert_eq!(
            ApiError::from(PredictError::InvalidModel("svm".into())).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(PredictError::validation("age", "too young")).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::Body("eof".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::from(PredictError::InvalidResult {
                model: ModelKind::Polynomial,
                value: f64::INFINITY
            })
            .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::from(PredictError::Encoding {
                field: "sex".into(),
                value: "x".into()
            })
            .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn server_detail_is_generic() {
        let err = ApiError::from(PredictError::prediction(
            ModelKind::XGBoost,
            "expected 8 features, got 7",
        ));
        assert_eq!(err.detail(), "Prediction with model 'xgboost' failed");
    }
}
