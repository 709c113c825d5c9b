//! Axum router and handlers.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::PremiumPredictor;

use super::dto::{
    HealthResponse, MessageResponse, PipelineError, PredictRequest, PredictResponse,
};
use super::error::ApiError;

pub const WELCOME_MESSAGE: &str = "Welcome to Insurance Premium Prediction API";
pub const PIPELINE_ACK: &str = "Data received successfully";

/// Shared handler state.
pub type AppState = Arc<PremiumPredictor>;

/// Build the service router.
///
/// | route            | handler        |
/// |------------------|----------------|
/// | `GET /`          | welcome text   |
/// | `GET /health`    | loaded models  |
/// | `POST /predict`  | one prediction |
/// | `POST /pipeline` | log a payload  |
pub fn router(predictor: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/predict", post(predict))
        .route("/pipeline", post(pipeline))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(predictor)
}

async fn root() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: WELCOME_MESSAGE.to_string(),
    })
}

async fn health(State(predictor): State<AppState>) -> Json<HealthResponse> {
    let registry = predictor.registry();
    Json(HealthResponse {
        status: "healthy",
        models_loaded: registry.loaded().collect(),
        features: predictor.encoder().feature_names(),
        failed: registry.failures().clone(),
    })
}

async fn predict(
    State(predictor): State<AppState>,
    payload: Result<Json<PredictRequest>, JsonRejection>,
) -> Result<Json<PredictResponse>, ApiError> {
    let Json(request) = payload?;
    let result = predictor.predict_validated(&request.record(), &request.model_type)?;

    info!(model = %result.model_type, prediction = result.prediction, "prediction served");
    Ok(Json(result.into()))
}

/// Accept any JSON document and log it.
async fn pipeline(body: Bytes) -> Response {
    match serde_json::from_slice::<serde_json::Value>(&body) {
        Ok(value) => {
            let pretty = serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string());
            info!(payload = %pretty, "pipeline data received");
            Json(MessageResponse {
                message: PIPELINE_ACK.to_string(),
            })
            .into_response()
        }
        Err(e) => Json(PipelineError {
            error: e.to_string(),
        })
        .into_response(),
    }
}
