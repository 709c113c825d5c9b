//! HTTP contract tests, driven through the router without a socket.

use std::fs;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use rstest::rstest;
use serde_json::{json, Value};
use tower::ServiceExt;

use premium::model::ArtifactPaths;
use premium::service::{router, PIPELINE_ACK, WELCOME_MESSAGE};
use premium::testing::{fixture_models_dir, fixture_predictor};
use premium::{LinearScaling, ModelKind, PremiumPredictor};

// =============================================================================
// Helpers
// =============================================================================

fn app() -> Router {
    router(Arc::new(fixture_predictor(LinearScaling::PerRequest)))
}

fn sample_body(model_type: &str) -> Value {
    json!({
        "age": 40,
        "sex": "male",
        "bmi": 27.5,
        "children": 2,
        "smoker": "no",
        "region": "northeast",
        "model_type": model_type
    })
}

async fn send(app: Router, method: Method, uri: &str, body: Option<String>) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    if body.is_some() {
        request = request.header(header::CONTENT_TYPE, "application/json");
    }
    let request = request
        .body(body.map(Body::from).unwrap_or_else(Body::empty))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

async fn post_json(app: Router, uri: &str, body: &Value) -> (StatusCode, Value) {
    send(app, Method::POST, uri, Some(body.to_string())).await
}

// =============================================================================
// Routes
// =============================================================================

#[tokio::test]
async fn root_welcomes() {
    let (status, body) = send(app(), Method::GET, "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": WELCOME_MESSAGE}));
}

#[tokio::test]
async fn health_lists_models_and_features() {
    let (status, body) = send(app(), Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(
        body["models_loaded"],
        json!(["xgboost", "decision_tree", "random_forest", "linear", "polynomial"])
    );
    assert_eq!(body["features"].as_array().unwrap().len(), 8);
    assert_eq!(body["features"][3], "sex_male");
    assert_eq!(body["failed"], json!({}));
}

#[rstest]
#[case("xgboost")]
#[case("decision_tree")]
#[case("random_forest")]
#[case("linear")]
#[case("polynomial")]
#[tokio::test]
async fn predict_with_each_model(#[case] model_type: &str) {
    let (status, body) = post_json(app(), "/predict", &sample_body(model_type)).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["model_type"], model_type);
    let prediction = body["prediction"].as_f64().unwrap();
    assert!(prediction.is_finite() && prediction > 0.0);
}

#[tokio::test]
async fn random_forest_answer_is_repeatable() {
    let app = app();
    let (_, first) = post_json(app.clone(), "/predict", &sample_body("random_forest")).await;
    let (_, second) = post_json(app, "/predict", &sample_body("random_forest")).await;
    assert_eq!(first, second);
}

#[tokio::test]
async fn categorical_values_are_case_insensitive() {
    let mut upper = sample_body("xgboost");
    upper["sex"] = json!("MALE");
    upper["region"] = json!("NorthEast");

    let (_, lower) = post_json(app(), "/predict", &sample_body("xgboost")).await;
    let (status, upper) = post_json(app(), "/predict", &upper).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(lower, upper);
}

// =============================================================================
// Errors
// =============================================================================

#[tokio::test]
async fn invalid_model_type_is_400() {
    let (status, body) = post_json(app(), "/predict", &sample_body("not_a_model")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Invalid model type: not_a_model");
}

#[rstest]
#[case("age", json!(17))]
#[case("age", json!(101))]
#[case("bmi", json!(9.5))]
#[case("bmi", json!(50.5))]
#[case("children", json!(11))]
#[case("sex", json!("other"))]
#[case("smoker", json!("sometimes"))]
#[case("region", json!("central"))]
#[tokio::test]
async fn out_of_domain_fields_are_400(#[case] field: &str, #[case] value: Value) {
    let mut body = sample_body("linear");
    body[field] = value;
    let (status, body) = post_json(app(), "/predict", &body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].as_str().unwrap().contains(field), "{body}");
}

#[tokio::test]
async fn malformed_body_is_400() {
    let mut body = sample_body("linear");
    body.as_object_mut().unwrap().remove("bmi");
    let (status, body) = post_json(app(), "/predict", &body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].is_string());

    let (status, _) = send(app(), Method::POST, "/predict", Some("{not json".into())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn missing_artifact_degrades_to_500() {
    let dir = tempfile::tempdir().unwrap();
    for kind in ModelKind::ALL {
        if kind != ModelKind::Polynomial {
            let name = kind.default_file_name();
            fs::copy(fixture_models_dir().join(name), dir.path().join(name)).unwrap();
        }
    }
    let predictor = PremiumPredictor::load(&ArtifactPaths::in_dir(dir.path()), LinearScaling::PerRequest);
    let app = router(Arc::new(predictor));

    let (status, health) = send(app.clone(), Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        health["models_loaded"],
        json!(["xgboost", "decision_tree", "random_forest", "linear"])
    );
    assert!(health["failed"]["polynomial"].is_string());

    let (status, body) = post_json(app.clone(), "/predict", &sample_body("polynomial")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["detail"], "Model 'polynomial' is not available");

    // The rest keep working.
    let (status, _) = post_json(app, "/predict", &sample_body("xgboost")).await;
    assert_eq!(status, StatusCode::OK);
}

// =============================================================================
// Pipeline receiver
// =============================================================================

#[tokio::test]
async fn pipeline_acknowledges_json() {
    let payload = json!({"records": [{"age": 19, "charges": 16884.924}], "source": "etl"});
    let (status, body) = post_json(app(), "/pipeline", &payload).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": PIPELINE_ACK}));
}

#[tokio::test]
async fn pipeline_reports_bad_json() {
    let (status, body) = send(app(), Method::POST, "/pipeline", Some("{oops".into())).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn cors_allows_any_origin() {
    let request = Request::builder()
        .method(Method::GET)
        .uri("/health")
        .header(header::ORIGIN, "https://chat.example.com")
        .body(Body::empty())
        .unwrap();
    let response = app().oneshot(request).await.unwrap();
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "*"
    );
}
