//! Integration tests for the DiaScreen HTTP boundary

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use diascreen_classifiers::{Classifier, ScreeningService, ScreeningThreshold};
use diascreen_core::{Error, FeatureVector, Result};
use diascreen_server::{create_router, AppState, ServerConfig};
use metrics_exporter_prometheus::PrometheusBuilder;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

/// Scores by BMI so different bodies get different probabilities
struct BmiClassifier;

impl Classifier for BmiClassifier {
    fn predict_proba(&self, features: &FeatureVector) -> Result<f64> {
        Ok((features.bmi / 50.0).clamp(0.0, 1.0))
    }

    fn name(&self) -> &str {
        "bmi-linear"
    }
}

struct BrokenClassifier;

impl Classifier for BrokenClassifier {
    fn predict_proba(&self, _features: &FeatureVector) -> Result<f64> {
        Err(Error::computation("model exploded"))
    }

    fn name(&self) -> &str {
        "broken"
    }
}

fn app_with(classifier: Arc<dyn Classifier>, threshold: f64) -> Router {
    let service = ScreeningService::new(classifier, ScreeningThreshold::new(threshold).unwrap());
    let handle = PrometheusBuilder::new().build_recorder().handle();
    create_router(AppState::with_service(ServerConfig::default(), service, handle))
}

fn app() -> Router {
    app_with(Arc::new(BmiClassifier), 0.5)
}

fn reference_body() -> Value {
    json!({
        "age": 45,
        "gender": "Male",
        "height": 1.72,
        "weight": 75,
        "smoking_history": "never",
        "hypertension": "No",
        "heart_disease": "No"
    })
}

fn post_json(body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/screen-diabetes")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap()
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, bytes.to_vec())
}

async fn send_json(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let (status, bytes) = send(app, request).await;
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_health_endpoint() {
    let request = Request::get("/health").body(Body::empty()).unwrap();
    let (status, body) = send(app(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"OK");
}

#[tokio::test]
async fn test_screen_reference_request() {
    let (status, body) = send_json(app(), post_json(&reference_body())).await;

    assert_eq!(status, StatusCode::OK);
    // bmi 25.35 / 50 = 0.507
    assert_eq!(body["diabetes_risk_probability"], 0.507);
    assert_eq!(body["screening_threshold"], 0.5);
    assert_eq!(body["screening_result"], "High Risk");
}

#[tokio::test]
async fn test_screen_low_risk() {
    let mut request = reference_body();
    request["weight"] = json!(60);

    let (status, body) = send_json(app(), post_json(&request)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["screening_result"], "Low Risk");
    let probability = body["diabetes_risk_probability"].as_f64().unwrap();
    assert!((0.0..=1.0).contains(&probability));
    assert!(probability < body["screening_threshold"].as_f64().unwrap());
}

#[tokio::test]
async fn test_identical_requests_identical_bytes() {
    let (_, first) = send(app(), post_json(&reference_body())).await;
    let (_, second) = send(app(), post_json(&reference_body())).await;
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_out_of_range_is_unprocessable() {
    let mut request = reference_body();
    request["age"] = json!(0);

    let (status, body) = send_json(app(), post_json(&request)).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["type"], "validation_error");
    assert_eq!(body["error"]["fields"][0]["field"], "age");
    assert_eq!(body["error"]["fields"][0]["kind"], "out_of_range");
    assert_eq!(
        body["error"]["fields"][0]["constraint"],
        "must satisfy 0 < age < 120"
    );
    assert!(body.get("diabetes_risk_probability").is_none());
}

#[tokio::test]
async fn test_all_invalid_fields_reported() {
    let request = json!({
        "age": 45,
        "gender": "Male",
        "height": 3.0,
        "weight": 75,
        "smoking_history": "sometimes",
        "hypertension": "maybe"
    });

    let (status, body) = send_json(app(), post_json(&request)).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let fields: Vec<&str> = body["error"]["fields"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["field"].as_str().unwrap())
        .collect();
    assert_eq!(
        fields,
        vec!["height", "smoking_history", "hypertension", "heart_disease"]
    );
}

#[tokio::test]
async fn test_non_object_body_is_unprocessable() {
    let (status, body) = send_json(app(), post_json(&json!("age=45"))).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["fields"][0]["field"], "body");
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let request = Request::post("/screen-diabetes")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"age\": 45,"))
        .unwrap();

    let (status, body) = send_json(app(), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["type"], "invalid_request_error");
}

#[tokio::test]
async fn test_missing_content_type_is_unsupported() {
    let request = Request::post("/screen-diabetes")
        .body(Body::from(serde_json::to_vec(&reference_body()).unwrap()))
        .unwrap();

    let (status, _) = send(app(), request).await;
    assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
}

#[tokio::test]
async fn test_oversized_body_rejected() {
    let mut request = reference_body();
    request["notes"] = json!("x".repeat(64 * 1024));

    let (status, _) = send(app(), post_json(&request)).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn test_classifier_failure_is_server_error() {
    let app = app_with(Arc::new(BrokenClassifier), 0.5);
    let (status, body) = send_json(app, post_json(&reference_body())).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"]["type"], "internal_error");
}

#[tokio::test]
async fn test_model_endpoint() {
    let request = Request::get("/model").body(Body::empty()).unwrap();
    let (status, body) = send_json(app(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "bmi-linear");
    assert_eq!(body["kind"], "custom");
    assert_eq!(body["threshold"], 0.5);
    assert_eq!(
        body["features"],
        json!(["age", "gender", "smoking_history", "bmi", "hypertension", "heart_disease"])
    );
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let request = Request::get("/metrics").body(Body::empty()).unwrap();
    let (status, _) = send(app(), request).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_unknown_route_not_found() {
    let request = Request::get("/predict").body(Body::empty()).unwrap();
    let (status, body) = send_json(app(), request).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["type"], "not_found");
}

#[tokio::test]
async fn test_get_on_screen_route_not_allowed() {
    let request = Request::get("/screen-diabetes").body(Body::empty()).unwrap();
    let (status, _) = send(app(), request).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}
