//! HTTP routes and handlers

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use diascreen_core::{ScreeningResult, ValidationErrors, FEATURE_COLUMNS};
use serde_json::{json, Value};
use std::time::Instant;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, warn};

use crate::state::AppState;

pub fn create_router(state: AppState) -> Router {
    let origins: Vec<HeaderValue> = state
        .config
        .cors_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(metrics))
        .route("/model", get(model_info))
        .route("/screen-diabetes", post(screen_diabetes))
        .fallback(fallback)
        .layer(RequestBodyLimitLayer::new(state.config.request_body_limit))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}

async fn metrics(State(state): State<AppState>) -> String {
    state.metrics_handle.render()
}

/// Describe the loaded model and threshold
async fn model_info(State(state): State<AppState>) -> Json<Value> {
    let metadata = state.service.model_metadata();
    Json(json!({
        "name": metadata.name,
        "version": metadata.version,
        "kind": metadata.kind,
        "features": FEATURE_COLUMNS,
        "threshold": state.service.threshold(),
    }))
}

/// Validate, score, and label one screening request
async fn screen_diabetes(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<ScreeningResult>, AppError> {
    let started = Instant::now();
    metrics::counter!("diascreen_requests_total").increment(1);

    let Json(raw) = payload?;
    let result = state.service.screen_raw(&raw)?;

    metrics::counter!("diascreen_screenings_total", "result" => result.label.as_str()).increment(1);
    metrics::histogram!("diascreen_screening_latency_us")
        .record(started.elapsed().as_micros() as f64);
    debug!(
        probability = result.probability,
        label = %result.label,
        "Screening complete"
    );

    Ok(Json(result))
}

async fn fallback() -> Response {
    let body = json!({
        "error": {
            "message": "Not found",
            "type": "not_found",
        }
    });
    (StatusCode::NOT_FOUND, Json(body)).into_response()
}

/// Error handling
#[derive(Debug)]
pub enum AppError {
    Validation(ValidationErrors),
    InvalidRequest { status: StatusCode, message: String },
    Internal(String),
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidRequest {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl From<diascreen_core::Error> for AppError {
    fn from(err: diascreen_core::Error) -> Self {
        match err {
            diascreen_core::Error::Validation(errors) => AppError::Validation(errors),
            other => AppError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::Validation(errors) => {
                warn!("Rejected screening request: {}", errors);
                metrics::counter!("diascreen_validation_failures_total").increment(1);

                let fields: Vec<Value> = errors
                    .errors()
                    .iter()
                    .map(|e| {
                        json!({
                            "field": e.field(),
                            "kind": e.violation().kind(),
                            "constraint": e.constraint(),
                        })
                    })
                    .collect();

                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    json!({
                        "error": {
                            "message": errors.to_string(),
                            "type": "validation_error",
                            "fields": fields,
                        }
                    }),
                )
            }
            AppError::InvalidRequest { status, message } => {
                metrics::counter!("diascreen_errors_total", "type" => "invalid_request").increment(1);
                (
                    status,
                    json!({
                        "error": {
                            "message": message,
                            "type": "invalid_request_error",
                        }
                    }),
                )
            }
            AppError::Internal(message) => {
                error!("Screening failed: {}", message);
                metrics::counter!("diascreen_errors_total", "type" => "internal").increment(1);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({
                        "error": {
                            "message": message,
                            "type": "internal_error",
                        }
                    }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}
