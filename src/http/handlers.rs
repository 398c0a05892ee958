//! Route handlers for `/health`, `/metadata` and `/predict`.
//!
//! `/predict` checks run in a fixed order: empty body, content type,
//! decoding, empty object. Only then is the engine called.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::Response;

use crate::http::request::request_id;
use crate::http::response::{json_response, ApiError};
use crate::http::server::AppState;
use crate::json::{decode, Object, Value};
use crate::observability::metrics;
use crate::prediction::{normalize, project};
use crate::scoring::ScoringEngine;

/// `GET /health`
pub async fn health() -> Response {
    let mut doc = Object::new();
    doc.insert("status", "ok");
    json_response(StatusCode::OK, &Value::Object(doc))
}

/// `GET /metadata`: model category and declared response names.
pub async fn metadata(State(state): State<AppState>) -> Response {
    let engine = state.engine.as_ref();
    let mut doc = Object::new();
    doc.insert("model_category", engine.category().name());
    doc.insert(
        "response_names",
        engine.response_names().map(|names| names.to_vec()),
    );
    json_response(StatusCode::OK, &Value::Object(doc))
}

/// `POST /predict`
pub async fn predict(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ApiError> {
    let request_id = request_id(&headers);
    match predict_document(state.engine.as_ref(), &headers, &body) {
        Ok(doc) => {
            tracing::debug!(
                request_id = %request_id,
                model_category = %state.engine.category(),
                "Prediction served"
            );
            Ok(json_response(StatusCode::OK, &Value::Object(doc)))
        }
        Err(e) => {
            if let ApiError::ScoringFailure(ref reason) = e {
                metrics::record_scoring_failure(state.engine.category().name());
                tracing::warn!(request_id = %request_id, error = %reason, "Scoring failed");
            } else {
                tracing::debug!(request_id = %request_id, error = %e, "Rejected prediction request");
            }
            Err(e)
        }
    }
}

/// Fallback for a known path hit with the wrong method.
pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

/// Fallback for unknown paths.
pub async fn not_found() -> ApiError {
    ApiError::NotFound
}

/// Decode, project, score and normalize one request body.
pub fn predict_document(
    engine: &dyn ScoringEngine,
    headers: &HeaderMap,
    body: &[u8],
) -> Result<Object, ApiError> {
    if body.is_empty() {
        return Err(ApiError::EmptyBody);
    }
    if !is_json(headers) {
        return Err(ApiError::UnsupportedContentType);
    }

    let text = String::from_utf8_lossy(body);
    let input = decode(&text)?;
    if input.is_empty() {
        return Err(ApiError::EmptyObject);
    }

    let record = project(&input);
    let result = engine.score(&record)?;
    Ok(normalize(
        engine.category(),
        engine.response_names(),
        result,
        input,
    ))
}

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|ct| ct.to_ascii_lowercase().contains("application/json"))
        .unwrap_or(false)
}
