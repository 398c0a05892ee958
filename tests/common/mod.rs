//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, Response, StatusCode};
use axum::Router;
use tower::ServiceExt;

use prediction_server::config::ServerConfig;
use prediction_server::http::{build_router, AppState};
use prediction_server::scoring::{
    InputRecord, OutcomeCategory, PredictionResult, ScoringEngine, ScoringError,
};

/// Engine returning a canned result, or failing when the record has a
/// `fail` field.
pub struct StubEngine {
    pub category: OutcomeCategory,
    pub response_names: Option<Vec<String>>,
    pub result: PredictionResult,
}

impl StubEngine {
    pub fn binomial() -> Self {
        Self {
            category: OutcomeCategory::Binomial,
            response_names: Some(vec!["No".into(), "Yes".into()]),
            result: PredictionResult::Binomial {
                label: "Yes".into(),
                class_probabilities: vec![0.25, 0.75],
            },
        }
    }

    pub fn regression(value: f64) -> Self {
        Self {
            category: OutcomeCategory::Regression,
            response_names: None,
            result: PredictionResult::Regression { value },
        }
    }

    pub fn unhandled(name: &str) -> Self {
        Self {
            category: OutcomeCategory::Other(name.into()),
            response_names: None,
            result: PredictionResult::Unhandled {
                category_name: name.into(),
            },
        }
    }
}

impl ScoringEngine for StubEngine {
    fn category(&self) -> &OutcomeCategory {
        &self.category
    }

    fn response_names(&self) -> Option<&[String]> {
        self.response_names.as_deref()
    }

    fn score(&self, record: &InputRecord) -> Result<PredictionResult, ScoringError> {
        if let Some(level) = record.get("fail") {
            return Err(ScoringError::UnknownLevel {
                column: "fail".into(),
                level: level.into(),
            });
        }
        Ok(self.result.clone())
    }
}

/// A fully layered router with the default configuration.
pub fn router(engine: impl ScoringEngine + 'static) -> Router {
    router_with(&ServerConfig::default(), engine)
}

pub fn router_with(config: &ServerConfig, engine: impl ScoringEngine + 'static) -> Router {
    build_router(
        config,
        AppState {
            engine: Arc::new(engine),
        },
    )
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn post_json(uri: &str, body: &str) -> Request<Body> {
    post(uri, "application/json", body)
}

pub fn post(uri: &str, content_type: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CONTENT_LENGTH, body.len())
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Send one request through the router, returning status, response and body text.
pub async fn send(router: Router, request: Request<Body>) -> (StatusCode, Response<()>, String) {
    let response = router.oneshot(request).await.unwrap();
    let (parts, body) = response.into_parts();
    let bytes = to_bytes(body, usize::MAX).await.unwrap();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    (parts.status, Response::from_parts(parts, ()), text)
}
