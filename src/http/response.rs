//! Response rendering and error mapping.
//!
//! # Responsibilities
//! - Render response documents through the crate's own JSON encoder
//! - Map request failures to status codes and `{"error": ...}` bodies
//!
//! # Design Decisions
//! - Every response, success or failure, is `application/json; charset=utf-8`.
//!   Rejections raised by transport layers are rewritten by `json_transport_errors`
//! - Encoding cannot fail, so once a document exists a response exists
//! - An unhandled model category is not an error (200 with a warning)

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::json::{encode, MalformedJson, Object, Value};
use crate::scoring::ScoringError;

/// Content type of every response.
pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// Request failures surfaced to clients.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid JSON: {0}")]
    MalformedJson(#[from] MalformedJson),

    #[error("Content-Type must be application/json")]
    UnsupportedContentType,

    #[error("No JSON input provided in request body")]
    EmptyBody,

    #[error("Empty JSON object provided")]
    EmptyObject,

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Not found")]
    NotFound,

    #[error("Request body too large")]
    PayloadTooLarge,

    #[error("Request timed out")]
    Timeout,

    #[error("Prediction error: {0}")]
    ScoringFailure(#[from] ScoringError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MalformedJson(_)
            | ApiError::UnsupportedContentType
            | ApiError::EmptyBody
            | ApiError::EmptyObject => StatusCode::BAD_REQUEST,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Timeout => StatusCode::REQUEST_TIMEOUT,
            ApiError::ScoringFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut doc = Object::new();
        doc.insert("error", self.to_string());
        json_response(self.status(), &Value::Object(doc))
    }
}

/// Rewrite plain-text 413 and 408 responses from the body limit and
/// timeout layers into `{"error": ...}` documents.
pub async fn json_transport_errors(response: Response) -> Response {
    let is_json = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|ct| ct.starts_with("application/json"))
        .unwrap_or(false);
    if is_json {
        return response;
    }

    match response.status() {
        StatusCode::PAYLOAD_TOO_LARGE => ApiError::PayloadTooLarge.into_response(),
        StatusCode::REQUEST_TIMEOUT => ApiError::Timeout.into_response(),
        _ => response,
    }
}

/// Encode `document` as the body of a response with the given status.
pub fn json_response(status: StatusCode, document: &Value) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE))],
        encode(document),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiError::EmptyBody.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::EmptyObject.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::MalformedJson(MalformedJson::NotAnObject).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::MethodNotAllowed.status(),
            StatusCode::METHOD_NOT_ALLOWED
        );
        assert_eq!(
            ApiError::ScoringFailure(ScoringError::InvalidNumber {
                column: "x".into(),
                value: "y".into()
            })
            .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            ApiError::MalformedJson(MalformedJson::NestedValue).to_string(),
            "Invalid JSON: nested objects and arrays are not supported"
        );
        assert_eq!(
            ApiError::UnsupportedContentType.to_string(),
            "Content-Type must be application/json"
        );
    }

    #[tokio::test]
    async fn test_transport_errors_become_json() {
        let timeout = StatusCode::REQUEST_TIMEOUT.into_response();
        let response = json_transport_errors(timeout).await;
        assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            JSON_CONTENT_TYPE
        );
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], br#"{"error":"Request timed out"}"#);

        let too_large = (StatusCode::PAYLOAD_TOO_LARGE, "length limit exceeded").into_response();
        let response = json_transport_errors(too_large).await;
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            JSON_CONTENT_TYPE
        );
    }

    #[tokio::test]
    async fn test_json_responses_pass_through() {
        let response = json_transport_errors(ApiError::NotFound.into_response()).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let ok = json_transport_errors(StatusCode::OK.into_response()).await;
        assert_eq!(ok.status(), StatusCode::OK);
    }

    #[test]
    fn test_error_response_headers() {
        let response = ApiError::EmptyObject.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            JSON_CONTENT_TYPE
        );
    }
}
