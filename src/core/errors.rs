use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use thiserror::Error;

/// Failures inside the answering engine and its collaborators.
///
/// Only `Retrieval` (and grounded-path generation failures) are recovered
/// internally via the direct-mode fallback; everything else reaches the API
/// boundary as a distinguishable failure.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("configuration error: {0}")]
    Config(String),
    #[error("document store unavailable: {0}")]
    StoreUnavailable(String),
    #[error("retrieval error: {0}")]
    Retrieval(String),
    #[error("generation error: {0}")]
    Generation(String),
}

/// Validation failures of the GPA subsystem. Always a caller error.
#[derive(Debug, Error, PartialEq)]
pub enum GpaError {
    #[error("no courses provided")]
    NoCourses,
    #[error("invalid grade: {0}")]
    UnknownGrade(String),
    #[error("credits must be greater than zero (course: {0})")]
    NonPositiveCredits(String),
    #[error("total credits cannot be zero")]
    ZeroTotalCredits,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn internal<E: std::fmt::Display>(err: E) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::Config(msg) => ApiError::ServiceUnavailable(msg),
            EngineError::StoreUnavailable(msg) => ApiError::ServiceUnavailable(msg),
            EngineError::Retrieval(msg) => ApiError::Internal(msg),
            EngineError::Generation(msg) => ApiError::Internal(msg),
        }
    }
}

impl From<GpaError> for ApiError {
    fn from(err: GpaError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match &self {
            ApiError::ServiceUnavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg.clone()),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        };

        let body = Json(json!({ "error": message }));
        (status, body).into_response()
    }
}
