use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Failure modes of the plan pipeline and its storage.
///
/// Each variant maps to a distinct status code so callers can tell a slow
/// upstream from a garbled one from a plan that simply does not exist yet.
/// Nothing here is ever collapsed into a silently-empty plan.
#[derive(Error, Debug)]
pub enum PlanError {
    #[error("Profile not found. Please complete your profile first.")]
    ProfileNotFound,
    #[error("No plan exists for this user")]
    PlanNotFound,
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Agent runtime unavailable: {0}")]
    UpstreamUnavailable(String),
    #[error("Agent runtime timed out")]
    UpstreamTimeout,
    #[error("Malformed agent response: {0}")]
    MalformedResponse(String),
    #[error("Plan failed schema validation: {0}")]
    SchemaViolation(String),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for PlanError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            PlanError::ProfileNotFound => (StatusCode::NOT_FOUND, "PROFILE_NOT_FOUND"),
            PlanError::PlanNotFound => (StatusCode::NOT_FOUND, "PLAN_NOT_FOUND"),
            PlanError::InvalidInput(_) => (StatusCode::UNPROCESSABLE_ENTITY, "INPUT_INVALID"),
            PlanError::UpstreamUnavailable(_) => (StatusCode::BAD_GATEWAY, "UPSTREAM_UNAVAILABLE"),
            PlanError::UpstreamTimeout => (StatusCode::GATEWAY_TIMEOUT, "UPSTREAM_TIMEOUT"),
            PlanError::MalformedResponse(_) => (StatusCode::BAD_GATEWAY, "MALFORMED_RESPONSE"),
            PlanError::SchemaViolation(_) => (StatusCode::BAD_GATEWAY, "SCHEMA_VIOLATION"),
            PlanError::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, "DATABASE_ERROR"),
            PlanError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };

        let body = Json(json!({
            "error": code,
            "message": self.to_string(),
        }));

        (status, body).into_response()
    }
}
