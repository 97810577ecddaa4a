use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

use crate::roadmap::models::RoadmapSection;

/// Failures raised by the Roadmap Store and the model-level mutation rules.
#[derive(Debug, Error)]
pub enum RoadmapError {
    #[error("A roadmap already exists for user {0}")]
    AlreadyExists(Uuid),

    #[error("No roadmap found for user {0}")]
    NotFound(Uuid),

    #[error("Unknown goal category '{0}'")]
    InvalidCategory(String),

    #[error("Index {index} is out of range for {category} ({len} entries)")]
    InvalidIndex {
        category: RoadmapSection,
        index: usize,
        len: usize,
    },

    #[error("Index '{raw}' for {category} is not a non-negative integer")]
    UnparsableIndex { category: RoadmapSection, raw: String },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Stored roadmap is malformed: {0}")]
    Malformed(String),
}

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Roadmap(#[from] RoadmapError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("LLM error: {0}")]
    Llm(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Roadmap(err) => roadmap_error_parts(err),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "Authentication required".to_string(),
            ),
            AppError::Llm(msg) => {
                tracing::error!("LLM error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "LLM_ERROR",
                    "An AI processing error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

fn roadmap_error_parts(err: &RoadmapError) -> (StatusCode, &'static str, String) {
    match err {
        RoadmapError::AlreadyExists(_) => (StatusCode::CONFLICT, "ALREADY_EXISTS", err.to_string()),
        RoadmapError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND", err.to_string()),
        RoadmapError::InvalidCategory(_) => {
            (StatusCode::BAD_REQUEST, "INVALID_CATEGORY", err.to_string())
        }
        RoadmapError::InvalidIndex { .. } | RoadmapError::UnparsableIndex { .. } => {
            (StatusCode::BAD_REQUEST, "INVALID_INDEX", err.to_string())
        }
        RoadmapError::Database(e) => {
            tracing::error!("Database error: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "DATABASE_ERROR",
                "A database error occurred".to_string(),
            )
        }
        RoadmapError::Malformed(msg) => {
            tracing::error!("Malformed roadmap document: {msg}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal server error occurred".to_string(),
            )
        }
    }
}
