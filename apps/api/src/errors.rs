use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::llm_client::LlmError;

/// Failures of a single resume analysis.
#[derive(Debug, Error)]
pub enum AnalyzeError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("failed to extract JSON from model output")]
    Extraction,

    #[error("provider error: {0}")]
    Provider(LlmError),

    #[error("failed to decode analysis: {0}")]
    Deserialization(#[from] serde_json::Error),
}

impl From<LlmError> for AnalyzeError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::Config(msg) => AnalyzeError::Config(msg),
            other => AnalyzeError::Provider(other),
        }
    }
}

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    #[error(transparent)]
    Analyze(#[from] AnalyzeError),
}

impl AppError {
    /// Maps an extractor or body-read failure, keeping 413 for oversized bodies.
    pub fn from_rejection(status: StatusCode, message: String) -> Self {
        if status == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge(message)
        } else {
            AppError::Validation(message)
        }
    }
}

impl AnalyzeError {
    fn code(&self) -> &'static str {
        match self {
            AnalyzeError::Config(_) => "CONFIG_ERROR",
            AnalyzeError::Extraction => "EXTRACTION_ERROR",
            AnalyzeError::Provider(_) => "LLM_ERROR",
            AnalyzeError::Deserialization(_) => "DESERIALIZATION_ERROR",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::PayloadTooLarge(msg) => (
                StatusCode::PAYLOAD_TOO_LARGE,
                "PAYLOAD_TOO_LARGE",
                msg.clone(),
            ),
            AppError::Analyze(e) => {
                tracing::error!("Analysis failed: {e}");
                (StatusCode::INTERNAL_SERVER_ERROR, e.code(), e.to_string())
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
