//! Axum route handlers for the Analysis API.

use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Multipart, Request, State},
    http::header::CONTENT_TYPE,
    Json,
};
use tracing::debug;

use crate::analysis::models::{AnalyzeRequest, AnalyzeResponse};
use crate::analysis::resume_text::read_resume;
use crate::errors::AppError;
use crate::state::AppState;

/// `/analyze` body: either JSON `{resume, job_description}` or a multipart
/// form with a `resume` file (or text) field and a `job_description` field.
///
/// Anything that is not multipart is decoded as JSON whatever its
/// `Content-Type` says.
pub struct AnalyzeInput(pub AnalyzeRequest);

#[async_trait]
impl<S> FromRequest<S> for AnalyzeInput
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_multipart = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_ascii_lowercase().starts_with("multipart/form-data"))
            .unwrap_or(false);

        if is_multipart {
            let multipart = Multipart::from_request(req, state)
                .await
                .map_err(|e| AppError::from_rejection(e.status(), e.body_text()))?;
            return Ok(AnalyzeInput(read_form(multipart).await?));
        }

        let body = Bytes::from_request(req, state)
            .await
            .map_err(|e| AppError::from_rejection(e.status(), e.body_text()))?;
        let request = serde_json::from_slice::<AnalyzeRequest>(&body)
            .map_err(|e| AppError::Validation(format!("Invalid JSON body: {e}")))?;
        Ok(AnalyzeInput(request))
    }
}

async fn read_form(mut multipart: Multipart) -> Result<AnalyzeRequest, AppError> {
    let mut resume = None;
    let mut job_description = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::from_rejection(e.status(), e.body_text()))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "resume" => {
                let file_name = field.file_name().map(String::from);
                let content_type = field.content_type().map(String::from);
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::from_rejection(e.status(), e.body_text()))?;
                resume =
                    Some(read_resume(file_name.as_deref(), content_type.as_deref(), data).await?);
            }
            "job_description" => {
                job_description = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| AppError::from_rejection(e.status(), e.body_text()))?,
                );
            }
            other => {
                debug!("Ignoring unexpected form field {other:?}");
            }
        }
    }

    Ok(AnalyzeRequest {
        resume: resume
            .ok_or_else(|| AppError::Validation("missing 'resume' form field".to_string()))?,
        job_description: job_description.ok_or_else(|| {
            AppError::Validation("missing 'job_description' form field".to_string())
        })?,
    })
}

/// POST /analyze
///
/// Sends the resume and job description to the configured provider and returns
/// the decoded match analysis.
pub async fn handle_analyze(
    State(state): State<AppState>,
    AnalyzeInput(request): AnalyzeInput,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let response = state.analyzer.analyze(&request).await?;
    Ok(Json(response))
}
