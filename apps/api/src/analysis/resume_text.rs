//! Turns an uploaded resume file into plain text for the prompt.

use bytes::Bytes;
use docx_rs::{read_docx, DocumentChild, ParagraphChild, RunChild};
use tracing::debug;

use crate::errors::AppError;

/// Upload limit for the `/analyze` multipart body.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

const DOCX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ResumeFormat {
    Pdf,
    Docx,
    /// Legacy binary Word; not readable.
    Doc,
    Text,
}

impl ResumeFormat {
    fn detect(file_name: Option<&str>, content_type: Option<&str>) -> Self {
        let name = file_name.map(str::to_ascii_lowercase).unwrap_or_default();
        let content_type = content_type.map(str::to_ascii_lowercase).unwrap_or_default();

        if name.ends_with(".pdf") || content_type == "application/pdf" {
            ResumeFormat::Pdf
        } else if name.ends_with(".docx") || content_type == DOCX_CONTENT_TYPE {
            ResumeFormat::Docx
        } else if name.ends_with(".doc") || content_type == "application/msword" {
            ResumeFormat::Doc
        } else {
            ResumeFormat::Text
        }
    }
}

/// Extracts text from a PDF or DOCX upload, or decodes a UTF-8 text file.
pub async fn read_resume(
    file_name: Option<&str>,
    content_type: Option<&str>,
    data: Bytes,
) -> Result<String, AppError> {
    if data.is_empty() {
        return Err(AppError::Validation("resume file is empty".to_string()));
    }

    // pdf-extract and docx-rs are CPU-bound and synchronous
    let text = match ResumeFormat::detect(file_name, content_type) {
        ResumeFormat::Pdf => {
            tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&data))
                .await
                .map_err(|e| AppError::Validation(format!("failed to read resume PDF: {e}")))?
                .map_err(|e| AppError::Validation(format!("failed to read resume PDF: {e}")))?
        }
        ResumeFormat::Docx => tokio::task::spawn_blocking(move || docx_text(&data))
            .await
            .map_err(|e| AppError::Validation(format!("failed to read resume DOCX: {e}")))??,
        ResumeFormat::Doc => {
            return Err(AppError::Validation(
                "legacy .doc resumes are not supported; upload PDF, DOCX or text".to_string(),
            ))
        }
        ResumeFormat::Text => String::from_utf8(data.to_vec()).map_err(|_| {
            AppError::Validation("resume file must be PDF, DOCX or UTF-8 text".to_string())
        })?,
    };

    debug!(
        "Read resume {:?}: {} chars",
        file_name.unwrap_or("<field>"),
        text.chars().count()
    );
    Ok(text)
}

/// Concatenates run text paragraph by paragraph, one line per paragraph.
fn docx_text(data: &[u8]) -> Result<String, AppError> {
    let docx = read_docx(data)
        .map_err(|e| AppError::Validation(format!("failed to read resume DOCX: {e}")))?;

    let mut text = String::new();
    for child in docx.document.children {
        if let DocumentChild::Paragraph(paragraph) = child {
            for paragraph_child in &paragraph.children {
                if let ParagraphChild::Run(run) = paragraph_child {
                    for run_child in &run.children {
                        if let RunChild::Text(t) = run_child {
                            text.push_str(&t.text);
                        }
                    }
                }
            }
            text.push('\n');
        }
    }
    Ok(text)
}
