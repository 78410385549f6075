// Caller-facing commands
// Owns the request preconditions (allowed file types, minimum text length, body size)
// before handing text to the scoring core.

use crate::models::{AnalyzeRequest, Document, Report, ReportKind};
use crate::services::config_store::{ReportConfig, UploadConfig};
use crate::services::detection::{analyze_document, SubmissionStamper};
use crate::services::extraction::{extract_text, file_kind_for, secure_filename};
use crate::services::report_render::{render_report, store_rendered};
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Only .txt, .pdf, .docx supported.")]
    UnsupportedFileType,
    #[error("Please provide at least {0} characters.")]
    TextTooShort(usize),
    #[error("Upload exceeds the {0} byte limit.")]
    PayloadTooLarge(usize),
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    #[error("Failed to store report: {0}")]
    Io(#[from] std::io::Error),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> u16 {
        match self {
            Self::UnsupportedFileType | Self::TextTooShort(_) | Self::InvalidRequest(_) => 400,
            Self::PayloadTooLarge(_) => 413,
            Self::Io(_) | Self::Internal(_) => 500,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ExtractedUpload {
    pub filename: String,
    pub text: String,
}

#[derive(Debug, Clone)]
pub struct RenderedReport {
    pub download_name: String,
    pub body: String,
}

fn ensure_min_length(text: &str, min_chars: usize) -> Result<(), ApiError> {
    if text.trim().chars().count() < min_chars {
        return Err(ApiError::TextTooShort(min_chars));
    }
    Ok(())
}

/// Validate an upload and pull its text out; unreadable content becomes "".
pub fn preprocess_file(
    file_name: &str,
    bytes: &[u8],
    upload: &UploadConfig,
) -> Result<ExtractedUpload, ApiError> {
    if bytes.len() > upload.max_content_bytes {
        return Err(ApiError::PayloadTooLarge(upload.max_content_bytes));
    }
    if file_kind_for(file_name, &upload.allowed_extensions).is_none() {
        warn!(file_name = %file_name, "upload.rejected_extension");
        return Err(ApiError::UnsupportedFileType);
    }

    let filename = secure_filename(file_name);
    let kind = file_kind_for(&filename, &upload.allowed_extensions).ok_or(ApiError::UnsupportedFileType)?;
    let text = extract_text(kind, bytes);
    info!(filename = %filename, bytes = bytes.len(), chars = text.chars().count(), "upload.extracted");

    Ok(ExtractedUpload { filename, text })
}

/// Analyze pasted text.
pub fn analyze_text_command<S>(
    request: &AnalyzeRequest,
    upload: &UploadConfig,
    stamper: &S,
) -> Result<Report, ApiError>
where
    S: SubmissionStamper + ?Sized,
{
    ensure_min_length(&request.text, upload.min_text_chars)?;
    Ok(analyze_document(&Document::pasted(request.text.as_str()), stamper))
}

/// Analyze an uploaded file.
pub fn analyze_upload<S>(
    file_name: &str,
    bytes: &[u8],
    upload: &UploadConfig,
    stamper: &S,
) -> Result<Report, ApiError>
where
    S: SubmissionStamper + ?Sized,
{
    let extracted = preprocess_file(file_name, bytes, upload)?;
    ensure_min_length(&extracted.text, upload.min_text_chars)?;
    Ok(analyze_document(&Document::new(extracted.text, extracted.filename), stamper))
}

/// Render a report variant, storing a copy when an output directory is configured.
pub fn render_report_command(
    kind: ReportKind,
    report: &Report,
    reports: &ReportConfig,
) -> Result<RenderedReport, ApiError> {
    let body = render_report(kind, report);
    if let Some(dir) = &reports.output_dir {
        store_rendered(dir, kind, &report.submission_id, &body)?;
    }
    let safe_id: String = report
        .submission_id
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect();
    let id = if safe_id.is_empty() { "report" } else { safe_id.as_str() };
    Ok(RenderedReport {
        download_name: kind.download_name(id),
        body,
    })
}
