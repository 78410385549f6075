use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, FromRequest, Multipart, Query, Request, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tracing::{info, warn};

use crate::api::{analyze_text_command, analyze_upload, render_report_command, ApiError};
use crate::models::{AnalyzeRequest, ErrorResponse, HealthResponse, Report, ReportKind, UploadQuery};
use crate::services::config_store::AppConfig;
use crate::services::detection::SystemStamper;

#[derive(Clone)]
struct AppState {
    config: Arc<AppConfig>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            warn!(error = %self, "request.failed");
        }
        (status, Json(ErrorResponse { error: self.to_string() })).into_response()
    }
}

pub fn build_router(config: Arc<AppConfig>) -> Router {
    let body_limit = config.upload.max_content_bytes;
    Router::new()
        .route("/health", get(health))
        .route("/analyze", post(analyze))
        .route("/analyze/upload", post(analyze_file))
        .route("/report/similarity", post(similarity_report))
        .route("/report/ai", post(ai_report))
        .with_state(AppState { config })
        .layer(DefaultBodyLimit::max(body_limit))
}

pub fn serve_http_with_axum(config: AppConfig) -> Result<(), String> {
    let worker_threads = config.server.worker_threads.max(1);
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(worker_threads)
        .enable_all()
        .build()
        .map_err(|e| format!("failed to build tokio runtime: {e}"))?;

    let bind_addr = config.server.bind_addr.clone();
    let config = Arc::new(config);
    runtime.block_on(async move {
        let listener = tokio::net::TcpListener::bind(&bind_addr)
            .await
            .map_err(|e| format!("failed to bind {bind_addr}: {e}"))?;
        info!(bind_addr = %bind_addr, worker_threads, "http.listening");

        axum::serve(listener, build_router(config))
            .await
            .map_err(|e| format!("axum server failed: {e}"))
    })
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

fn is_multipart(request: &Request) -> bool {
    request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map_or(false, |ct| ct.trim_start().to_ascii_lowercase().starts_with("multipart/form-data"))
}

fn body_error(status: StatusCode, text: String, limit: usize) -> ApiError {
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge(limit)
    } else {
        ApiError::InvalidRequest(text)
    }
}

/// First `file` field of a form, with its client filename. A field without a
/// filename counts as no upload.
async fn read_file_field(mut multipart: Multipart, limit: usize) -> Result<Option<(String, Bytes)>, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| body_error(e.status(), e.body_text(), limit))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let filename = match field.file_name() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => return Ok(None),
        };
        let bytes = field
            .bytes()
            .await
            .map_err(|e| body_error(e.status(), e.body_text(), limit))?;
        return Ok(Some((filename, bytes)));
    }
    Ok(None)
}

async fn run_text(state: AppState, request: AnalyzeRequest) -> Result<Json<Report>, ApiError> {
    let config = state.config.clone();
    let report = tokio::task::spawn_blocking(move || {
        analyze_text_command(&request, &config.upload, &SystemStamper)
    })
    .await
    .map_err(|e| ApiError::Internal(e.to_string()))??;
    Ok(Json(report))
}

async fn run_upload(state: AppState, filename: String, body: Bytes) -> Result<Json<Report>, ApiError> {
    let config = state.config.clone();
    let report = tokio::task::spawn_blocking(move || {
        analyze_upload(&filename, &body, &config.upload, &SystemStamper)
    })
    .await
    .map_err(|e| ApiError::Internal(e.to_string()))??;
    Ok(Json(report))
}

/// Multipart form with a `file` field, otherwise a JSON `{text}` body.
/// A missing or malformed JSON body is treated as empty text.
async fn analyze(State(state): State<AppState>, request: Request) -> Result<Json<Report>, ApiError> {
    let limit = state.config.upload.max_content_bytes;

    if is_multipart(&request) {
        let multipart = Multipart::from_request(request, &state)
            .await
            .map_err(|e| body_error(e.status(), e.body_text(), limit))?;
        return match read_file_field(multipart, limit).await? {
            Some((filename, bytes)) => run_upload(state, filename, bytes).await,
            None => run_text(state, AnalyzeRequest::default()).await,
        };
    }

    let body = Bytes::from_request(request, &state)
        .await
        .map_err(|e| body_error(e.status(), e.body_text(), limit))?;
    let parsed: AnalyzeRequest = serde_json::from_slice(&body).unwrap_or_default();
    run_text(state, parsed).await
}

/// Raw file bytes in the body, original name in `?filename=`.
async fn analyze_file(
    State(state): State<AppState>,
    Query(query): Query<UploadQuery>,
    body: Bytes,
) -> Result<Json<Report>, ApiError> {
    let filename = query
        .filename
        .filter(|f| !f.trim().is_empty())
        .ok_or_else(|| ApiError::InvalidRequest("missing filename query parameter".to_string()))?;
    run_upload(state, filename, body).await
}

async fn similarity_report(State(state): State<AppState>, Json(report): Json<Report>) -> Result<Response, ApiError> {
    rendered_response(&state, ReportKind::Similarity, &report)
}

async fn ai_report(State(state): State<AppState>, Json(report): Json<Report>) -> Result<Response, ApiError> {
    rendered_response(&state, ReportKind::AiWriting, &report)
}

fn rendered_response(state: &AppState, kind: ReportKind, report: &Report) -> Result<Response, ApiError> {
    let rendered = render_report_command(kind, report, &state.config.reports)?;
    let disposition = format!("attachment; filename=\"{}\"", rendered.download_name);
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        rendered.body,
    )
        .into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};

    const ESSAY: &str = "Moreover, the committee reviewed every single proposal before the vote on Friday.";
    const BOUNDARY: &str = "originscan-test-boundary";

    fn state() -> AppState {
        AppState {
            config: Arc::new(AppConfig::default()),
        }
    }

    fn json_request(body: &[u8]) -> Request {
        axum::http::Request::builder()
            .method("POST")
            .uri("/analyze")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_vec()))
            .unwrap()
    }

    fn multipart_request(filename: &str, content: &str) -> Request {
        let body = format!(
            "--{b}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{f}\"\r\nContent-Type: application/octet-stream\r\n\r\n{c}\r\n--{b}--\r\n",
            b = BOUNDARY,
            f = filename,
            c = content
        );
        axum::http::Request::builder()
            .method("POST")
            .uri("/analyze")
            .header(header::CONTENT_TYPE, format!("multipart/form-data; boundary={}", BOUNDARY))
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let Json(body) = health().await;
        assert_eq!(body.status, "ok");
    }

    #[tokio::test]
    async fn test_analyze_rejects_short_text() {
        let err = analyze(State(state()), json_request(br#"{"text":"hello"}"#)).await.unwrap_err();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["error"], "Please provide at least 50 characters.");
    }

    #[tokio::test]
    async fn test_analyze_malformed_json_is_empty_text() {
        let err = analyze(State(state()), json_request(b"not json")).await.unwrap_err();
        assert!(matches!(err, ApiError::TextTooShort(_)));
    }

    #[tokio::test]
    async fn test_analyze_returns_report() {
        let body = serde_json::to_vec(&AnalyzeRequest { text: ESSAY.to_string() }).unwrap();
        let Json(report) = analyze(State(state()), json_request(&body)).await.unwrap();
        assert_eq!(report.filename, "Pasted Text");
        assert_eq!(report.submission_id.len(), 8);
        assert!(report.flagged_phrases.contains(&"moreover".to_string()));
    }

    #[tokio::test]
    async fn test_analyze_form_upload() {
        let request = multipart_request("My Essay.txt", ESSAY);
        let Json(report) = analyze(State(state()), request).await.unwrap();
        assert_eq!(report.filename, "My_Essay.txt");
        assert_eq!(report.word_count, 12);
        assert!(report.flagged_phrases.contains(&"moreover".to_string()));
    }

    #[tokio::test]
    async fn test_analyze_form_rejects_unsupported_type() {
        let err = analyze(State(state()), multipart_request("notes.md", ESSAY)).await.unwrap_err();
        assert!(matches!(err, ApiError::UnsupportedFileType));
        assert_eq!(err.status_code(), 400);
    }

    #[tokio::test]
    async fn test_analyze_form_without_filename_is_empty_text() {
        let err = analyze(State(state()), multipart_request("", ESSAY)).await.unwrap_err();
        assert!(matches!(err, ApiError::TextTooShort(50)));
    }

    #[tokio::test]
    async fn test_upload_requires_filename() {
        let query = Query(UploadQuery { filename: None });
        let err = analyze_file(State(state()), query, Bytes::new()).await.unwrap_err();
        assert_eq!(err.status_code(), 400);
    }

    #[tokio::test]
    async fn test_raw_upload_route() {
        let query = Query(UploadQuery { filename: Some("essay.txt".to_string()) });
        let Json(report) = analyze_file(State(state()), query, Bytes::from_static(ESSAY.as_bytes())).await.unwrap();
        assert_eq!(report.filename, "essay.txt");
    }

    #[tokio::test]
    async fn test_report_download_headers() {
        let body = serde_json::to_vec(&AnalyzeRequest { text: ESSAY.to_string() }).unwrap();
        let Json(report) = analyze(State(state()), json_request(&body)).await.unwrap();
        let response = similarity_report(State(state()), Json(report.clone())).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let disposition = response.headers()[header::CONTENT_DISPOSITION].to_str().unwrap().to_string();
        assert_eq!(disposition, format!("attachment; filename=\"Similarity_{}.txt\"", report.submission_id));
    }

    #[tokio::test]
    async fn test_report_download_header_with_hostile_id() {
        let body = serde_json::to_vec(&AnalyzeRequest { text: ESSAY.to_string() }).unwrap();
        let Json(mut report) = analyze(State(state()), json_request(&body)).await.unwrap();
        report.submission_id = "X1\"; filename=evil.exe".to_string();
        let response = ai_report(State(state()), Json(report)).await.unwrap();
        let disposition = response.headers()[header::CONTENT_DISPOSITION].to_str().unwrap().to_string();
        assert_eq!(disposition, "attachment; filename=\"AI_Writing_X1filenameevilexe.txt\"");
    }
}
