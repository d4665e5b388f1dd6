//! Document upload: summaries and/or quiz questions from a lecture file.

use std::sync::Arc;

use axum::extract::multipart::MultipartError;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::Json;
use lectern_core::{AnalysisKind, RawDocument, RequestError};
use lectern_study::SlidesResponse;
use tracing::{info, warn};

use super::ErrorResponse;
use crate::state::AppState;

type ApiError = (StatusCode, Json<ErrorResponse>);

/// Analyze an uploaded document
///
/// Multipart fields: `file` (required) and `type` (`summary`, `quiz` or
/// `both`; default `both`). Extraction and generation problems degrade to
/// fallback content with `warnings`; only request-shape problems are errors.
#[utoipa::path(
    post,
    path = "/api/slides",
    tag = "Study",
    request_body(content_type = "multipart/form-data", description = "Fields: file, type"),
    responses(
        (status = 200, description = "Summaries and/or quiz questions", body = SlidesResponse),
        (status = 400, description = "Missing file or unknown type", body = ErrorResponse),
        (status = 413, description = "Upload exceeds MAX_UPLOAD_MB", body = ErrorResponse)
    )
)]
pub async fn slides(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<SlidesResponse>, ApiError> {
    let mut document: Option<RawDocument> = None;
    let mut analysis_type: Option<String> = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("file") => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let media_type = field.content_type().unwrap_or_default().to_string();
                let bytes = field.bytes().await.map_err(multipart_error)?;
                if filename.is_empty() && bytes.is_empty() {
                    continue;
                }
                document = Some(RawDocument::new(bytes, media_type, filename));
            }
            Some("type") => {
                analysis_type = Some(field.text().await.map_err(multipart_error)?);
            }
            other => {
                warn!(field = ?other, "Ignoring unexpected multipart field");
            }
        }
    }

    let raw = document.ok_or_else(|| bad_request(RequestError::MissingFile))?;
    let kind: AnalysisKind = analysis_type
        .as_deref()
        .unwrap_or_default()
        .parse()
        .map_err(bad_request)?;

    info!(
        filename = %raw.filename,
        media_type = %raw.declared_media_type,
        size = raw.size_bytes,
        kind = ?kind,
        "Document uploaded"
    );
    Ok(Json(state.pipeline.analyze(raw, kind).await))
}

fn bad_request(error: RequestError) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: error.to_string(),
        }),
    )
}

fn multipart_error(error: MultipartError) -> ApiError {
    warn!(error = %error, "Multipart read failed");
    let status = error.status();
    let message = if status == StatusCode::PAYLOAD_TOO_LARGE {
        error.body_text()
    } else {
        RequestError::MalformedBody(error.body_text()).to_string()
    };
    (status, Json(ErrorResponse { error: message }))
}
