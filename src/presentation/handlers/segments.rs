use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use crate::domain::{JobId, Segment};
use crate::presentation::handlers::error::{error_response, parse_id};
use crate::presentation::state::AppState;

const DEFAULT_LIMIT: usize = 1000;
const MAX_LIMIT: usize = 5000;

#[derive(Debug, Deserialize)]
pub struct SegmentQuery {
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

#[derive(Serialize)]
pub struct SegmentResponse {
    pub start_ms: i64,
    pub end_ms: i64,
    pub text: String,
    pub speaker_label: Option<String>,
    pub confidence: Option<f64>,
}

impl From<Segment> for SegmentResponse {
    fn from(s: Segment) -> Self {
        Self {
            start_ms: s.start_ms,
            end_ms: s.end_ms,
            text: s.text,
            speaker_label: s.speaker_label,
            confidence: s.confidence,
        }
    }
}

#[derive(Serialize)]
pub struct SegmentListResponse {
    pub transcription_id: String,
    pub segments: Vec<SegmentResponse>,
}

#[derive(Serialize)]
pub struct DeleteSegmentsResponse {
    pub transcription_id: String,
    pub deleted: u64,
}

#[tracing::instrument(skip(state))]
pub async fn list_segments_handler(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
    Query(query): Query<SegmentQuery>,
) -> Response {
    let job_id = match parse_id(&job_id, "transcription") {
        Ok(u) => JobId::from_uuid(u),
        Err(response) => return response,
    };

    let limit = query.limit.unwrap_or(DEFAULT_LIMIT);
    if !(1..=MAX_LIMIT).contains(&limit) {
        return error_response(
            StatusCode::BAD_REQUEST,
            format!("limit must be between 1 and {}", MAX_LIMIT),
        );
    }
    let offset = query.offset.unwrap_or(0);

    match state.job_repository.get_by_id(job_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return error_response(
                StatusCode::NOT_FOUND,
                format!("Transcription not found: {}", job_id.as_uuid()),
            );
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to fetch transcription");
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string());
        }
    }

    match state.segment_repository.list(job_id, limit, offset).await {
        Ok(segments) => (
            StatusCode::OK,
            Json(SegmentListResponse {
                transcription_id: job_id.as_uuid().to_string(),
                segments: segments.into_iter().map(SegmentResponse::from).collect(),
            }),
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to list segments");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

/// Clears a job's segments so it can be recognized again without duplicates.
#[tracing::instrument(skip(state))]
pub async fn delete_segments_handler(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Response {
    let job_id = match parse_id(&job_id, "transcription") {
        Ok(u) => JobId::from_uuid(u),
        Err(response) => return response,
    };

    match state.segment_repository.delete_by_job(job_id).await {
        Ok(deleted) => {
            tracing::info!(deleted, "Segments deleted");
            (
                StatusCode::OK,
                Json(DeleteSegmentsResponse {
                    transcription_id: job_id.as_uuid().to_string(),
                    deleted,
                }),
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to delete segments");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}
