use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use crate::application::services::SubmitError;
use crate::domain::{ArtifactSummary, AudioId, Job, JobId, JobMode, RecognitionHints};
use crate::presentation::handlers::error::{error_response, parse_id};
use crate::presentation::state::AppState;

#[derive(Deserialize)]
pub struct CreateTranscriptionRequest {
    pub audio_id: String,
    pub mode: Option<String>,
    pub language_hint: Option<String>,
    pub model_name: Option<String>,
    pub temperature: Option<f32>,
    pub beam_size: Option<u32>,
}

const DEFAULT_LIST_LIMIT: usize = 50;
const MAX_LIST_LIMIT: usize = 200;

#[derive(Debug, Deserialize)]
pub struct ListTranscriptionsQuery {
    pub audio_id: String,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

#[derive(Serialize)]
pub struct TranscriptionResponse {
    pub id: String,
    pub audio_id: String,
    pub mode: &'static str,
    pub status: &'static str,
    pub language_hint: Option<String>,
    pub model_name: Option<String>,
    pub temperature: Option<f32>,
    pub beam_size: Option<u32>,
    pub language_detected: Option<String>,
    pub confidence: Option<f64>,
    pub text_full: Option<String>,
    pub artifacts: Option<ArtifactSummary>,
    pub started_at: String,
    pub finished_at: Option<String>,
}

impl From<Job> for TranscriptionResponse {
    fn from(job: Job) -> Self {
        Self {
            id: job.id.as_uuid().to_string(),
            audio_id: job.audio_id.as_uuid().to_string(),
            mode: job.mode.as_str(),
            status: job.status.as_str(),
            language_hint: job.hints.language,
            model_name: job.hints.model_name,
            temperature: job.hints.temperature,
            beam_size: job.hints.beam_size,
            language_detected: job.language_detected,
            confidence: job.confidence,
            text_full: job.text_full,
            artifacts: job.artifacts,
            started_at: job.started_at.to_rfc3339(),
            finished_at: job.finished_at.map(|t| t.to_rfc3339()),
        }
    }
}

#[tracing::instrument(skip(state, body), fields(audio_id = %body.audio_id))]
pub async fn create_transcription_handler(
    State(state): State<AppState>,
    Json(body): Json<CreateTranscriptionRequest>,
) -> Response {
    let audio_id = match parse_id(&body.audio_id, "audio") {
        Ok(id) => AudioId::from_uuid(id),
        Err(response) => return response,
    };

    let mode = match body.mode.as_deref() {
        None => JobMode::Batch,
        Some(raw) => match JobMode::parse(raw) {
            Some(mode) => mode,
            None => {
                return error_response(
                    StatusCode::BAD_REQUEST,
                    format!("Unsupported mode: {}", raw),
                );
            }
        },
    };

    let hints = RecognitionHints {
        language: body.language_hint,
        model_name: body.model_name,
        temperature: body.temperature,
        beam_size: body.beam_size,
    };

    match state
        .transcription_service
        .submit(audio_id, mode, hints)
        .await
    {
        Ok(job) => (StatusCode::ACCEPTED, Json(TranscriptionResponse::from(job))).into_response(),
        Err(SubmitError::AudioNotFound(_)) => error_response(
            StatusCode::NOT_FOUND,
            format!("Audio file not found: {}", body.audio_id),
        ),
        Err(e) => {
            tracing::error!(error = %e, "Failed to submit transcription job");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to submit job: {}", e),
            )
        }
    }
}

#[tracing::instrument(skip(state))]
pub async fn get_transcription_handler(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Response {
    let uuid = match parse_id(&job_id, "transcription") {
        Ok(u) => u,
        Err(response) => return response,
    };

    match state.job_repository.get_by_id(JobId::from_uuid(uuid)).await {
        Ok(Some(job)) => (StatusCode::OK, Json(TranscriptionResponse::from(job))).into_response(),
        Ok(None) => error_response(
            StatusCode::NOT_FOUND,
            format!("Transcription not found: {}", job_id),
        ),
        Err(e) => {
            tracing::error!(error = %e, "Failed to fetch transcription");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to fetch transcription: {}", e),
            )
        }
    }
}

/// Jobs for one audio file, most recently started first.
#[tracing::instrument(skip(state))]
pub async fn list_transcriptions_handler(
    State(state): State<AppState>,
    Query(query): Query<ListTranscriptionsQuery>,
) -> Response {
    let audio_id = match parse_id(&query.audio_id, "audio") {
        Ok(id) => AudioId::from_uuid(id),
        Err(response) => return response,
    };

    let limit = query.limit.unwrap_or(DEFAULT_LIST_LIMIT);
    if !(1..=MAX_LIST_LIMIT).contains(&limit) {
        return error_response(
            StatusCode::BAD_REQUEST,
            format!("limit must be between 1 and {}", MAX_LIST_LIMIT),
        );
    }
    let offset = query.offset.unwrap_or(0);

    match state
        .job_repository
        .list_by_audio(audio_id, limit, offset)
        .await
    {
        Ok(jobs) => {
            let body: Vec<TranscriptionResponse> =
                jobs.into_iter().map(TranscriptionResponse::from).collect();
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to list transcriptions");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to list transcriptions: {}", e),
            )
        }
    }
}
