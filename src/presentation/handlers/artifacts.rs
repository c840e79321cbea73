use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::domain::{Artifact, ArtifactKind, JobId};
use crate::presentation::handlers::error::{error_response, parse_id};
use crate::presentation::state::AppState;

#[derive(Serialize)]
pub struct ArtifactResponse {
    pub kind: &'static str,
    pub content_type: &'static str,
    pub location: String,
    pub created_at: String,
}

impl From<Artifact> for ArtifactResponse {
    fn from(a: Artifact) -> Self {
        Self {
            kind: a.kind.as_str(),
            content_type: a.kind.content_type(),
            location: a.location,
            created_at: a.created_at.to_rfc3339(),
        }
    }
}

#[tracing::instrument(skip(state))]
pub async fn list_artifacts_handler(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Response {
    let job_id = match parse_id(&job_id, "transcription") {
        Ok(u) => JobId::from_uuid(u),
        Err(response) => return response,
    };

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

    match state.artifact_repository.list(job_id).await {
        Ok(artifacts) => {
            let body: Vec<ArtifactResponse> =
                artifacts.into_iter().map(ArtifactResponse::from).collect();
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to list artifacts");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

#[tracing::instrument(skip(state))]
pub async fn delete_artifact_handler(
    State(state): State<AppState>,
    Path((job_id, kind)): Path<(String, String)>,
) -> Response {
    let job_id = match parse_id(&job_id, "transcription") {
        Ok(u) => JobId::from_uuid(u),
        Err(response) => return response,
    };
    let kind = match kind.parse::<ArtifactKind>() {
        Ok(kind) => kind,
        Err(message) => return error_response(StatusCode::BAD_REQUEST, message),
    };

    match state.artifact_repository.delete(job_id, kind).await {
        Ok(true) => StatusCode::NO_CONTENT.into_response(),
        Ok(false) => error_response(
            StatusCode::NOT_FOUND,
            format!("No {} artifact for transcription {}", kind, job_id.as_uuid()),
        ),
        Err(e) => {
            tracing::error!(error = %e, "Failed to delete artifact");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}
