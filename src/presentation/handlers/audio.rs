use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use crate::domain::{AudioFile, ResourceLocator};
use crate::presentation::handlers::error::error_response;
use crate::presentation::state::AppState;

#[derive(Deserialize)]
pub struct CreateAudioRequest {
    pub resource_locator: String,
}

#[derive(Serialize)]
pub struct AudioResponse {
    pub id: String,
    pub resource_locator: String,
    pub created_at: String,
}

pub async fn create_audio_handler(
    State(state): State<AppState>,
    Json(body): Json<CreateAudioRequest>,
) -> Response {
    let locator = body.resource_locator.trim();
    if locator.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "resource_locator must not be empty");
    }

    let audio = AudioFile::new(ResourceLocator::new(locator));

    match state.audio_repository.create(&audio).await {
        Ok(()) => {
            tracing::info!(audio_id = %audio.id.as_uuid(), "Audio file registered");
            (
                StatusCode::CREATED,
                Json(AudioResponse {
                    id: audio.id.as_uuid().to_string(),
                    resource_locator: audio.resource_locator.as_str().to_string(),
                    created_at: audio.created_at.to_rfc3339(),
                }),
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to register audio file");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}
