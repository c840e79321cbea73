use axum::Router;
use axum::middleware;
use axum::routing::{delete, get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::infrastructure::observability::request_id_middleware;
use crate::presentation::handlers::{
    create_audio_handler, create_transcription_handler, delete_artifact_handler,
    delete_segments_handler, get_transcription_handler, health_handler, list_artifacts_handler,
    list_segments_handler, list_transcriptions_handler,
};
use crate::presentation::state::AppState;

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    Router::new()
        .route("/health", get(health_handler))
        .route("/api/v1/audio", post(create_audio_handler))
        .route(
            "/api/v1/transcriptions",
            post(create_transcription_handler).get(list_transcriptions_handler),
        )
        .route(
            "/api/v1/transcriptions/{job_id}",
            get(get_transcription_handler),
        )
        .route(
            "/api/v1/transcriptions/{job_id}/segments",
            get(list_segments_handler).delete(delete_segments_handler),
        )
        .route(
            "/api/v1/transcriptions/{job_id}/artifacts",
            get(list_artifacts_handler),
        )
        .route(
            "/api/v1/transcriptions/{job_id}/artifacts/{kind}",
            delete(delete_artifact_handler),
        )
        .layer(middleware::from_fn(request_id_middleware))
        .layer(trace_layer)
        .layer(cors)
        .with_state(state)
}
