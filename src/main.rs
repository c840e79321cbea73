use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use transcriptor::application::ports::{
    ArtifactRepository, AudioRepository, JobRepository, RecognitionEngine, SegmentRepository,
};
use transcriptor::application::services::{
    ArtifactPublisher, PipelineConfig, RecognitionAdapter, TranscriptionPipeline,
    TranscriptionService, TranscriptionWorker,
};
use transcriptor::infrastructure::audio::{EngineSpec, RecognitionEngineFactory};
use transcriptor::infrastructure::observability::{TracingConfig, init_tracing};
use transcriptor::infrastructure::persistence::{
    InMemoryArtifactRepository, InMemoryAudioRepository, InMemoryJobRepository,
    InMemorySegmentRepository, PgArtifactRepository, PgAudioRepository, PgJobRepository,
    PgSegmentRepository, create_pool,
};
use transcriptor::infrastructure::resources::TempFileAcquirer;
use transcriptor::infrastructure::storage::ArtifactStorageFactory;
use transcriptor::presentation::{AppState, Environment, Settings, create_router};

struct Repositories {
    jobs: Arc<dyn JobRepository>,
    audio: Arc<dyn AudioRepository>,
    segments: Arc<dyn SegmentRepository>,
    artifacts: Arc<dyn ArtifactRepository>,
}

async fn build_repositories(settings: &Settings) -> anyhow::Result<Repositories> {
    if settings.database.url.trim().is_empty() {
        tracing::warn!("No database URL configured, using in-memory repositories");
        return Ok(Repositories {
            jobs: Arc::new(InMemoryJobRepository::new()),
            audio: Arc::new(InMemoryAudioRepository::new()),
            segments: Arc::new(InMemorySegmentRepository::new()),
            artifacts: Arc::new(InMemoryArtifactRepository::new()),
        });
    }

    let pool = create_pool(&settings.database.url, settings.database.max_connections).await?;

    tracing::info!("Running database migrations...");
    sqlx::migrate!()
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;
    tracing::info!("Migrations complete.");

    Ok(Repositories {
        jobs: Arc::new(PgJobRepository::new(pool.clone())),
        audio: Arc::new(PgAudioRepository::new(pool.clone())),
        segments: Arc::new(PgSegmentRepository::new(pool.clone())),
        artifacts: Arc::new(PgArtifactRepository::new(pool)),
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let environment = Environment::from_env().map_err(anyhow::Error::msg)?;
    let settings = Settings::load(environment).context("Failed to load settings")?;

    init_tracing(TracingConfig {
        environment: environment.to_string(),
        level: settings.logging.level.clone(),
        json_format: settings.logging.enable_json,
    });

    let repos = build_repositories(&settings).await?;

    let recognition = &settings.recognition;
    let engine = if recognition.disabled {
        tracing::warn!("Speech recognition disabled; jobs complete with empty transcripts");
        RecognitionEngineFactory::disabled()
    } else {
        RecognitionEngineFactory::create(&EngineSpec {
            provider: recognition.provider,
            model: recognition.model_name(),
            precision: recognition.precision.clone(),
            api_key: recognition.api_key.clone(),
            base_url: recognition.base_url.clone(),
            azure_deployment: recognition.azure_deployment.clone(),
            azure_api_version: recognition.azure_api_version.clone(),
        })
        .context("Failed to create recognition engine")?
    };
    tracing::info!(engine = engine.name(), "Recognition engine ready");

    let acquirer = Arc::new(TempFileAcquirer::new(Duration::from_secs(
        settings.resources.fetch_timeout_secs,
    ))?);

    let pipeline_config = PipelineConfig {
        recognition_disabled: recognition.disabled,
        engine_name: recognition.model_name(),
        precision: recognition.precision.clone(),
        job_deadline: settings.worker.job_deadline_secs.map(Duration::from_secs),
    };

    let mut pipeline = TranscriptionPipeline::new(
        Arc::clone(&repos.jobs),
        Arc::clone(&repos.audio),
        Arc::clone(&repos.segments),
        acquirer,
        RecognitionAdapter::new(engine),
        pipeline_config,
    );

    if settings.storage.enabled {
        let storage = ArtifactStorageFactory::create(&settings.storage)
            .context("Failed to create artifact storage")?;
        pipeline = pipeline.with_publisher(ArtifactPublisher::new(
            storage,
            Arc::clone(&repos.artifacts),
        ));
        tracing::info!(provider = ?settings.storage.provider, "Artifact publishing enabled");
    }

    let (sender, receiver) = mpsc::channel(settings.worker.queue_capacity.max(1));
    let worker = TranscriptionWorker::new(
        receiver,
        Arc::new(pipeline),
        settings.worker.max_concurrent_jobs,
    );
    tokio::spawn(worker.run());

    let transcription_service = Arc::new(TranscriptionService::new(
        Arc::clone(&repos.jobs),
        Arc::clone(&repos.audio),
        sender,
    ));

    let state = AppState {
        transcription_service,
        job_repository: repos.jobs,
        audio_repository: repos.audio,
        segment_repository: repos.segments,
        artifact_repository: repos.artifacts,
    };

    let router = create_router(state);

    let addr: SocketAddr = format!("{}:{}", settings.server.host, settings.server.port)
        .parse()
        .context("Invalid server address")?;
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
