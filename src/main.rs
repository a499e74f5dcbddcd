use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use scriptcast::application::ports::{BlobStore, LlmClient, ScriptRepository};
use scriptcast::application::services::{
    ActionLineClassifier, AuditionService, CharacterCasting, ScriptPipeline,
    ScriptProcessingWorker, ScriptSubmissionService, VoiceCatalog,
};
use scriptcast::infrastructure::llm::{LlmCharacterClassifier, OpenAiClient, RetryingLlmClient};
use scriptcast::infrastructure::observability::{TracingConfig, init_tracing};
use scriptcast::infrastructure::persistence::{
    InMemoryScriptRepository, PgScriptRepository, create_pool,
};
use scriptcast::infrastructure::speech::HttpSpeechSynthesizer;
use scriptcast::infrastructure::storage::LocalBlobStore;
use scriptcast::infrastructure::text_processing::{CompositeFileLoader, LineSegmenter};
use scriptcast::presentation::{AppState, Environment, Settings, create_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let environment = Environment::from_env().map_err(anyhow::Error::msg)?;
    let settings = Settings::load(environment).context("failed to load settings")?;

    let mut tracing_config = TracingConfig::new(environment.as_str(), &settings.logging.format);
    if let Some(filter) = &settings.logging.filter {
        tracing_config = tracing_config.with_filter(filter.clone());
    }
    init_tracing(&tracing_config);

    let repository: Arc<dyn ScriptRepository> = match &settings.database.url {
        Some(url) => {
            let pool = create_pool(url, settings.database.max_connections).await?;
            Arc::new(PgScriptRepository::new(pool))
        }
        None => {
            tracing::warn!("No database configured, script state is kept in memory");
            Arc::new(InMemoryScriptRepository::new())
        }
    };

    let blob_store: Arc<dyn BlobStore> = Arc::new(LocalBlobStore::new(
        settings.storage.base_path.clone(),
        settings.storage.public_url.clone(),
    )?);

    let llm_client: Arc<dyn LlmClient> = Arc::new(RetryingLlmClient::new(
        Arc::new(OpenAiClient::new(
            settings.llm.base_url.clone(),
            settings.llm.api_key.clone(),
            settings.llm.model.clone(),
            settings.llm.max_tokens as usize,
            settings.llm.temperature,
        )),
        settings.processing.retry_policy(),
    ));
    let character_classifier = Arc::new(LlmCharacterClassifier::new(Arc::clone(&llm_client)));

    let catalog = VoiceCatalog::new(
        settings.voices.male.clone(),
        settings.voices.female.clone(),
    )?;
    let pipeline = Arc::new(ScriptPipeline::new(
        Arc::new(LineSegmenter::new(settings.processing.max_chunk_size)?),
        ActionLineClassifier::new(Arc::clone(&llm_client)),
        CharacterCasting::new(
            character_classifier.clone(),
            character_classifier,
            catalog,
        ),
        settings.processing.lines_per_minute,
    ));

    let (sender, receiver) = mpsc::channel(settings.processing.queue_capacity.max(1));
    let worker = ScriptProcessingWorker::new(
        receiver,
        Arc::new(CompositeFileLoader::with_defaults()),
        Arc::clone(&blob_store),
        Arc::clone(&repository),
        pipeline,
    );
    tokio::spawn(worker.run());

    let synthesizer = Arc::new(HttpSpeechSynthesizer::new(
        settings.speech.base_url.clone(),
        settings.speech.api_key.clone(),
        settings.speech.model.clone(),
    ));
    let audition_service = Arc::new(AuditionService::new(
        synthesizer,
        Arc::clone(&blob_store),
        settings.speech.retry_policy(),
        settings.speech.concurrency,
    ));

    let state = AppState {
        submission_service: Arc::new(ScriptSubmissionService::new(
            Arc::clone(&repository),
            blob_store,
            sender,
        )),
        audition_service,
        repository,
        max_upload_bytes: settings.server.max_upload_bytes(),
        media_root: Some(settings.storage.base_path.clone()),
    };

    let addr: SocketAddr = format!("{}:{}", settings.server.host, settings.server.port)
        .parse()
        .context("invalid server address")?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, environment = %environment, "Listening");

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutdown signal received");
}
