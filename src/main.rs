use elevenlabs_tts_proxy::controllers::tts::TtsController;
use elevenlabs_tts_proxy::domain::tts::{TtsService, VoiceCatalog};
use elevenlabs_tts_proxy::infrastructure::config::{Config, LogFormat};
use elevenlabs_tts_proxy::infrastructure::http::start_http_server;
use elevenlabs_tts_proxy::infrastructure::repositories::ElevenLabsTtsRepository;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    init_logging(&config);

    tracing::info!(
        "Starting ElevenLabs TTS proxy on {}:{}",
        config.host,
        config.port
    );
    tracing::info!(
        base_url = %config.elevenlabs_base_url,
        stream_framing = ?config.stream_framing,
        max_text_chars = config.max_text_chars,
        "ElevenLabs API key configured"
    );

    let config = Arc::new(config);

    // === DEPENDENCY INJECTION SETUP ===
    // 1. Instantiate repositories
    tracing::info!("Instantiating repositories...");
    let tts_repo = Arc::new(ElevenLabsTtsRepository::from_config(&config)?);
    let catalog = Arc::new(VoiceCatalog::builtin());

    // 2. Instantiate services (inject repositories and catalogs)
    tracing::info!("Instantiating services...");
    let tts_service = Arc::new(TtsService::new(
        tts_repo,
        catalog,
        config.max_text_chars,
    ));

    // 3. Instantiate controllers (inject services)
    tracing::info!("Instantiating controllers...");
    let tts_controller = Arc::new(TtsController::new(tts_service, config.stream_framing));

    // Start HTTP server with all routes
    start_http_server(config, tts_controller).await?;

    Ok(())
}

fn init_logging(config: &Config) {
    if config.log_format == LogFormat::Json {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "elevenlabs_tts_proxy=debug,tower_http=debug".into()),
            )
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "elevenlabs_tts_proxy=debug,tower_http=debug".into()),
            )
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}
