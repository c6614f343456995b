use axum::{
    extract::Request,
    http::{HeaderName, Method},
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::controllers::{
    health,
    tts::{TtsController, X_CHARACTER_COUNT, X_MODEL_ID, X_VOICE_ID},
};
use crate::infrastructure::config::Config;

pub mod request_id;

pub use request_id::{request_id_middleware, RequestId, X_REQUEST_ID};

/// Build the application router with every route and middleware layer
pub fn create_router(tts_controller: Arc<TtsController>) -> Router {
    // Browser callers need to read the synthesis metadata headers
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
        .expose_headers([
            HeaderName::from_static(X_VOICE_ID),
            HeaderName::from_static(X_MODEL_ID),
            HeaderName::from_static(X_CHARACTER_COUNT),
            HeaderName::from_static(X_REQUEST_ID),
        ]);

    let tts_routes = Router::new()
        .route("/languages", get(TtsController::list_languages))
        .route("/voices", get(TtsController::list_voices))
        .route("/synthesize", post(TtsController::synthesize))
        .route("/synthesize/stream", post(TtsController::synthesize_stream))
        .with_state(tts_controller);

    Router::new()
        .route("/health", get(health::health))
        .merge(tts_routes)
        .layer(TraceLayer::new_for_http().make_span_with(request_span))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(cors)
}

/// Span for one request, carrying the id assigned by `request_id_middleware`
fn request_span(request: &Request) -> tracing::Span {
    let request_id = request
        .extensions()
        .get::<RequestId>()
        .map(|id| id.0.as_str())
        .unwrap_or("-");

    tracing::debug_span!(
        "request",
        method = %request.method(),
        uri = %request.uri(),
        request_id = %request_id,
    )
}

/// Start the HTTP server with all routes configured
pub async fn start_http_server(
    config: Arc<Config>,
    tts_controller: Arc<TtsController>,
) -> anyhow::Result<()> {
    let app = create_router(tts_controller);

    let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;

    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Received shutdown signal");
}
