use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

pub const SERVICE_NAME: &str = "elevenlabs-tts-proxy";

/// Liveness probe. The credential is checked at startup, so a running process
/// always has one.
pub async fn health() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({
            "status": "ok",
            "service": SERVICE_NAME,
            "version": env!("CARGO_PKG_VERSION"),
            "api_key_configured": true
        })),
    )
}
