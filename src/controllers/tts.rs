use axum::{
    body::Body,
    extract::{rejection::JsonRejection, rejection::QueryRejection, Query, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    Json,
};
use std::sync::Arc;

use crate::{
    domain::tts::{
        model::SynthesisMetadata,
        relay::relay,
        LanguageInfo, StreamFraming, SynthesizeRequest, TtsService, TtsServiceApi, VoiceInfo,
        VoicesQuery,
    },
    error::AppResult,
};

pub const X_VOICE_ID: &str = "x-voice-id";
pub const X_MODEL_ID: &str = "x-model-id";
pub const X_CHARACTER_COUNT: &str = "x-character-count";

pub struct TtsController {
    tts_service: Arc<TtsService>,
    stream_framing: StreamFraming,
}

impl TtsController {
    pub fn new(tts_service: Arc<TtsService>, stream_framing: StreamFraming) -> Self {
        Self {
            tts_service,
            stream_framing,
        }
    }

    /// GET /languages - Supported languages
    pub async fn list_languages(
        State(controller): State<Arc<TtsController>>,
    ) -> Json<Vec<LanguageInfo>> {
        Json(controller.tts_service.list_languages())
    }

    /// GET /voices?language=L - Voice catalog, filtered by language when given
    pub async fn list_voices(
        State(controller): State<Arc<TtsController>>,
        query: Result<Query<VoicesQuery>, QueryRejection>,
    ) -> AppResult<Json<Vec<VoiceInfo>>> {
        let Query(query) = query?;
        // `?language=` with a blank value lists the whole catalog
        let language = query
            .language
            .as_deref()
            .map(str::trim)
            .filter(|code| !code.is_empty());
        let voices = controller.tts_service.list_voices(language)?;
        Ok(Json(voices))
    }

    /// POST /synthesize - Convert text to speech, full audio in one response
    pub async fn synthesize(
        State(controller): State<Arc<TtsController>>,
        payload: Result<Json<SynthesizeRequest>, JsonRejection>,
    ) -> AppResult<(StatusCode, HeaderMap, Body)> {
        let Json(request) = payload?;

        let result = controller.tts_service.synthesize(request).await?;

        let mut headers = metadata_headers(&result.metadata);
        headers.insert(
            header::CONTENT_TYPE,
            content_type_header(&result.audio.content_type),
        );

        Ok((StatusCode::OK, headers, Body::from(result.audio.audio)))
    }

    /// POST /synthesize/stream - Convert text to speech, relaying audio chunks
    /// as the provider produces them
    pub async fn synthesize_stream(
        State(controller): State<Arc<TtsController>>,
        payload: Result<Json<SynthesizeRequest>, JsonRejection>,
    ) -> AppResult<(StatusCode, HeaderMap, Body)> {
        let Json(request) = payload?;

        let synthesis = controller.tts_service.synthesize_stream(request).await?;

        let framing = controller.stream_framing;
        let mut headers = metadata_headers(&synthesis.metadata);
        headers.insert(
            header::CONTENT_TYPE,
            content_type_header(framing.content_type(&synthesis.stream.content_type)),
        );
        headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"));

        let body = Body::from_stream(relay(
            synthesis.stream.chunks,
            framing,
            synthesis.metadata.voice_id,
        ));

        Ok((StatusCode::OK, headers, body))
    }
}

fn metadata_headers(metadata: &SynthesisMetadata) -> HeaderMap {
    let mut headers = HeaderMap::new();
    if let Ok(voice_id) = HeaderValue::from_str(&metadata.voice_id) {
        headers.insert(X_VOICE_ID, voice_id);
    }
    headers.insert(X_MODEL_ID, HeaderValue::from_static(metadata.model.model_id()));
    headers.insert(X_CHARACTER_COUNT, HeaderValue::from(metadata.char_count));
    headers
}

fn content_type_header(content_type: &str) -> HeaderValue {
    HeaderValue::from_str(content_type).unwrap_or_else(|_| HeaderValue::from_static("audio/mpeg"))
}
