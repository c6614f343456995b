use super::tts_repository::TtsRepository;
use crate::domain::tts::model::{
    AudioChunks, AudioStream, SynthesisParams, SynthesizedAudio, VoiceSettings,
};
use crate::domain::tts::TtsServiceError;
use crate::infrastructure::config::{ApiKey, Config};
use anyhow::Context;
use async_trait::async_trait;
use futures::{stream, StreamExt};
use reqwest::header::{HeaderValue, ACCEPT, CONTENT_TYPE};
use serde::Serialize;
use std::time::{Duration, Instant};

pub const API_KEY_HEADER: &str = "xi-api-key";

/// Used when the provider omits a content type
pub const DEFAULT_AUDIO_CONTENT_TYPE: &str = "audio/mpeg";

const MAX_ERROR_MESSAGE_CHARS: usize = 500;

/// Upper bound on how much of a provider error body is read
const MAX_ERROR_BODY_BYTES: usize = 4096;

/// Body of `POST /text-to-speech/{voice_id}[/stream]`
#[derive(Debug, Serialize)]
struct ElevenLabsSpeechRequest<'a> {
    text: &'a str,
    model_id: &'a str,
    voice_settings: VoiceSettings,
}

/// ElevenLabs implementation of TTS repository
pub struct ElevenLabsTtsRepository {
    client: reqwest::Client,
    api_key: HeaderValue,
    base_url: String,
    request_timeout: Duration,
    stream_idle_timeout: Duration,
}

impl ElevenLabsTtsRepository {
    pub fn new(
        client: reqwest::Client,
        api_key: &ApiKey,
        base_url: String,
        request_timeout: Duration,
        stream_idle_timeout: Duration,
    ) -> anyhow::Result<Self> {
        let mut api_key = HeaderValue::from_str(api_key.expose())
            .context("ELEVENLABS_API_KEY is not a valid header value")?;
        api_key.set_sensitive(true);

        Ok(Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            request_timeout,
            stream_idle_timeout,
        })
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        // No client-wide timeout: it would also cap how long a stream may run
        let client = reqwest::Client::builder()
            .connect_timeout(config.upstream_connect_timeout)
            .build()
            .context("failed to build upstream HTTP client")?;

        Self::new(
            client,
            &config.elevenlabs_api_key,
            config.elevenlabs_base_url.clone(),
            config.upstream_timeout,
            config.stream_idle_timeout,
        )
    }

    fn speech_url(&self, voice_id: &str, streaming: bool) -> String {
        let suffix = if streaming { "/stream" } else { "" };
        format!("{}/text-to-speech/{}{}", self.base_url, voice_id, suffix)
    }

    fn speech_request(&self, params: &SynthesisParams, streaming: bool) -> reqwest::RequestBuilder {
        let body = ElevenLabsSpeechRequest {
            text: &params.text,
            model_id: params.model.model_id(),
            voice_settings: params.voice_settings,
        };

        self.client
            .post(self.speech_url(&params.voice_id, streaming))
            .header(API_KEY_HEADER, self.api_key.clone())
            .header(ACCEPT, DEFAULT_AUDIO_CONTENT_TYPE)
            .json(&body)
    }

    /// Turn a non-success status into `TtsServiceError::Upstream`
    async fn ensure_success(
        &self,
        response: reqwest::Response,
        params: &SynthesisParams,
    ) -> Result<reqwest::Response, TtsServiceError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = read_error_body(response, self.request_timeout).await;
        let message = provider_error_message(&body);

        tracing::error!(
            status = status.as_u16(),
            voice_id = %params.voice_id,
            model = %params.model,
            error = %message,
            "ElevenLabs API error"
        );

        Err(TtsServiceError::Upstream {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl TtsRepository for ElevenLabsTtsRepository {
    async fn synthesize(
        &self,
        params: &SynthesisParams,
    ) -> Result<SynthesizedAudio, TtsServiceError> {
        let start_time = Instant::now();

        tracing::info!(
            voice_id = %params.voice_id,
            model = params.model.model_id(),
            text_length = params.char_count(),
            "Calling ElevenLabs TTS API"
        );

        let response = self
            .speech_request(params, false)
            .timeout(self.request_timeout)
            .send()
            .await
            .map_err(|e| log_transport_error(e, params))?;
        let response = self.ensure_success(response, params).await?;

        let content_type = content_type_of(&response);
        let audio = response
            .bytes()
            .await
            .map_err(|e| log_transport_error(e, params))?;

        tracing::info!(
            provider = "elevenlabs",
            voice_id = %params.voice_id,
            model = params.model.model_id(),
            latency_ms = start_time.elapsed().as_millis(),
            characters_count = params.char_count(),
            audio_size_bytes = audio.len(),
            content_type = %content_type,
            "TTS synthesis completed"
        );

        Ok(SynthesizedAudio {
            audio,
            content_type,
        })
    }

    async fn synthesize_stream(
        &self,
        params: &SynthesisParams,
    ) -> Result<AudioStream, TtsServiceError> {
        let start_time = Instant::now();

        tracing::info!(
            voice_id = %params.voice_id,
            model = params.model.model_id(),
            text_length = params.char_count(),
            "Calling ElevenLabs TTS streaming API"
        );

        let response = tokio::time::timeout(
            self.request_timeout,
            self.speech_request(params, true).send(),
        )
        .await
        .map_err(|_| {
            tracing::error!(
                voice_id = %params.voice_id,
                timeout_ms = self.request_timeout.as_millis(),
                "ElevenLabs stream did not start in time"
            );
            TtsServiceError::Timeout(format!(
                "no response from upstream within {} ms",
                self.request_timeout.as_millis()
            ))
        })?
        .map_err(|e| log_transport_error(e, params))?;
        let response = self.ensure_success(response, params).await?;

        let content_type = content_type_of(&response);

        tracing::info!(
            voice_id = %params.voice_id,
            time_to_headers_ms = start_time.elapsed().as_millis(),
            content_type = %content_type,
            "ElevenLabs stream opened"
        );

        Ok(AudioStream {
            content_type,
            chunks: idle_bounded(response, self.stream_idle_timeout),
        })
    }
}

/// Upstream chunks, failing the stream when the provider goes quiet for
/// longer than `idle_timeout`
fn idle_bounded(response: reqwest::Response, idle_timeout: Duration) -> AudioChunks {
    let upstream = response.bytes_stream().boxed();

    stream::unfold(Some(upstream), move |upstream| async move {
        let mut upstream = upstream?;
        match tokio::time::timeout(idle_timeout, upstream.next()).await {
            Ok(Some(Ok(chunk))) => Some((Ok(chunk), Some(upstream))),
            Ok(Some(Err(e))) => Some((
                Err(TtsServiceError::StreamInterrupted(
                    e.without_url().to_string(),
                )),
                None,
            )),
            Ok(None) => None,
            Err(_) => Some((
                Err(TtsServiceError::StreamInterrupted(format!(
                    "no audio received from upstream for {} ms",
                    idle_timeout.as_millis()
                ))),
                None,
            )),
        }
    })
    .boxed()
}

/// Read at most `MAX_ERROR_BODY_BYTES` of an error body. Whatever arrived
/// before `timeout` is kept when the provider stalls or the read fails.
async fn read_error_body(response: reqwest::Response, timeout: Duration) -> String {
    let status = response.status().as_u16();
    let deadline = tokio::time::Instant::now() + timeout;
    let mut chunks = response.bytes_stream();
    let mut body = Vec::new();

    while body.len() < MAX_ERROR_BODY_BYTES {
        match tokio::time::timeout_at(deadline, chunks.next()).await {
            Ok(Some(Ok(chunk))) => append_capped(&mut body, &chunk),
            Ok(Some(Err(e))) => {
                tracing::warn!(
                    status,
                    error = %e.without_url(),
                    "Failed to read ElevenLabs error body"
                );
                break;
            }
            Ok(None) => break,
            Err(_) => {
                tracing::warn!(
                    status,
                    timeout_ms = timeout.as_millis(),
                    "ElevenLabs error body not received in time"
                );
                break;
            }
        }
    }

    String::from_utf8_lossy(&body).into_owned()
}

fn append_capped(body: &mut Vec<u8>, chunk: &[u8]) {
    let take = chunk.len().min(MAX_ERROR_BODY_BYTES.saturating_sub(body.len()));
    body.extend_from_slice(&chunk[..take]);
}

fn content_type_of(response: &reqwest::Response) -> String {
    response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or(DEFAULT_AUDIO_CONTENT_TYPE)
        .to_string()
}

fn log_transport_error(err: reqwest::Error, params: &SynthesisParams) -> TtsServiceError {
    let err = TtsServiceError::from(err);
    tracing::error!(
        error = %err,
        voice_id = %params.voice_id,
        model = %params.model,
        "ElevenLabs API call failed"
    );
    err
}

/// Extract a readable message from an ElevenLabs error body.
///
/// The API answers `{"detail": {"status": ..., "message": ...}}` for most
/// failures and `{"detail": "..."}` for some; anything else is passed through
/// truncated.
fn provider_error_message(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        let detail = &value["detail"];
        if let Some(message) = detail.get("message").and_then(|m| m.as_str()) {
            return message.to_string();
        }
        if let Some(message) = detail.as_str() {
            return message.to_string();
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "no error details".to_string();
    }
    trimmed.chars().take(MAX_ERROR_MESSAGE_CHARS).collect()
}
