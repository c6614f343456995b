use bytes::Bytes;
use futures::stream::BoxStream;
use serde::Serialize;

use super::catalog::SynthesisModel;
use super::error::TtsServiceError;
use super::language::LanguageCode;

pub const DEFAULT_STABILITY: f32 = 0.5;
pub const DEFAULT_SIMILARITY_BOOST: f32 = 0.75;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VoiceSettings {
    pub stability: f32,
    pub similarity_boost: f32,
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self {
            stability: DEFAULT_STABILITY,
            similarity_boost: DEFAULT_SIMILARITY_BOOST,
        }
    }
}

/// A validated synthesis request, ready to be sent upstream
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesisParams {
    pub text: String,
    pub language: LanguageCode,
    pub voice_id: String,
    pub model: SynthesisModel,
    pub voice_settings: VoiceSettings,
}

impl SynthesisParams {
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }
}

/// Upstream audio chunks in arrival order
pub type AudioChunks = BoxStream<'static, Result<Bytes, TtsServiceError>>;

#[derive(Debug, Clone)]
pub struct SynthesizedAudio {
    pub audio: Bytes,
    pub content_type: String,
}

pub struct AudioStream {
    pub content_type: String,
    pub chunks: AudioChunks,
}

impl std::fmt::Debug for AudioStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioStream")
            .field("content_type", &self.content_type)
            .finish_non_exhaustive()
    }
}

/// What was actually sent upstream, reported back to callers as headers
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesisMetadata {
    pub voice_id: String,
    pub model: SynthesisModel,
    pub language: LanguageCode,
    pub char_count: usize,
}

impl From<&SynthesisParams> for SynthesisMetadata {
    fn from(params: &SynthesisParams) -> Self {
        Self {
            voice_id: params.voice_id.clone(),
            model: params.model,
            language: params.language,
            char_count: params.char_count(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SynthesisResult {
    pub metadata: SynthesisMetadata,
    pub audio: SynthesizedAudio,
}

#[derive(Debug)]
pub struct StreamingSynthesis {
    pub metadata: SynthesisMetadata,
    pub stream: AudioStream,
}
