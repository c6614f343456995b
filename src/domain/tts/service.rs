use super::catalog::{SynthesisModel, VoiceCatalog};
use super::dto::{LanguageInfo, SynthesizeRequest, VoiceInfo};
use super::error::TtsServiceError;
use super::language::LanguageCode;
use super::model::{
    StreamingSynthesis, SynthesisMetadata, SynthesisParams, SynthesisResult, VoiceSettings,
};
use crate::infrastructure::repositories::TtsRepository;
use async_trait::async_trait;
use std::sync::Arc;

pub const DEFAULT_MAX_TEXT_CHARS: usize = 10_000;

pub struct TtsService {
    tts_repo: Arc<dyn TtsRepository>,
    catalog: Arc<VoiceCatalog>,
    max_text_chars: usize,
}

impl TtsService {
    pub fn new(
        tts_repo: Arc<dyn TtsRepository>,
        catalog: Arc<VoiceCatalog>,
        max_text_chars: usize,
    ) -> Self {
        Self {
            tts_repo,
            catalog,
            max_text_chars,
        }
    }
}

#[async_trait]
pub trait TtsServiceApi: Send + Sync {
    /// Supported languages, in catalog order
    fn list_languages(&self) -> Vec<LanguageInfo>;

    /// Voices for a language, or the whole catalog when no language is given
    fn list_voices(&self, language: Option<&str>) -> Result<Vec<VoiceInfo>, TtsServiceError>;

    /// Synthesize text and return the complete audio payload
    ///
    /// This operation:
    /// - Validates the request and resolves defaults (voice, model, settings)
    /// - Calls the upstream provider exactly once
    async fn synthesize(
        &self,
        request: SynthesizeRequest,
    ) -> Result<SynthesisResult, TtsServiceError>;

    /// Synthesize text and return the upstream audio stream as soon as the
    /// upstream has accepted the request
    async fn synthesize_stream(
        &self,
        request: SynthesizeRequest,
    ) -> Result<StreamingSynthesis, TtsServiceError>;
}

#[async_trait]
impl TtsServiceApi for TtsService {
    fn list_languages(&self) -> Vec<LanguageInfo> {
        LanguageCode::ALL.into_iter().map(LanguageInfo::from).collect()
    }

    fn list_voices(&self, language: Option<&str>) -> Result<Vec<VoiceInfo>, TtsServiceError> {
        let voices = match language {
            Some(code) => {
                let language = parse_language(code)?;
                self.catalog
                    .voices_for(language)
                    .into_iter()
                    .map(VoiceInfo::from)
                    .collect()
            }
            None => self.catalog.all().iter().map(VoiceInfo::from).collect(),
        };
        Ok(voices)
    }

    async fn synthesize(
        &self,
        request: SynthesizeRequest,
    ) -> Result<SynthesisResult, TtsServiceError> {
        let params = self.prepare(request)?;

        tracing::info!(
            language = %params.language,
            voice_id = %params.voice_id,
            model = %params.model,
            text_length = params.char_count(),
            "TTS synthesis request"
        );

        let audio = self.tts_repo.synthesize(&params).await?;

        Ok(SynthesisResult {
            metadata: SynthesisMetadata::from(&params),
            audio,
        })
    }

    async fn synthesize_stream(
        &self,
        request: SynthesizeRequest,
    ) -> Result<StreamingSynthesis, TtsServiceError> {
        let params = self.prepare(request)?;

        tracing::info!(
            language = %params.language,
            voice_id = %params.voice_id,
            model = %params.model,
            text_length = params.char_count(),
            "TTS streaming synthesis request"
        );

        let stream = self.tts_repo.synthesize_stream(&params).await?;

        Ok(StreamingSynthesis {
            metadata: SynthesisMetadata::from(&params),
            stream,
        })
    }
}

impl TtsService {
    /// Validate an inbound request and resolve every default
    fn prepare(&self, request: SynthesizeRequest) -> Result<SynthesisParams, TtsServiceError> {
        if request.text.trim().is_empty() {
            return Err(TtsServiceError::Invalid("Text cannot be empty".to_string()));
        }

        let char_count = request.text.chars().count();
        if char_count > self.max_text_chars {
            return Err(TtsServiceError::TooLong(format!(
                "Text must be {} characters or less (got {})",
                self.max_text_chars, char_count
            )));
        }

        let language = parse_language(&request.language)?;
        let voice_id = self.resolve_voice(language, request.voice.as_deref())?;
        let model = match request.model.as_deref() {
            Some(model) => model
                .parse::<SynthesisModel>()
                .map_err(|e| TtsServiceError::Invalid(e.to_string()))?,
            None => SynthesisModel::default(),
        };

        let defaults = VoiceSettings::default();
        let voice_settings = VoiceSettings {
            stability: unit_interval("stability", request.stability, defaults.stability)?,
            similarity_boost: unit_interval(
                "similarity_boost",
                request.similarity_boost,
                defaults.similarity_boost,
            )?,
        };

        Ok(SynthesisParams {
            text: request.text,
            language,
            voice_id,
            model,
            voice_settings,
        })
    }

    fn resolve_voice(
        &self,
        language: LanguageCode,
        requested: Option<&str>,
    ) -> Result<String, TtsServiceError> {
        match requested.map(str::trim).filter(|voice| !voice.is_empty()) {
            Some(voice) => self
                .catalog
                .resolve(language, voice)
                .ok_or_else(|| TtsServiceError::Invalid(format!("Unknown voice '{}'", voice))),
            None => self
                .catalog
                .default_voice(language)
                .map(|entry| entry.voice_id.to_string())
                .ok_or_else(|| {
                    TtsServiceError::Invalid(format!(
                        "No voice available for language '{}'",
                        language
                    ))
                }),
        }
    }
}

fn parse_language(code: &str) -> Result<LanguageCode, TtsServiceError> {
    code.parse::<LanguageCode>()
        .map_err(|e| TtsServiceError::Invalid(e.to_string()))
}

fn unit_interval(name: &str, value: Option<f32>, default: f32) -> Result<f32, TtsServiceError> {
    match value {
        None => Ok(default),
        Some(v) if (0.0..=1.0).contains(&v) => Ok(v),
        Some(v) => Err(TtsServiceError::Invalid(format!(
            "{} must be between 0 and 1 (got {})",
            name, v
        ))),
    }
}
