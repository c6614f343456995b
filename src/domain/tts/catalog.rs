use serde::Serialize;
use std::str::FromStr;

use super::language::LanguageCode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoiceEntry {
    pub language: LanguageCode,
    pub name: &'static str,
    pub voice_id: &'static str,
    pub gender: Gender,
}

const fn voice(
    language: LanguageCode,
    name: &'static str,
    voice_id: &'static str,
    gender: Gender,
) -> VoiceEntry {
    VoiceEntry {
        language,
        name,
        voice_id,
        gender,
    }
}

/// Built-in ElevenLabs voices. The first entry of each language is its default.
const BUILTIN_VOICES: &[VoiceEntry] = &[
    voice(LanguageCode::English, "Rachel", "21m00Tcm4TlvDq8ikWAM", Gender::Female),
    voice(LanguageCode::English, "Drew", "29vD33N1CtxCmqQRPOHJ", Gender::Male),
    voice(LanguageCode::English, "Clyde", "2EiwWnXFnvU5JabPnv8n", Gender::Male),
    voice(LanguageCode::English, "Paul", "5Q0t7uMcjvnagumLfvZi", Gender::Male),
    voice(LanguageCode::English, "Domi", "AZnzlk1XvdvUeBnXmlld", Gender::Female),
    voice(LanguageCode::English, "Dave", "CYw3kZ02Hs0563khs1Fj", Gender::Male),
    voice(LanguageCode::English, "Fin", "D38z5RcWu1voky8WS1ja", Gender::Male),
    voice(LanguageCode::English, "Sarah", "EXAVITQu4vr4xnSDxMaL", Gender::Female),
    voice(LanguageCode::English, "Antoni", "ErXwobaYiN019PkySvjV", Gender::Male),
    voice(LanguageCode::English, "Thomas", "GBv7mTt0atIp3BR8iCZE", Gender::Male),
    voice(LanguageCode::Italian, "Giovanni", "zcAOhNBS3c14rBihAFp1", Gender::Male),
    voice(LanguageCode::Italian, "Matilda", "XrExE9yKIg1WjnnlVkGX", Gender::Female),
];

/// Languages without dedicated voices are spoken by this language's voices
/// through the multilingual models.
const MULTILINGUAL_FALLBACK: LanguageCode = LanguageCode::English;

/// ElevenLabs voice ids are 20 ASCII alphanumeric characters
const PROVIDER_VOICE_ID_LEN: usize = 20;

/// Immutable voice catalog, built once at startup and shared by reference.
#[derive(Debug, Clone)]
pub struct VoiceCatalog {
    entries: Vec<VoiceEntry>,
}

impl Default for VoiceCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl VoiceCatalog {
    pub fn builtin() -> Self {
        Self {
            entries: BUILTIN_VOICES.to_vec(),
        }
    }

    /// All entries in catalog order
    pub fn all(&self) -> &[VoiceEntry] {
        &self.entries
    }

    /// Voices available for a language, in catalog order. Never empty for the
    /// builtin catalog: languages without dedicated voices get the
    /// multilingual set.
    pub fn voices_for(&self, language: LanguageCode) -> Vec<&VoiceEntry> {
        let dedicated: Vec<&VoiceEntry> = self
            .entries
            .iter()
            .filter(|entry| entry.language == language)
            .collect();

        if !dedicated.is_empty() {
            return dedicated;
        }

        self.entries
            .iter()
            .filter(|entry| entry.language == MULTILINGUAL_FALLBACK)
            .collect()
    }

    pub fn default_voice(&self, language: LanguageCode) -> Option<&VoiceEntry> {
        self.voices_for(language).into_iter().next()
    }

    /// Resolve a caller-supplied voice to a provider voice id.
    ///
    /// Accepts a catalog voice id, a catalog voice name (case-insensitive,
    /// the requested language's voices win), or an opaque provider voice id
    /// for voices outside the catalog.
    pub fn resolve(&self, language: LanguageCode, requested: &str) -> Option<String> {
        let requested = requested.trim();

        if let Some(entry) = self.entries.iter().find(|e| e.voice_id == requested) {
            return Some(entry.voice_id.to_string());
        }

        let by_name = |entry: &&VoiceEntry| entry.name.eq_ignore_ascii_case(requested);
        if let Some(entry) = self
            .voices_for(language)
            .into_iter()
            .find(by_name)
            .or_else(|| self.entries.iter().find(by_name))
        {
            return Some(entry.voice_id.to_string());
        }

        if is_provider_voice_id(requested) {
            return Some(requested.to_string());
        }

        None
    }
}

fn is_provider_voice_id(candidate: &str) -> bool {
    candidate.len() == PROVIDER_VOICE_ID_LEN
        && candidate.chars().all(|c| c.is_ascii_alphanumeric())
}

/// Friendly model selector mapped to the provider model id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SynthesisModel {
    /// Low latency
    #[default]
    Turbo,
    /// Higher quality, more expressive
    Multilingual,
}

impl SynthesisModel {
    pub const ALL: [SynthesisModel; 2] = [SynthesisModel::Turbo, SynthesisModel::Multilingual];

    pub fn as_str(&self) -> &'static str {
        match self {
            SynthesisModel::Turbo => "turbo",
            SynthesisModel::Multilingual => "multilingual",
        }
    }

    pub fn model_id(&self) -> &'static str {
        match self {
            SynthesisModel::Turbo => "eleven_turbo_v2_5",
            SynthesisModel::Multilingual => "eleven_multilingual_v2",
        }
    }
}

impl std::fmt::Display for SynthesisModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported model '{0}' (expected 'turbo' or 'multilingual')")]
pub struct UnsupportedModel(pub String);

impl FromStr for SynthesisModel {
    type Err = UnsupportedModel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        SynthesisModel::ALL
            .iter()
            .copied()
            .find(|model| model.as_str() == wanted || model.model_id() == wanted)
            .ok_or_else(|| UnsupportedModel(s.to_string()))
    }
}
