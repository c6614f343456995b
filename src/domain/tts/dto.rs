use serde::{Deserialize, Serialize};

use super::catalog::{Gender, VoiceEntry};
use super::language::LanguageCode;

fn default_language() -> String {
    LanguageCode::English.as_str().to_string()
}

/// Request for POST /synthesize and POST /synthesize/stream
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynthesizeRequest {
    pub text: String,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voice: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stability: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub similarity_boost: Option<f32>,
}

/// Query for GET /voices
#[derive(Debug, Default, Deserialize)]
pub struct VoicesQuery {
    pub language: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanguageInfo {
    pub code: String,
    pub name: String,
}

impl From<LanguageCode> for LanguageInfo {
    fn from(language: LanguageCode) -> Self {
        Self {
            code: language.as_str().to_string(),
            name: language.display_name().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VoiceInfo {
    pub name: String,
    pub voice_id: String,
    pub gender: Gender,
    /// Native catalog language of the voice
    pub language: LanguageCode,
}

impl From<&VoiceEntry> for VoiceInfo {
    fn from(entry: &VoiceEntry) -> Self {
        Self {
            name: entry.name.to_string(),
            voice_id: entry.voice_id.to_string(),
            gender: entry.gender,
            language: entry.language,
        }
    }
}
