use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// ISO 639-1 language codes supported by the relay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LanguageCode {
    #[serde(rename = "it")]
    Italian,
    #[serde(rename = "en")]
    English,
    #[serde(rename = "fr")]
    French,
    #[serde(rename = "es")]
    Spanish,
    #[serde(rename = "de")]
    German,
    #[serde(rename = "pt")]
    Portuguese,
    #[serde(rename = "pl")]
    Polish,
    #[serde(rename = "nl")]
    Dutch,
    #[serde(rename = "ja")]
    Japanese,
    #[serde(rename = "ko")]
    Korean,
    #[serde(rename = "zh")]
    Chinese,
    #[serde(rename = "ar")]
    Arabic,
    #[serde(rename = "ru")]
    Russian,
    #[serde(rename = "hi")]
    Hindi,
    #[serde(rename = "tr")]
    Turkish,
}

impl LanguageCode {
    /// Every supported language, in listing order
    pub const ALL: [LanguageCode; 15] = [
        LanguageCode::Italian,
        LanguageCode::English,
        LanguageCode::French,
        LanguageCode::Spanish,
        LanguageCode::German,
        LanguageCode::Portuguese,
        LanguageCode::Polish,
        LanguageCode::Dutch,
        LanguageCode::Japanese,
        LanguageCode::Korean,
        LanguageCode::Chinese,
        LanguageCode::Arabic,
        LanguageCode::Russian,
        LanguageCode::Hindi,
        LanguageCode::Turkish,
    ];

    /// Get the ISO 639-1 code as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            LanguageCode::Italian => "it",
            LanguageCode::English => "en",
            LanguageCode::French => "fr",
            LanguageCode::Spanish => "es",
            LanguageCode::German => "de",
            LanguageCode::Portuguese => "pt",
            LanguageCode::Polish => "pl",
            LanguageCode::Dutch => "nl",
            LanguageCode::Japanese => "ja",
            LanguageCode::Korean => "ko",
            LanguageCode::Chinese => "zh",
            LanguageCode::Arabic => "ar",
            LanguageCode::Russian => "ru",
            LanguageCode::Hindi => "hi",
            LanguageCode::Turkish => "tr",
        }
    }

    /// English display name
    pub fn display_name(&self) -> &'static str {
        match self {
            LanguageCode::Italian => "Italian",
            LanguageCode::English => "English",
            LanguageCode::French => "French",
            LanguageCode::Spanish => "Spanish",
            LanguageCode::German => "German",
            LanguageCode::Portuguese => "Portuguese",
            LanguageCode::Polish => "Polish",
            LanguageCode::Dutch => "Dutch",
            LanguageCode::Japanese => "Japanese",
            LanguageCode::Korean => "Korean",
            LanguageCode::Chinese => "Chinese",
            LanguageCode::Arabic => "Arabic",
            LanguageCode::Russian => "Russian",
            LanguageCode::Hindi => "Hindi",
            LanguageCode::Turkish => "Turkish",
        }
    }
}

impl std::fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported language '{0}'")]
pub struct UnsupportedLanguage(pub String);

impl FromStr for LanguageCode {
    type Err = UnsupportedLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_ascii_lowercase();
        LanguageCode::ALL
            .iter()
            .copied()
            .find(|language| language.as_str() == code)
            .ok_or_else(|| UnsupportedLanguage(s.to_string()))
    }
}
