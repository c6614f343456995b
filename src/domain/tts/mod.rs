pub mod catalog;
pub mod dto;
pub mod error;
pub mod language;
pub mod model;
pub mod relay;
pub mod service;

pub use catalog::{Gender, SynthesisModel, VoiceCatalog, VoiceEntry};
pub use dto::{LanguageInfo, SynthesizeRequest, VoiceInfo, VoicesQuery};
pub use error::TtsServiceError;
pub use language::LanguageCode;
pub use relay::StreamFraming;
pub use service::{TtsService, TtsServiceApi};
