use crate::domain::tts::model::{AudioStream, SynthesisParams, SynthesizedAudio};
use crate::domain::tts::TtsServiceError;
use async_trait::async_trait;

/// Repository for TTS synthesis operations.
/// Abstracts the upstream speech provider.
///
/// Implementations are responsible for:
/// - Mapping validated parameters onto the provider's request shape
/// - Attaching the provider credential
/// - Translating provider failures into `TtsServiceError`
///
/// Implementations must call the provider once per invocation and never retry.
#[async_trait]
pub trait TtsRepository: Send + Sync {
    /// Synthesize text and buffer the complete audio payload
    ///
    /// # Errors
    /// `Upstream` for a non-success provider status, `Unavailable` when the
    /// provider cannot be reached, `Timeout` when it does not answer in time
    async fn synthesize(&self, params: &SynthesisParams)
        -> Result<SynthesizedAudio, TtsServiceError>;

    /// Open a streaming synthesis and return the provider's chunks as they
    /// arrive
    ///
    /// Errors before the first byte are returned directly; failures during
    /// the stream are yielded as `StreamInterrupted` items.
    async fn synthesize_stream(&self, params: &SynthesisParams)
        -> Result<AudioStream, TtsServiceError>;
}
