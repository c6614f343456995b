//! Chunk-at-a-time relay of an upstream audio stream to the caller.
//!
//! Each upstream chunk is forwarded as soon as it is polled, in arrival
//! order. Nothing is accumulated. When the upstream fails after the caller's
//! response has been committed, the relay yields the error and ends, which
//! makes the HTTP layer abort the chunked body: the caller sees the chunks
//! already delivered followed by a truncated stream. Dropping the relay (the
//! caller disconnected) drops the upstream stream with it.

use bytes::{BufMut, Bytes, BytesMut};
use futures::{stream, Stream, StreamExt};
use std::str::FromStr;
use std::time::Instant;

use super::error::TtsServiceError;
use super::model::AudioChunks;

/// Zero-length frame closing a successful length-prefixed stream
pub const END_OF_STREAM_FRAME: [u8; 4] = [0; 4];

pub const LENGTH_PREFIXED_CONTENT_TYPE: &str = "application/octet-stream";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StreamFraming {
    /// Upstream bytes verbatim
    #[default]
    Raw,
    /// `u32` little-endian length before each chunk, zero-length frame at the end
    LengthPrefixed,
}

impl StreamFraming {
    pub fn content_type<'a>(&self, upstream_content_type: &'a str) -> &'a str {
        match self {
            StreamFraming::Raw => upstream_content_type,
            StreamFraming::LengthPrefixed => LENGTH_PREFIXED_CONTENT_TYPE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown stream framing '{0}' (expected 'raw' or 'length_prefixed')")]
pub struct UnknownFraming(pub String);

impl FromStr for StreamFraming {
    type Err = UnknownFraming;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "raw" => Ok(StreamFraming::Raw),
            "length_prefixed" | "length-prefixed" => Ok(StreamFraming::LengthPrefixed),
            _ => Err(UnknownFraming(s.to_string())),
        }
    }
}

fn frame(chunk: &[u8]) -> Result<Bytes, TtsServiceError> {
    let len = u32::try_from(chunk.len()).map_err(|_| {
        TtsServiceError::StreamInterrupted(format!(
            "chunk of {} bytes does not fit a length prefix",
            chunk.len()
        ))
    })?;
    let mut framed = BytesMut::with_capacity(END_OF_STREAM_FRAME.len() + chunk.len());
    framed.put_u32_le(len);
    framed.put_slice(chunk);
    Ok(framed.freeze())
}

struct RelayState {
    upstream: AudioChunks,
    framing: StreamFraming,
    voice_id: String,
    chunks_relayed: usize,
    bytes_relayed: usize,
    started_at: Instant,
    finished: bool,
}

impl Drop for RelayState {
    fn drop(&mut self) {
        if !self.finished {
            tracing::info!(
                voice_id = %self.voice_id,
                chunks_relayed = self.chunks_relayed,
                bytes_relayed = self.bytes_relayed,
                elapsed_ms = self.started_at.elapsed().as_millis(),
                "Caller disconnected, upstream stream aborted"
            );
        }
    }
}

/// Wrap upstream chunks into the caller-facing body stream.
pub fn relay(
    upstream: AudioChunks,
    framing: StreamFraming,
    voice_id: String,
) -> impl Stream<Item = Result<Bytes, TtsServiceError>> + Send + 'static {
    let state = RelayState {
        upstream,
        framing,
        voice_id,
        chunks_relayed: 0,
        bytes_relayed: 0,
        started_at: Instant::now(),
        finished: false,
    };

    stream::unfold(state, |mut state| async move {
        if state.finished {
            return None;
        }

        loop {
            match state.upstream.next().await {
                Some(Ok(chunk)) if chunk.is_empty() => continue,
                Some(Ok(chunk)) => {
                    state.chunks_relayed += 1;
                    state.bytes_relayed += chunk.len();

                    let outgoing = match state.framing {
                        StreamFraming::Raw => Ok(chunk),
                        StreamFraming::LengthPrefixed => frame(&chunk),
                    };
                    if outgoing.is_err() {
                        state.finished = true;
                    }
                    return Some((outgoing, state));
                }
                Some(Err(err)) => {
                    state.finished = true;
                    tracing::warn!(
                        voice_id = %state.voice_id,
                        error = %err,
                        chunks_relayed = state.chunks_relayed,
                        bytes_relayed = state.bytes_relayed,
                        "Upstream stream interrupted, truncating response"
                    );
                    return Some((Err(err), state));
                }
                None => {
                    state.finished = true;
                    tracing::info!(
                        voice_id = %state.voice_id,
                        chunks_relayed = state.chunks_relayed,
                        bytes_relayed = state.bytes_relayed,
                        latency_ms = state.started_at.elapsed().as_millis(),
                        "Audio stream relayed"
                    );
                    return match state.framing {
                        StreamFraming::Raw => None,
                        StreamFraming::LengthPrefixed => {
                            Some((Ok(Bytes::from_static(&END_OF_STREAM_FRAME)), state))
                        }
                    };
                }
            }
        }
    })
}
