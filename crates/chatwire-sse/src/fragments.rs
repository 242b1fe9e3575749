//! Delta extraction from decoded SSE lines.
//!
//! Each event line looks like
//! `data: {"choices":[{"delta":{"content":"…"}}]}` and the stream is
//! conventionally closed by `data: [DONE]`. The sentinel is advisory only:
//! termination is driven by the transport's own end of stream, so a relay
//! that dies before sending `[DONE]` still drains cleanly.
//!
//! A line that fails to parse is *skipped*, not fatal – partial or
//! malformed events are an upstream hiccup the assembler rides out. A
//! failure of the underlying transport, by contrast, propagates to the
//! caller as a terminal [`RelayError::Transport`].

use async_stream::try_stream;
use chatwire_core::error::{RelayError, Result};
use futures_core::stream::Stream;
use futures_util::StreamExt;
use serde::Deserialize;

use crate::decode::SseLineDecoder;

/// Prefix carried by every SSE event line.
pub const DATA_PREFIX: &str = "data: ";

/// Conventional end-of-stream marker, ignored for content purposes.
pub const DONE_SENTINEL: &str = "[DONE]";

/// The slice of the chunk payload the assembler cares about.
#[derive(Debug, Deserialize)]
struct ChunkPayload {
    #[serde(default)]
    choices: Vec<ChunkChoice>,
}

#[derive(Debug, Deserialize)]
struct ChunkChoice {
    #[serde(default)]
    delta: ChunkDelta,
}

#[derive(Debug, Default, Deserialize)]
struct ChunkDelta {
    content: Option<String>,
}

/// Extract the delta text from one decoded line.
///
/// Returns `None` for blank lines, non-`data:` lines, the `[DONE]`
/// sentinel, malformed JSON, and events whose first choice carries no
/// (or empty) content.
pub fn parse_line(line: &str) -> Option<String> {
    let data = line.strip_prefix(DATA_PREFIX)?.trim();
    if data == DONE_SENTINEL {
        return None;
    }

    let payload: ChunkPayload = serde_json::from_str(data).ok()?;
    let fragment = payload.choices.into_iter().next()?.delta.content?;
    if fragment.is_empty() {
        None
    } else {
        Some(fragment)
    }
}

/// Turn a byte stream into a lazy, finite, non-restartable stream of text
/// fragments, in arrival order.
///
/// `bytes` is anything that yields byte chunks – a `reqwest` body stream,
/// a channel of `Bytes`, a test vector of slices. Chunk boundaries are
/// immaterial; see [`SseLineDecoder`].
pub fn fragment_stream<S, B, E>(bytes: S) -> impl Stream<Item = Result<String>>
where
    S: Stream<Item = std::result::Result<B, E>>,
    B: AsRef<[u8]>,
    E: std::error::Error + Send + Sync + 'static,
{
    try_stream! {
        let mut decoder = SseLineDecoder::new();
        let mut bytes = std::pin::pin!(bytes);

        while let Some(chunk) = bytes.next().await {
            let chunk = chunk.map_err(RelayError::transport)?;
            for line in decoder.push(chunk.as_ref()) {
                if let Some(fragment) = parse_line(&line) {
                    yield fragment;
                }
            }
        }

        // End of transport is authoritative; a final unterminated line is
        // still given a chance to parse.
        if let Some(tail) = decoder.finish()
            && let Some(fragment) = parse_line(&tail)
        {
            yield fragment;
        }
    }
}
