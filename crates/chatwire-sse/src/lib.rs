//! # `chatwire-sse` – incremental assembly of streamed completions
//!
//! The consuming half of the relay protocol: given a byte stream carrying
//! OpenAI-style Server-Sent Events, produce the growing assistant message.
//!
//! Three layers, each usable on its own:
//!
//! 1. [`decode::SseLineDecoder`] – bytes in, complete text lines out.
//!    Handles UTF-8 sequences and lines split across arbitrary chunk
//!    boundaries.
//! 2. [`fragments`] – line filtering and delta extraction: `data: ` events
//!    are parsed, `[DONE]` and blanks ignored, malformed events skipped.
//! 3. [`session::ChatSession`] – drives a
//!    [`StreamingChatProvider`](chatwire_core::provider::StreamingChatProvider)
//!    and folds the fragments into a
//!    [`Conversation`](chatwire_core::chat::Conversation) in arrival order.

pub mod decode;
pub mod fragments;
pub mod session;

pub use decode::SseLineDecoder;
pub use fragments::fragment_stream;
pub use session::ChatSession;
