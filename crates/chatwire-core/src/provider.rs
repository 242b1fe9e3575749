//! Provider traits implemented by completion backends.
//!
//! A **backend** turns a chat history into a network call to a concrete
//! OpenAI-compatible endpoint and parses the reply. The traits are
//! intentionally minimal:
//!
//! * **One associated type** – the in-memory `Message` representation this
//!   provider accepts.
//! * **One async-ish method** each – a *single* round-trip per call, no
//!   retries, no caching. Whoever sits above the provider (the relay
//!   endpoint, a chat session) owns the resend policy, which in this stack
//!   is "don't".
//!
//! `chat_complete` returns a [`Pin<Box<dyn Future>>`] so the base trait
//! stays object-safe without pulling in `async_trait`.

use std::{future::Future, pin::Pin};

use crate::{error::Result, model::Model};
use futures_core::stream::Stream;

/// A backend able to perform a single, non-streaming chat completion.
pub trait ChatCompletionProvider: Send + Sync {
    /// Chat message type consumed by this backend.
    type Message: Send + Sync + 'static;

    /// Execute the chat prompt and return the assistant's reply text,
    /// extracted from the first choice of the upstream response.
    fn chat_complete<'p, M>(
        &self,
        params: ChatCompleteParameters<M>,
    ) -> Pin<Box<dyn Future<Output = Result<String>> + Send + 'p>>
    where
        M: Into<Self::Message> + Clone + Send + Sync + 'p;
}

/// A provider that can deliver the model's answer **incrementally**.
///
/// The stream yields UTF-8 text *deltas* (OpenAI's SSE format). It is
/// finite and non-restartable: once the underlying transport reports end of
/// stream the sequence ends, whether or not a `[DONE]` sentinel was seen.
pub trait StreamingChatProvider: ChatCompletionProvider {
    /// The item type returned on the stream: plain UTF-8 text fragments.
    type Delta<'s>: Stream<Item = Result<String>> + Send + 's
    where
        Self: 's;

    /// Start a streaming chat completion.
    fn chat_complete_stream<'p, M>(&'p self, params: ChatCompleteParameters<M>) -> Self::Delta<'p>
    where
        M: Into<Self::Message> + Clone + Send + Sync + 'p;
}

/// Bundle of everything a backend needs for one completion call.
#[derive(Debug, Clone)]
pub struct ChatCompleteParameters<M: Clone> {
    pub messages: Vec<M>,
    pub model: Model,
    pub temperature: Option<f64>,
    pub max_tokens: Option<i64>,
}

impl<M: Clone> ChatCompleteParameters<M> {
    pub fn new(messages: Vec<M>, model: Model) -> Self {
        Self {
            messages,
            model,
            temperature: None,
            max_tokens: None,
        }
    }

    pub fn messages(&self) -> &Vec<M> {
        &self.messages
    }

    pub fn into_messages(self) -> Vec<M> {
        self.messages
    }

    pub fn model(&self) -> Model {
        self.model.clone()
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: i64) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}
