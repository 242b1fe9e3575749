//! A minimal chat session driving a streaming provider.
//!
//! `ChatSession` is the Rust rendition of the browser-side chat loop: it
//! owns the [`Conversation`], appends the user's message, opens an
//! assistant turn, and folds incoming deltas into the trailing message in
//! the exact order they arrive. A transport failure mid-stream does not
//! escape as an `Err` – per the relay protocol it is translated into a
//! synthetic assistant message (`Error: …`) after removing a zero-length
//! placeholder, exactly what a chat UI should display.
//!
//! One completion request is in flight at a time; attempting to send while
//! streaming is refused before any message is appended.

use chatwire_core::chat::{ChatMessage, Conversation};
use chatwire_core::error::{RelayError, Result};
use chatwire_core::model::Model;
use chatwire_core::provider::{ChatCompleteParameters, StreamingChatProvider};
use futures_util::StreamExt;

/// Owned chat state plus the per-session completion settings.
#[derive(Debug, Clone)]
pub struct ChatSession {
    conversation: Conversation,
    model: Model,
    temperature: Option<f64>,
    max_tokens: Option<i64>,
}

impl ChatSession {
    /// Create an empty session targeting `model`.
    pub fn new(model: Model) -> Self {
        Self {
            conversation: Conversation::new(),
            model,
            temperature: None,
            max_tokens: None,
        }
    }

    /// Seed the transcript with a system message.
    pub fn with_system(mut self, content: impl Into<String>) -> Self {
        self.conversation.push(ChatMessage::system(content));
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: i64) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// The transcript accumulated so far.
    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    /// Forget the whole transcript, invalidating any in-flight turn.
    pub fn reset(&mut self) {
        self.conversation.reset();
    }

    /// Send one user message and stream the assistant's reply to
    /// completion. Returns the final trailing message – the assistant's
    /// answer, or the synthetic error message if the stream failed.
    ///
    /// # Errors
    ///
    /// Only misuse errors escape here (a completion already in flight).
    /// Stream failures are absorbed into the transcript as described in
    /// the module docs.
    pub async fn send<P>(&mut self, provider: &P, text: impl Into<String>) -> Result<&ChatMessage>
    where
        P: StreamingChatProvider,
        ChatMessage: Into<P::Message>,
    {
        if self.conversation.is_streaming() {
            return Err(RelayError::Validation(
                "a completion request is already in flight".into(),
            ));
        }

        self.conversation.push_user(text);

        let mut params = ChatCompleteParameters::new(
            self.conversation.messages().to_vec(),
            self.model.clone(),
        );
        if let Some(temperature) = self.temperature {
            params = params.with_temperature(temperature);
        }
        if let Some(max_tokens) = self.max_tokens {
            params = params.with_max_tokens(max_tokens);
        }

        let Some(token) = self.conversation.begin_assistant() else {
            return Err(RelayError::Validation(
                "a completion request is already in flight".into(),
            ));
        };

        let stream = provider.chat_complete_stream(params);
        let mut stream = std::pin::pin!(stream);

        while let Some(item) = stream.next().await {
            match item {
                Ok(fragment) => {
                    self.conversation.apply_delta(&token, &fragment);
                }
                Err(err) => {
                    self.conversation.fail(&token, &err);
                    break;
                }
            }
        }
        self.conversation.finish(&token);

        Ok(self
            .conversation
            .last()
            .expect("turn always leaves a trailing message"))
    }
}
