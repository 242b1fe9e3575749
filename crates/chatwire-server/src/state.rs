//! Shared application state and the completion-backend seam.
//!
//! The relay talks to its upstream through [`CompletionBackend`], an
//! object-safe trait, so tests can slot in a scripted backend and assert
//! on call counts. Production wires in [`OpenAiClient`].

use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use futures_core::Stream;
use futures_util::TryStreamExt;

use chatwire_core::store::{ContextStore, MemoryStore};
use chatwire_openai::OpenAiClient;
use chatwire_openai::api_v1::{ChatCompletionRequest, ChatCompletionResponse};
use chatwire_openai::error::OpenAiError;

use crate::config::ServerConfig;

/// Raw upstream byte stream, forwarded to the browser verbatim.
pub type UpstreamByteStream =
    Pin<Box<dyn Stream<Item = Result<Bytes, OpenAiError>> + Send + 'static>>;

/// One upstream attempt per call – the backend performs no retries; a
/// failed request surfaces once and the UI owns any resend.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Non-streaming completion, parsed into the typed envelope.
    async fn complete(
        &self,
        request: ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, OpenAiError>;

    /// Streaming completion. The upstream status has been checked; what
    /// remains is the untouched SSE byte stream.
    async fn open_stream(
        &self,
        request: ChatCompletionRequest,
    ) -> Result<UpstreamByteStream, OpenAiError>;
}

#[async_trait]
impl CompletionBackend for OpenAiClient {
    async fn complete(
        &self,
        request: ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, OpenAiError> {
        self.chat_completion(request).await
    }

    async fn open_stream(
        &self,
        request: ChatCompletionRequest,
    ) -> Result<UpstreamByteStream, OpenAiError> {
        let response = self.chat_completion_raw(request).await?;
        Ok(Box::pin(response.bytes_stream().map_err(OpenAiError::from)))
    }
}

/// Everything a handler needs, shared via `Arc`.
pub struct AppState {
    pub config: ServerConfig,
    pub backend: Arc<dyn CompletionBackend>,
    pub store: Arc<dyn ContextStore>,
}

impl AppState {
    /// Wire up the production backend and an in-memory context store.
    ///
    /// When the credential is absent the client is still constructed (with
    /// an empty key) but never dialled: the chat handler refuses with a
    /// configuration error before reaching the backend.
    pub fn from_config(config: ServerConfig) -> Self {
        let mut client = OpenAiClient::new(config.api_key.clone().unwrap_or_default());
        if let Some(base) = &config.base_url {
            client = client.with_base(base.clone());
        }

        Self {
            config,
            backend: Arc::new(client),
            store: Arc::new(MemoryStore::new()),
        }
    }

    /// Assemble a state from parts; used by tests to inject a scripted
    /// backend or store.
    pub fn with_backend(
        config: ServerConfig,
        backend: Arc<dyn CompletionBackend>,
        store: Arc<dyn ContextStore>,
    ) -> Self {
        Self {
            config,
            backend,
            store,
        }
    }
}
