//! The relay endpoint: `POST /api/chat`.
//!
//! Per request: validate the body, synthesize the system message from the
//! cookie-derived preferences, check the credential, make **one** upstream
//! attempt, and hand the result back – as the untouched SSE byte stream
//! (default) or as a single `{ "content": … }` envelope when the caller
//! opts out of streaming.
//!
//! The full message history is always forwarded upstream; dropping prior
//! turns would silently lose conversation context.

use std::sync::Arc;

use axum::Json;
use axum::body::{Body, Bytes};
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use chatwire_core::chat::ChatMessage;
use chatwire_core::error::RelayError;
use chatwire_core::provider::ChatCompleteParameters;
use chatwire_openai::api_v1::ChatCompletionRequest;
use chatwire_prompt::PreferenceBundle;

use crate::error::ApiError;
use crate::state::{AppState, UpstreamByteStream};

/// Incoming request body. `messages` is the primary form; a bare `prompt`
/// string is accepted as a fallback and becomes a single user message.
#[derive(Debug, Deserialize)]
pub struct ChatRequestBody {
    #[serde(default)]
    messages: Option<Vec<ChatMessage>>,
    #[serde(default)]
    prompt: Option<String>,
    #[serde(default)]
    stream: Option<bool>,
}

impl ChatRequestBody {
    fn into_history(self) -> Result<Vec<ChatMessage>, RelayError> {
        if let Some(messages) = self.messages {
            if messages.is_empty() {
                return Err(RelayError::Validation("`messages` must not be empty".into()));
            }
            return Ok(messages);
        }
        if let Some(prompt) = self.prompt
            && !prompt.trim().is_empty()
        {
            return Ok(vec![ChatMessage::user(prompt)]);
        }
        Err(RelayError::Validation(
            "request must carry `messages` or a non-empty `prompt`".into(),
        ))
    }
}

#[derive(Debug, Serialize)]
struct ChatReply {
    content: String,
}

pub async fn relay(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ApiError> {
    let request: ChatRequestBody = serde_json::from_slice(&body)
        .map_err(|err| RelayError::Validation(format!("malformed request body: {err}")))?;
    let wants_stream = request.stream.unwrap_or(true);
    let history = request.into_history()?;

    let cookie_header = headers.get(header::COOKIE).and_then(|v| v.to_str().ok());
    let bundle = PreferenceBundle::from_cookie_header(cookie_header);

    // Fail fast on missing credentials: a precondition problem, not a
    // transport one, and the backend must not be dialled.
    if state.config.api_key.is_none() {
        return Err(RelayError::Configuration(format!(
            "`{}` is not configured",
            chatwire_openai::API_KEY_VAR
        ))
        .into());
    }

    let mut messages = Vec::with_capacity(history.len() + 1);
    messages.push(bundle.system_message());
    messages.extend(history);

    let params = ChatCompleteParameters::new(messages, state.config.model.clone())
        .with_temperature(state.config.temperature)
        .with_max_tokens(state.config.max_tokens);
    let upstream_request = ChatCompletionRequest::try_from(params)?;

    if wants_stream {
        let stream = state.backend.open_stream(upstream_request.stream(true)).await?;
        Ok(event_stream_response(stream))
    } else {
        let response = state.backend.complete(upstream_request).await?;
        let content = response.into_content()?;
        Ok(Json(ChatReply { content }).into_response())
    }
}

/// Forward the upstream bytes verbatim, with SSE response headers.
fn event_stream_response(stream: UpstreamByteStream) -> Response {
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/event-stream")
        .header(header::CACHE_CONTROL, "no-cache")
        .header(header::CONNECTION, "keep-alive")
        .body(Body::from_stream(stream))
        .expect("building streaming response")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::router;
    use crate::config::ServerConfig;
    use crate::state::CompletionBackend;

    use async_trait::async_trait;
    use axum::http::Request;
    use chatwire_core::store::MemoryStore;
    use chatwire_openai::api_v1::{
        ChatCompletionChoice, ChatCompletionMessageForResponse, ChatCompletionResponse,
        FinishReason, MessageRole,
    };
    use chatwire_openai::error::OpenAiError;
    use futures_util::stream;
    use http_body_util::BodyExt;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tower::ServiceExt;

    enum Script {
        Content(&'static str),
        Fail {
            status: StatusCode,
            body: &'static str,
        },
        Stream(Vec<&'static [u8]>),
    }

    struct MockBackend {
        calls: AtomicUsize,
        captured: Mutex<Option<ChatCompletionRequest>>,
        script: Script,
    }

    impl MockBackend {
        fn new(script: Script) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                captured: Mutex::new(None),
                script,
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn captured(&self) -> Option<ChatCompletionRequest> {
            self.captured.lock().unwrap().clone()
        }

        fn record(&self, request: &ChatCompletionRequest) {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.captured.lock().unwrap() = Some(request.clone());
        }
    }

    #[async_trait]
    impl CompletionBackend for MockBackend {
        async fn complete(
            &self,
            request: ChatCompletionRequest,
        ) -> Result<ChatCompletionResponse, OpenAiError> {
            self.record(&request);
            match &self.script {
                Script::Content(text) => Ok(ChatCompletionResponse {
                    id: None,
                    object: None,
                    created: None,
                    model: None,
                    choices: vec![ChatCompletionChoice {
                        index: 0,
                        message: ChatCompletionMessageForResponse {
                            role: MessageRole::Assistant,
                            content: Some((*text).to_owned()),
                        },
                        finish_reason: Some(FinishReason::Stop),
                    }],
                    usage: None,
                }),
                Script::Fail { status, body } => Err(OpenAiError::Api {
                    status: *status,
                    body: (*body).to_owned(),
                }),
                Script::Stream(_) => panic!("non-streaming call against a stream script"),
            }
        }

        async fn open_stream(
            &self,
            request: ChatCompletionRequest,
        ) -> Result<crate::state::UpstreamByteStream, OpenAiError> {
            self.record(&request);
            match &self.script {
                Script::Stream(chunks) => {
                    let items: Vec<Result<Bytes, OpenAiError>> = chunks
                        .iter()
                        .copied()
                        .map(|c| Ok(Bytes::from_static(c)))
                        .collect();
                    Ok(Box::pin(stream::iter(items)))
                }
                Script::Fail { status, body } => Err(OpenAiError::Api {
                    status: *status,
                    body: (*body).to_owned(),
                }),
                Script::Content(_) => panic!("streaming call against a content script"),
            }
        }
    }

    fn test_router(api_key: Option<&str>, backend: Arc<MockBackend>) -> axum::Router {
        let state = AppState::with_backend(
            ServerConfig::for_tests(api_key),
            backend,
            Arc::new(MemoryStore::new()),
        );
        router(Arc::new(state))
    }

    fn chat_request(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/chat")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_owned()))
            .unwrap()
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn missing_messages_and_prompt_is_a_400() {
        let backend = MockBackend::new(Script::Content("unused"));
        let app = test_router(Some("sk-test"), backend.clone());

        let response = app.oneshot(chat_request("{}")).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert!(json["error"].is_string());
        assert_eq!(backend.calls(), 0);
    }

    #[tokio::test]
    async fn malformed_json_body_is_a_400() {
        let backend = MockBackend::new(Script::Content("unused"));
        let app = test_router(Some("sk-test"), backend.clone());

        let response = app.oneshot(chat_request("{not json")).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(backend.calls(), 0);
    }

    #[tokio::test]
    async fn missing_credential_fails_fast_without_dialling_upstream() {
        let backend = MockBackend::new(Script::Content("unused"));
        let app = test_router(None, backend.clone());

        let response = app
            .oneshot(chat_request(
                r#"{"messages":[{"role":"user","content":"Hi"}]}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        assert!(json["error"].as_str().unwrap().contains("OPENAI_API_KEY"));
        assert_eq!(backend.calls(), 0);
    }

    #[tokio::test]
    async fn upstream_failure_surfaces_status_and_body() {
        let backend = MockBackend::new(Script::Fail {
            status: StatusCode::TOO_MANY_REQUESTS,
            body: "rate limited",
        });
        let app = test_router(Some("sk-test"), backend.clone());

        let response = app
            .oneshot(chat_request(
                r#"{"messages":[{"role":"user","content":"Hi"}]}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let json = body_json(response).await;
        assert_eq!(json["status"], 429);
        assert_eq!(json["body"], "rate limited");
        assert_eq!(backend.calls(), 1);
    }

    #[tokio::test]
    async fn non_streaming_success_returns_content_envelope() {
        let backend = MockBackend::new(Script::Content("Hello there"));
        let app = test_router(Some("sk-test"), backend.clone());

        let response = app
            .oneshot(chat_request(
                r#"{"messages":[{"role":"user","content":"Hi"}],"stream":false}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/json"
        );
        let json = body_json(response).await;
        assert_eq!(json["content"], "Hello there");
    }

    #[tokio::test]
    async fn streaming_success_forwards_bytes_verbatim() {
        let chunks: Vec<&'static [u8]> = vec![
            b"data: {\"choices\":[{\"delta\":{\"content\":\"Hel\"}}]}\n\n",
            b"data: {\"choices\":[{\"delta\":{\"content\":\"lo\"}}]}\n\n",
            b"data: [DONE]\n\n",
        ];
        let expected: Vec<u8> = chunks.concat();
        let backend = MockBackend::new(Script::Stream(chunks));
        let app = test_router(Some("sk-test"), backend.clone());

        let response = app
            .oneshot(chat_request(
                r#"{"messages":[{"role":"user","content":"Hi"}]}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/event-stream");
        assert_eq!(response.headers()[header::CACHE_CONTROL], "no-cache");
        assert_eq!(response.headers()[header::CONNECTION], "keep-alive");

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(bytes.as_ref(), expected.as_slice());
    }

    #[tokio::test]
    async fn full_history_is_forwarded_with_a_leading_system_message() {
        let backend = MockBackend::new(Script::Stream(vec![b"data: [DONE]\n\n"]));
        let app = test_router(Some("sk-test"), backend.clone());

        let body = r#"{"messages":[
            {"role":"user","content":"Hi"},
            {"role":"assistant","content":"Hello!"},
            {"role":"user","content":"Tell me more"}
        ]}"#;
        app.oneshot(chat_request(body)).await.unwrap();

        let captured = backend.captured().unwrap();
        assert_eq!(captured.messages.len(), 4);
        assert_eq!(captured.messages[0].role, MessageRole::System);
        assert_eq!(
            captured.messages[0].content,
            chatwire_prompt::DEFAULT_SYSTEM_PROMPT
        );
        assert_eq!(captured.messages[3].content, "Tell me more");
        assert_eq!(captured.stream, Some(true));
        assert_eq!(captured.temperature, Some(crate::config::DEFAULT_TEMPERATURE));
        assert_eq!(captured.max_tokens, Some(crate::config::DEFAULT_MAX_TOKENS));
    }

    #[tokio::test]
    async fn cookie_directives_rewrite_the_system_message() {
        let backend = MockBackend::new(Script::Stream(vec![b"data: [DONE]\n\n"]));
        let app = test_router(Some("sk-test"), backend.clone());

        let request = Request::builder()
            .method("POST")
            .uri("/api/chat")
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::COOKIE, "translateLang=Fran%C3%A7ais")
            .body(Body::from(
                r#"{"messages":[{"role":"user","content":"Hi"}]}"#,
            ))
            .unwrap();
        app.oneshot(request).await.unwrap();

        let captured = backend.captured().unwrap();
        assert!(captured.messages[0].content.contains("Français"));
    }

    #[tokio::test]
    async fn bare_prompt_becomes_a_single_user_message() {
        let backend = MockBackend::new(Script::Stream(vec![b"data: [DONE]\n\n"]));
        let app = test_router(Some("sk-test"), backend.clone());

        app.oneshot(chat_request(r#"{"prompt":"Hi there"}"#))
            .await
            .unwrap();

        let captured = backend.captured().unwrap();
        assert_eq!(captured.messages.len(), 2);
        assert_eq!(captured.messages[1].role, MessageRole::User);
        assert_eq!(captured.messages[1].content, "Hi there");
    }
}
