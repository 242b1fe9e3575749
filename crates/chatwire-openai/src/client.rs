use async_stream::try_stream;

use futures_core::Stream;
use futures_util::StreamExt;
use reqwest::{
    Client as HttpClient,
    header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue},
};
use std::time::Duration;

use chatwire_sse::decode::SseLineDecoder;
use chatwire_sse::fragments::{DATA_PREFIX, DONE_SENTINEL};

use crate::{
    api_v1::{ChatCompletionChunkResponse, ChatCompletionRequest, ChatCompletionResponse},
    error::OpenAiError,
};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Minimal HTTP client for an OpenAI-compatible *chat/completions* endpoint.
///
/// * One request ▶ one upstream attempt. No retries, no caching, no rate
///   limiting – resend policy belongs to whoever sits above.
/// * Base URL and bearer credential come from server-side configuration
///   only; they are never surfaced to callers.
/// * Shares a single `reqwest::Client`, so cloning `OpenAiClient` is cheap.
#[derive(Clone, Debug)]
pub struct OpenAiClient {
    api_key: String,
    http: HttpClient,
    base: String,
}

impl OpenAiClient {
    /// Convenience constructor building a default `reqwest` client:
    /// 10 s connect timeout, Rustls TLS. No total-request timeout – it
    /// would sever long-lived completion streams mid-flight.
    pub fn new(api_key: impl Into<String>) -> Self {
        let http = HttpClient::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()
            .expect("building reqwest client");

        Self::with_http(api_key, http, None)
    }

    /// Build with a custom `reqwest::Client` in case the caller needs proxy
    /// settings, custom TLS, etc., and/or a non-default base URL.
    pub fn with_http(
        api_key: impl Into<String>,
        http: HttpClient,
        base_url: Option<String>,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            http,
            base: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_owned()),
        }
    }

    /// Point the client at a non-default base URL (an OpenAI-compatible
    /// gateway, a local inference server, …).
    pub fn with_base(mut self, base_url: impl Into<String>) -> Self {
        self.base = base_url.into();
        self
    }

    fn bearer_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.api_key))
                .expect("bearer credential is a valid header value"),
        );
        headers
    }

    /// Perform a **non-streaming** chat completion.
    pub async fn chat_completion(
        &self,
        request: ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, OpenAiError> {
        let url = format!("{}/chat/completions", self.base);
        #[cfg(feature = "tracing")]
        tracing::debug!(model = %request.model, "dispatching chat completion");

        let resp = self
            .http
            .post(url)
            .headers(self.bearer_headers())
            .json(&request)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(OpenAiError::Api { status, body });
        }

        let bytes = resp.bytes().await?;
        let parsed: ChatCompletionResponse = serde_json::from_slice(&bytes)?;
        Ok(parsed)
    }

    /// Open a **streaming** chat completion and hand back the raw response.
    ///
    /// The streaming flag is enforced and the upstream status is checked;
    /// what remains is the untouched SSE byte stream, ready to be forwarded
    /// verbatim (the relay case) or parsed (see
    /// [`Self::chat_completion_stream`]).
    pub async fn chat_completion_raw(
        &self,
        mut request: ChatCompletionRequest,
    ) -> Result<reqwest::Response, OpenAiError> {
        request.stream = Some(true);

        let mut headers = self.bearer_headers();
        headers.insert(ACCEPT, HeaderValue::from_static("text/event-stream"));

        let url = format!("{}/chat/completions", self.base);
        #[cfg(feature = "tracing")]
        tracing::debug!(model = %request.model, "opening chat completion stream");

        let resp = self
            .http
            .post(url)
            .headers(headers)
            .json(&request)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(OpenAiError::Api { status, body });
        }

        Ok(resp)
    }

    /// Perform a **streaming** chat completion, parsed into typed chunks.
    ///
    /// Event lines that fail to parse are skipped – a malformed event is an
    /// upstream hiccup, not a reason to kill the stream. Transport errors
    /// terminate the stream with an `Err` item.
    pub fn chat_completion_stream(
        &self,
        request: ChatCompletionRequest,
    ) -> impl Stream<Item = Result<ChatCompletionChunkResponse, OpenAiError>> + '_ {
        try_stream! {
            let resp = self.chat_completion_raw(request).await?;

            let mut bytes_stream = resp.bytes_stream();
            let mut decoder = SseLineDecoder::new();

            while let Some(chunk) = bytes_stream.next().await {
                let chunk = chunk?;
                for line in decoder.push(&chunk) {
                    if let Some(parsed) = parse_chunk_line(&line) {
                        yield parsed;
                    }
                }
            }

            if let Some(tail) = decoder.finish()
                && let Some(parsed) = parse_chunk_line(&tail)
            {
                yield parsed;
            }
        }
    }
}

/// Decode one SSE line into a chunk payload, skipping everything that is
/// not a well-formed `data: ` event (blanks, `[DONE]`, malformed JSON).
fn parse_chunk_line(line: &str) -> Option<ChatCompletionChunkResponse> {
    let data = line.strip_prefix(DATA_PREFIX)?.trim();
    if data == DONE_SENTINEL {
        return None;
    }
    serde_json::from_str(data).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunk_line_parses_and_filters() {
        let parsed =
            parse_chunk_line(r#"data: {"choices":[{"index":0,"delta":{"content":"Hi"}}]}"#)
                .unwrap();
        assert_eq!(parsed.choices[0].delta.content.as_deref(), Some("Hi"));

        assert!(parse_chunk_line("").is_none());
        assert!(parse_chunk_line("data: [DONE]").is_none());
        assert!(parse_chunk_line("data: {malformed").is_none());
        assert!(parse_chunk_line("event: ping").is_none());
    }
}
