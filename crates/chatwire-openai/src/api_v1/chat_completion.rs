use chatwire_core::chat::{ChatMessage, ChatRole};
use chatwire_core::error::RelayError;
use chatwire_core::provider::ChatCompleteParameters;
use serde::{Deserialize, Serialize};

use crate::error::OpenAiError;
use crate::impl_builder_methods;
use crate::model_map::map_model;

use super::common::Usage;

/// Request payload for `POST /v1/chat/completions`.
///
/// Optional knobs are skipped during serialization when unset, matching
/// what OpenAI-compatible gateways expect.
#[derive(Debug, Serialize, Clone)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatCompletionMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream: Option<bool>,
}

impl ChatCompletionRequest {
    pub fn new(model: String, messages: Vec<ChatCompletionMessage>) -> Self {
        Self {
            model,
            messages,
            temperature: None,
            max_tokens: None,
            stream: None,
        }
    }
}

impl_builder_methods!(
    ChatCompletionRequest,
    temperature: f64,
    max_tokens: i64,
    stream: bool
);

impl<M> TryFrom<ChatCompleteParameters<M>> for ChatCompletionRequest
where
    M: Into<ChatCompletionMessage> + Clone,
{
    type Error = RelayError;

    fn try_from(value: ChatCompleteParameters<M>) -> Result<Self, Self::Error> {
        let model = map_model(&value.model)
            .ok_or(RelayError::Validation(format!(
                "backend does not support selected model: {:?}",
                value.model
            )))?
            .into_owned();

        Ok(Self {
            model,
            temperature: value.temperature,
            max_tokens: value.max_tokens,
            stream: None,
            messages: value.into_messages().into_iter().map(Into::into).collect(),
        })
    }
}

/// Roles accepted by the wire format.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ChatCompletionMessage {
    pub role: MessageRole,
    pub content: String,
}

impl From<ChatRole> for MessageRole {
    fn from(value: ChatRole) -> Self {
        match value {
            ChatRole::System => MessageRole::System,
            ChatRole::User => MessageRole::User,
            ChatRole::Assistant => MessageRole::Assistant,
        }
    }
}

impl From<MessageRole> for ChatRole {
    fn from(value: MessageRole) -> Self {
        match value {
            MessageRole::System => ChatRole::System,
            MessageRole::User => ChatRole::User,
            MessageRole::Assistant => ChatRole::Assistant,
        }
    }
}

impl From<ChatMessage> for ChatCompletionMessage {
    fn from(value: ChatMessage) -> Self {
        Self {
            role: value.role.into(),
            content: value.content,
        }
    }
}

/// Assistant message as it appears in a non-streaming response.
#[derive(Debug, Deserialize, Clone)]
pub struct ChatCompletionMessageForResponse {
    pub role: MessageRole,
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ChatCompletionChoice {
    pub index: i64,
    pub message: ChatCompletionMessageForResponse,
    pub finish_reason: Option<FinishReason>,
}

/// Complete (non-streaming) response envelope.
///
/// Only `choices` is load-bearing; the bookkeeping fields are optional so
/// that OpenAI-compatible gateways with thinner envelopes still parse.
#[derive(Debug, Deserialize)]
pub struct ChatCompletionResponse {
    pub id: Option<String>,
    pub object: Option<String>,
    pub created: Option<i64>,
    pub model: Option<String>,
    pub choices: Vec<ChatCompletionChoice>,
    pub usage: Option<Usage>,
}

impl ChatCompletionResponse {
    /// Extract the generated text from the first choice.
    ///
    /// # Errors
    ///
    /// [`OpenAiError::Format`] when the response carries no choices or the
    /// first choice has no content – an upstream-shape problem, distinct
    /// from any transport failure.
    pub fn into_content(self) -> Result<String, OpenAiError> {
        let Some(first) = self.choices.into_iter().next() else {
            return Err(OpenAiError::Format("response has no choices".into()));
        };
        first
            .message
            .content
            .ok_or_else(|| OpenAiError::Format("first choice has no content".into()))
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    Stop,
    Length,
    ContentFilter,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatwire_core::model::Model;

    #[test]
    fn request_serialization_skips_unset_options() {
        let request = ChatCompletionRequest::new(
            "gpt-4o-mini".into(),
            vec![ChatCompletionMessage {
                role: MessageRole::User,
                content: "Hi".into(),
            }],
        );
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(value["model"], "gpt-4o-mini");
        assert_eq!(value["messages"][0]["role"], "user");
        assert_eq!(value["messages"][0]["content"], "Hi");
        assert!(value.get("temperature").is_none());
        assert!(value.get("max_tokens").is_none());
        assert!(value.get("stream").is_none());
    }

    #[test]
    fn request_serialization_includes_set_options() {
        let request = ChatCompletionRequest::new("m".into(), vec![])
            .temperature(0.7)
            .max_tokens(1024)
            .stream(true);
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(value["temperature"], 0.7);
        assert_eq!(value["max_tokens"], 1024);
        assert_eq!(value["stream"], true);
    }

    #[test]
    fn parameters_convert_into_request() {
        let params = ChatCompleteParameters::new(
            vec![ChatMessage::user("Hi")],
            Model::parse("gpt-4o-mini"),
        )
        .with_temperature(0.2)
        .with_max_tokens(64);

        let request = ChatCompletionRequest::try_from(params).unwrap();
        assert_eq!(request.model, "gpt-4o-mini");
        assert_eq!(request.temperature, Some(0.2));
        assert_eq!(request.max_tokens, Some(64));
        assert_eq!(request.messages.len(), 1);
    }

    #[test]
    fn minimal_response_envelope_parses() {
        let raw = r#"{"choices":[{"index":0,"message":{"role":"assistant","content":"Hello"},"finish_reason":"stop"}]}"#;
        let response: ChatCompletionResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(response.into_content().unwrap(), "Hello");
    }

    #[test]
    fn empty_choices_is_a_format_error() {
        let raw = r#"{"id":"x","choices":[]}"#;
        let response: ChatCompletionResponse = serde_json::from_str(raw).unwrap();
        assert!(matches!(
            response.into_content(),
            Err(OpenAiError::Format(_))
        ));
    }
}
