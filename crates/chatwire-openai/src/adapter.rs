use std::{env, sync::Arc};

use chatwire_core::error::{RelayError, Result};

use crate::client::OpenAiClient;

/// Environment variable holding the bearer credential.
pub const API_KEY_VAR: &str = "OPENAI_API_KEY";

/// Environment variable overriding the completion endpoint base URL.
pub const BASE_URL_VAR: &str = "OPENAI_BASE_URL";

/// Thin wrapper that wires the HTTP client [`OpenAiClient`] into a value
/// implementing the `chatwire-core` provider traits.
///
/// * stores the API key and optional custom base URL,
/// * owns a shareable, connection-pooled `reqwest::Client`,
/// * provides a fluent [`OpenAiAdapterBuilder`] so callers don't have to
///   juggle `Option<String>` manually.
#[derive(Debug)]
pub struct OpenAiAdapter {
    pub(crate) client: Arc<OpenAiClient>,
}

impl OpenAiAdapter {
    /// Access the underlying HTTP client, e.g. for raw byte-level use by
    /// the relay endpoint.
    pub fn client(&self) -> &OpenAiClient {
        &self.client
    }
}

/// Builder for [`OpenAiAdapter`].
///
/// # Typical usage
///
/// ```rust,no_run
/// use chatwire_openai::OpenAiAdapterBuilder;
///
/// let backend = OpenAiAdapterBuilder::new_from_env()
///     .build()
///     .expect("OPENAI_API_KEY must be set");
/// ```
#[derive(Default)]
pub struct OpenAiAdapterBuilder {
    pub(crate) api_key: Option<String>,
    pub(crate) base_url: Option<String>,
}

impl OpenAiAdapterBuilder {
    /// Create an *empty* builder. Remember to supply an API key manually.
    pub fn new() -> Self {
        Self::default()
    }

    /// Convenience constructor that loads `OPENAI_API_KEY` and
    /// `OPENAI_BASE_URL` from the environment.
    ///
    /// Never panics – a missing key only surfaces during [`Self::build`].
    pub fn new_from_env() -> Self {
        Self {
            api_key: env::var(API_KEY_VAR).ok(),
            base_url: env::var(BASE_URL_VAR).ok(),
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Finalise the builder and return a ready-to-use adapter.
    ///
    /// # Errors
    ///
    /// * [`RelayError::Configuration`] – if the API key is missing. No
    ///   upstream call is ever attempted without it.
    pub fn build(self) -> Result<OpenAiAdapter> {
        let api_key = self.api_key.ok_or(RelayError::Configuration(format!(
            "missing env variable: `{API_KEY_VAR}`"
        )))?;

        let http = reqwest::Client::builder()
            .connect_timeout(std::time::Duration::from_secs(10))
            .build()
            .expect("building reqwest client");

        Ok(OpenAiAdapter {
            client: Arc::new(OpenAiClient::with_http(api_key, http, self.base_url)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_without_key_is_a_configuration_error() {
        let err = OpenAiAdapterBuilder::new().build().unwrap_err();
        assert!(matches!(err, RelayError::Configuration(_)));
    }

    #[test]
    fn build_with_key_succeeds() {
        let adapter = OpenAiAdapterBuilder::new()
            .with_api_key("sk-test")
            .with_base_url("http://127.0.0.1:1234/v1")
            .build();
        assert!(adapter.is_ok());
    }
}
