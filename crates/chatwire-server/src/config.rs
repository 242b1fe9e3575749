//! Server configuration, read once at startup from the environment.

use std::env;
use std::net::{SocketAddr, ToSocketAddrs};

use chatwire_core::model::Model;

/// Sampling temperature sent with every completion request.
pub const DEFAULT_TEMPERATURE: f64 = 0.7;

/// Upper bound on generated tokens per completion.
pub const DEFAULT_MAX_TOKENS: i64 = 1024;

const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_MODEL: &str = "gpt-4o-mini";

#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address on which the relay listens.
    pub listen_addr: SocketAddr,
    /// Upstream bearer credential. `None` is tolerated at startup; each
    /// chat request then fails fast with a configuration error.
    pub api_key: Option<String>,
    /// Upstream base URL override; the client's default applies when unset.
    pub base_url: Option<String>,
    /// Model requested from the upstream endpoint.
    pub model: Model,
    pub temperature: f64,
    pub max_tokens: i64,
}

impl ServerConfig {
    /// Build a configuration from environment variables.
    ///
    /// * `LISTEN_ADDR` – default `"0.0.0.0:8080"`.
    /// * `OPENAI_API_KEY` – optional, checked per request.
    /// * `OPENAI_BASE_URL` – optional.
    /// * `CHAT_MODEL` – default `"gpt-4o-mini"`.
    pub fn from_env() -> Self {
        fn parse_socket_addr(s: &str) -> SocketAddr {
            s.to_socket_addrs()
                .expect("invalid LISTEN_ADDR")
                .next()
                .expect("LISTEN_ADDR resolved to no address")
        }

        let listen = env::var("LISTEN_ADDR").unwrap_or_else(|_| DEFAULT_LISTEN_ADDR.into());
        let model = env::var("CHAT_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.into());

        Self {
            listen_addr: parse_socket_addr(&listen),
            api_key: env::var(chatwire_openai::API_KEY_VAR).ok(),
            base_url: env::var(chatwire_openai::BASE_URL_VAR).ok(),
            model: Model::parse(&model),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    /// A configuration suitable for tests: no network identity, model and
    /// limits fixed.
    #[cfg(test)]
    pub fn for_tests(api_key: Option<&str>) -> Self {
        Self {
            listen_addr: ([127, 0, 0, 1], 0).into(),
            api_key: api_key.map(str::to_owned),
            base_url: None,
            model: Model::parse(DEFAULT_MODEL),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}
