//! Relay server between a browser chat UI and an OpenAI-compatible
//! completion endpoint.
//!
//! * `POST /api/chat` – forwards a chat history upstream and returns either
//!   the untouched SSE byte stream or a single JSON envelope.
//! * `POST /api/preferences` – sets the cookies the preference extractor
//!   consumes on subsequent chat requests.
//! * `GET`/`PUT /api/context/{key}` – small string store for auxiliary
//!   actions, backed by an injected [`chatwire_core::store::ContextStore`].
//!
//! ## Configuration (environment variables)
//!
//! | Variable          | Default                      |
//! |-------------------|------------------------------|
//! | `LISTEN_ADDR`     | `0.0.0.0:8080`               |
//! | `OPENAI_API_KEY`  | *(unset – chat requests fail with a 500)* |
//! | `OPENAI_BASE_URL` | `https://api.openai.com/v1`  |
//! | `CHAT_MODEL`      | `gpt-4o-mini`                |
//!
//! The credential is checked per request, not at startup, so the process
//! comes up (and serves preferences/context) even when the key is absent.

use std::sync::Arc;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod app;
mod config;
mod error;
mod handlers;
mod state;

use config::ServerConfig;
use state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = ServerConfig::from_env();
    if config.api_key.is_none() {
        warn!("OPENAI_API_KEY is not set; chat requests will be refused with a configuration error");
    }

    let listen_addr = config.listen_addr;
    let state = Arc::new(AppState::from_config(config));

    let listener = tokio::net::TcpListener::bind(listen_addr).await?;
    info!("relay listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app::router(state)).await?;
    Ok(())
}
