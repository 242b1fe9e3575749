//! # `chatwire` – The umbrella crate
//!
//! This crate is a *one-stop import* that glues together the building-block
//! crates in the workspace:
//!
//! | Crate                 | What it provides                                                        |
//! |-----------------------|-------------------------------------------------------------------------|
//! | **`chatwire-core`**   | Chat data model, provider traits, unified errors, context-store seam    |
//! | **`chatwire-sse`**    | Incremental SSE decoding and the chat session assembler                 |
//! | **`chatwire-prompt`** | Cookie-derived preference directives and system-prompt composition      |
//! | **`chatwire-openai`** | HTTP client for OpenAI-compatible chat completions *(optional)*         |
//!
//! By default the crate re-exports **core**, **sse** and **prompt** so
//! downstream users stay provider-agnostic. Enabling the `openai` Cargo
//! feature (on by default) additionally re-exports the adapter crate so a
//! single dependency line is enough to access the whole stack.
//!
//! The relay HTTP server is a separate binary crate (`chatwire-server`);
//! this library surface is what that server – and anything else speaking
//! the same protocol – is built from.
//!
//! ## Quick example
//!
//! ```rust,no_run
//! use chatwire::model::Model;
//! use chatwire::openai::OpenAiAdapterBuilder;
//! use chatwire::sse::ChatSession;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//! let backend = OpenAiAdapterBuilder::new_from_env().build()?;
//! let mut session = ChatSession::new(Model::parse("gpt-4o-mini"))
//!     .with_system("You are a helpful, concise assistant.");
//!
//! let reply = session.send(&backend, "Say hello!").await?;
//! println!("{}", reply.content);
//! # Ok(())
//! # }
//! ```

pub use chatwire_core::*;
pub use chatwire_prompt as prompt;
pub use chatwire_sse as sse;

#[cfg(feature = "openai")]
pub use chatwire_openai as openai;
