//! # `chatwire-core` – shared foundation of the chatwire relay stack
//!
//! This crate holds everything the other workspace members agree on:
//!
//! * the chat **data model** ([`chat::ChatMessage`], [`chat::Conversation`]),
//! * the unified **error type** ([`error::RelayError`]),
//! * the **provider traits** a completion backend implements
//!   ([`provider::ChatCompletionProvider`], [`provider::StreamingChatProvider`]),
//! * logical **model identifiers** ([`model::Model`]),
//! * the injected **context store** capability ([`store::ContextStore`]).
//!
//! The crate is deliberately dependency-light: `serde` for the wire-adjacent
//! types, `thiserror` for the error enum, `futures-core` for the streaming
//! trait surface. Networking, SSE parsing and HTTP routing live in the
//! sibling crates.

pub mod chat;
pub mod error;
pub mod model;
pub mod provider;
pub mod store;

pub use chat::{ChatMessage, ChatRole, Conversation, TurnToken};
pub use error::{RelayError, Result};
pub use model::Model;
