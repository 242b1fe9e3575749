//! # `chatwire-prompt` – request-scoped prompt preferences
//!
//! The relay lets a browser set a couple of cookies that tune the system
//! prompt of every subsequent chat request: a target language and a free
//! form note. This crate is the *consuming* side of that contract:
//!
//! * [`cookies`] – parsing one `Cookie` request header, percent-decoding
//!   included,
//! * [`preferences::PreferenceBundle`] – the extracted directives,
//! * [`chain::DirectiveChain`] – joins rendered directive sentences into
//!   the final system-prompt prefix.
//!
//! Extraction is pure: the same header string always yields the same
//! bundle, nothing is stored, and cookies with unknown names are ignored.
//! The *setting* side lives in the server crate and must agree on the
//! cookie names and encoding exported here.

pub mod chain;
pub mod cookies;
pub mod preferences;

pub use preferences::{DEFAULT_SYSTEM_PROMPT, PreferenceBundle};
