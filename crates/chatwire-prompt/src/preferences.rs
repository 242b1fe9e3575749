//! Per-request preference extraction and system-prefix rendering.
//!
//! The browser opts into directives by setting well-known cookies; every
//! relay request re-reads them from the `Cookie` header and rewrites the
//! system prompt accordingly. Nothing is persisted server-side – the
//! bundle lives for exactly one request.

use chatwire_core::chat::ChatMessage;

use crate::chain::DirectiveChain;
use crate::cookies::cookie_value;

/// Cookie carrying the target reply language.
pub const TRANSLATE_LANG_COOKIE: &str = "translateLang";

/// Cookie carrying a free-form note injected into the system prompt.
pub const INJECTED_NOTE_COOKIE: &str = "injectedNote";

/// System prompt used when no directive cookie is present.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful, concise assistant.";

/// Optional directives extracted from one request's cookies.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreferenceBundle {
    pub translate_language: Option<String>,
    pub injected_note: Option<String>,
}

impl PreferenceBundle {
    /// Extract the known directives from a raw `Cookie` header, if one was
    /// sent at all. Unknown cookies are ignored; values are
    /// percent-decoded.
    pub fn from_cookie_header(header: Option<&str>) -> Self {
        let Some(header) = header else {
            return Self::default();
        };
        Self {
            translate_language: cookie_value(header, TRANSLATE_LANG_COOKIE),
            injected_note: cookie_value(header, INJECTED_NOTE_COOKIE),
        }
    }

    /// Whether any directive is set.
    pub fn is_empty(&self) -> bool {
        self.translate_language.is_none() && self.injected_note.is_none()
    }

    /// Render the system-prompt prefix: the present directives as
    /// natural-language sentences, space-joined, or the fixed default when
    /// none is set.
    pub fn system_prefix(&self) -> String {
        DirectiveChain::new()
            .with_opt(self.translate_language.as_deref().map(|lang| {
                format!(
                    "Always respond in {lang}, regardless of the language the user writes in."
                )
            }))
            .with_opt(
                self.injected_note
                    .as_deref()
                    .map(|note| format!("Keep the following note in mind: {note}")),
            )
            .build()
            .unwrap_or_else(|| DEFAULT_SYSTEM_PROMPT.to_owned())
    }

    /// The rendered prefix as a ready-to-send system message.
    pub fn system_message(&self) -> ChatMessage {
        ChatMessage::system(self.system_prefix())
    }
}
