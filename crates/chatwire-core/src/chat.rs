//! Chat message and conversation types used across the *chatwire* workspace.
//!
//! They deliberately mirror the concepts exposed by OpenAI-compatible chat
//! APIs: "system", "user" and "assistant" messages in conversation order.
//! By staying minimal we can:
//!
//! * convert them into provider-specific structs via a simple `From`/`Into`,
//! * serialize them without pulling in heavyweight dependencies, and
//! * use them in unit tests without mocking a full transport layer.
//!
//! The interesting part is [`Conversation`]: an append-only transcript whose
//! **trailing assistant message grows in place** while a completion streams.
//! Every turn is fenced by a [`TurnToken`] so that a stale or superseded
//! stream can never write into a newer turn – the token carries the
//! generation it was issued for, and deltas from older generations are
//! dropped on the floor.

use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Chat roles recognised by OpenAI-compatible providers.
///
/// The `Display` implementation renders the canonical lowercase name so you
/// can feed it directly into JSON without extra mapping logic.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ChatRole {
    /// "System" messages define global behaviour and style guidelines.
    System,
    /// Messages originating from the human user.
    User,
    /// Messages produced by the assistant / model.
    Assistant,
}

impl Display for ChatRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChatRole::System => write!(f, "system"),
            ChatRole::User => write!(f, "user"),
            ChatRole::Assistant => write!(f, "assistant"),
        }
    }
}

/// A single chat message in conversation order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    /// Convenience constructor mirroring the field order used by the wire
    /// format (`role`, then `content`).
    pub fn new(role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Shorthand for a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(ChatRole::System, content)
    }

    /// Shorthand for a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(ChatRole::User, content)
    }

    /// Shorthand for an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(ChatRole::Assistant, content)
    }
}

/// Opaque handle identifying one streaming turn of a [`Conversation`].
///
/// Issued by [`Conversation::begin_assistant`]; all mutating stream
/// operations take it by reference. A token from a superseded turn is
/// silently ignored, which is what makes duplicate or zombie streams
/// harmless.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnToken {
    generation: u64,
}

/// Ordered transcript of a chat session.
///
/// Append-only, except that the trailing assistant message is *replaced*
/// (not mutated through shared structure) as deltas arrive. The transcript
/// lives exactly as long as its owner; there is no persistence.
#[derive(Debug, Clone, Default)]
pub struct Conversation {
    messages: Vec<ChatMessage>,
    generation: u64,
    streaming: bool,
}

impl Conversation {
    /// Create an empty transcript.
    pub fn new() -> Self {
        Self::default()
    }

    /// All messages in conversation order.
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// The trailing message, if any.
    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    /// Whether a turn is currently receiving deltas.
    pub fn is_streaming(&self) -> bool {
        self.streaming
    }

    /// Append a message verbatim. Refused while a turn is streaming so the
    /// trailing assistant message stays the single write target.
    pub fn push(&mut self, message: ChatMessage) -> bool {
        if self.streaming {
            return false;
        }
        self.messages.push(message);
        true
    }

    /// Append a user message.
    pub fn push_user(&mut self, content: impl Into<String>) -> bool {
        self.push(ChatMessage::user(content))
    }

    /// Open a new assistant turn: appends an empty assistant placeholder and
    /// returns the token guarding it. Returns `None` when a turn is already
    /// in flight – at most one completion request may write at a time.
    pub fn begin_assistant(&mut self) -> Option<TurnToken> {
        if self.streaming {
            return None;
        }
        self.generation += 1;
        self.streaming = true;
        self.messages.push(ChatMessage::assistant(""));
        Some(TurnToken {
            generation: self.generation,
        })
    }

    /// Fold one delta fragment into the trailing assistant message.
    ///
    /// The tail is replaced wholesale rather than patched through shared
    /// structure, so observers holding a previous snapshot never see a
    /// half-applied update. Returns `false` (and drops the fragment) when
    /// the token is stale or no trailing assistant message exists.
    pub fn apply_delta(&mut self, token: &TurnToken, fragment: &str) -> bool {
        if !self.is_current(token) {
            return false;
        }
        let Some(last) = self.messages.last() else {
            return false;
        };
        if last.role != ChatRole::Assistant {
            return false;
        }
        let mut grown = last.clone();
        grown.content.push_str(fragment);
        let tail = self.messages.len() - 1;
        self.messages[tail] = grown;
        true
    }

    /// Seal the current turn. The trailing assistant message becomes
    /// immutable until the next [`Self::begin_assistant`].
    pub fn finish(&mut self, token: &TurnToken) {
        if self.is_current(token) {
            self.streaming = false;
        }
    }

    /// Abort the current turn after a terminal stream error: a zero-length
    /// placeholder is removed, and a synthetic assistant message carrying
    /// the error detail is appended in its place.
    pub fn fail(&mut self, token: &TurnToken, detail: impl Display) {
        if !self.is_current(token) {
            return;
        }
        if matches!(self.messages.last(), Some(m) if m.role == ChatRole::Assistant && m.content.is_empty())
        {
            self.messages.pop();
        }
        self.messages.push(ChatMessage::assistant(format!("Error: {detail}")));
        self.streaming = false;
    }

    /// Drop the whole transcript and invalidate every outstanding token.
    pub fn reset(&mut self) {
        self.messages.clear();
        self.generation += 1;
        self.streaming = false;
    }

    fn is_current(&self, token: &TurnToken) -> bool {
        self.streaming && token.generation == self.generation
    }
}
