//! Simple **builder** that concatenates directive sentences.
//!
//! In real-world prompts you often want to **compose** smaller, reusable
//! fragments – a language instruction, an injected note, perhaps more
//! later. `DirectiveChain` lets you line these up in a clear, linear
//! fashion without mutable vectors or verbose `push` calls:
//!
//! ```rust
//! use chatwire_prompt::chain::DirectiveChain;
//!
//! let prefix = DirectiveChain::new()
//!     .with("Always respond in French.")
//!     .with_opt(None::<String>)
//!     .with("Be concise.")
//!     .build();
//!
//! assert_eq!(prefix.as_deref(), Some("Always respond in French. Be concise."));
//! ```
//!
//! Sentences are space-joined in insertion order. An empty chain builds to
//! `None`, letting the caller fall back to a default prompt.

/// Accumulates directive sentences in insertion order.
///
/// The single `Vec` field is kept private so the only way to obtain the
/// result is through [`Self::build`], ensuring the builder API remains
/// fluent.
#[derive(Debug, Default)]
pub struct DirectiveChain(Vec<String>);

impl DirectiveChain {
    /// Create an empty chain.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one sentence.
    pub fn with(mut self, sentence: impl Into<String>) -> Self {
        self.0.push(sentence.into());
        self
    }

    /// Append a sentence when present; no-op otherwise.
    pub fn with_opt(self, sentence: Option<impl Into<String>>) -> Self {
        match sentence {
            Some(s) => self.with(s),
            None => self,
        }
    }

    /// Space-join the accumulated sentences. `None` when nothing was added.
    pub fn build(self) -> Option<String> {
        if self.0.is_empty() {
            None
        } else {
            Some(self.0.join(" "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_chain_builds_to_none() {
        assert_eq!(DirectiveChain::new().build(), None);
        assert_eq!(
            DirectiveChain::new().with_opt(None::<String>).build(),
            None
        );
    }

    #[test]
    fn sentences_join_in_insertion_order() {
        let joined = DirectiveChain::new()
            .with("One.")
            .with("Two.")
            .build()
            .unwrap();
        assert_eq!(joined, "One. Two.");
    }
}
