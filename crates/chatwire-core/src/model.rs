//! Model identifiers used throughout the **chatwire** workspace.
//!
//! The enum keeps the public API simple while letting each backend crate
//! map the variants onto its own naming scheme. Application code never has
//! to type literal strings such as `"gpt-4o-mini"` – pick an enum variant
//! and let the adapter translate it. Deployments that target self-hosted or
//! OpenAI-compatible gateways configure an arbitrary name via
//! [`Model::Named`], which backends pass through verbatim.

/// Universal identifier for an LLM model.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Model {
    /// Built-in OpenAI models (chat completion API).
    OpenAi(OpenAiModel),
    /// Arbitrary model name forwarded to the endpoint as-is. Use this for
    /// self-hosted or gateway-side models the enum does not cover.
    Named(String),
}

impl Model {
    /// Parse a configured model name, resolving the officially supported
    /// OpenAI names to their enum variants and passing everything else
    /// through as [`Model::Named`].
    pub fn parse(name: &str) -> Self {
        match name {
            "gpt-4o" => Model::OpenAi(OpenAiModel::Gpt4o),
            "gpt-4o-mini" => Model::OpenAi(OpenAiModel::Gpt4oMini),
            "gpt-5" => Model::OpenAi(OpenAiModel::Gpt5),
            "gpt-5-mini" => Model::OpenAi(OpenAiModel::Gpt5Mini),
            other => Model::Named(other.to_owned()),
        }
    }
}

/// Models **officially** supported by the OpenAI backend.
///
/// Keeping the list small avoids accidental typos while still allowing
/// arbitrary model names through [`Model::Named`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpenAiModel {
    Gpt5,
    Gpt5Mini,
    Gpt4o,
    Gpt4oMini,
}

impl From<OpenAiModel> for Model {
    fn from(val: OpenAiModel) -> Self {
        Model::OpenAi(val)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_resolves_known_names() {
        assert_eq!(Model::parse("gpt-4o-mini"), Model::OpenAi(OpenAiModel::Gpt4oMini));
        assert_eq!(
            Model::parse("llama-3.1-8b-instruct"),
            Model::Named("llama-3.1-8b-instruct".into())
        );
    }
}
