use std::borrow::Cow;

use chatwire_core::model::{Model, OpenAiModel};

pub const GPT5: &str = "gpt-5";
pub const GPT5_MINI: &str = "gpt-5-mini";
pub const GPT4_O: &str = "gpt-4o";
pub const GPT4_O_MINI: &str = "gpt-4o-mini";

pub(crate) fn map_model(model: &Model) -> Option<Cow<'static, str>> {
    match model {
        Model::Named(custom) => Some(Cow::Owned(custom.clone())),
        Model::OpenAi(openai_model) => match openai_model {
            OpenAiModel::Gpt5 => Some(GPT5.into()),
            OpenAiModel::Gpt5Mini => Some(GPT5_MINI.into()),
            OpenAiModel::Gpt4o => Some(GPT4_O.into()),
            OpenAiModel::Gpt4oMini => Some(GPT4_O_MINI.into()),
        },
    }
}
