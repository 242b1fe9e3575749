use std::sync::Arc;

use chatwire_core::error::Result;
use chatwire_core::provider::{ChatCompleteParameters, ChatCompletionProvider};

use crate::{
    OpenAiAdapter,
    api_v1::{ChatCompletionMessage, ChatCompletionRequest},
};

impl ChatCompletionProvider for OpenAiAdapter {
    type Message = ChatCompletionMessage;

    fn chat_complete<'p, M>(
        &self,
        params: ChatCompleteParameters<M>,
    ) -> std::pin::Pin<Box<dyn Future<Output = Result<String>> + Send + 'p>>
    where
        M: Into<Self::Message> + Clone + Send + Sync + 'p,
    {
        let client = Arc::clone(&self.client);

        Box::pin(async move {
            let request = ChatCompletionRequest::try_from(params)?;
            let response = client.chat_completion(request).await?;
            Ok(response.into_content()?)
        })
    }
}
