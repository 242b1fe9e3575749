use std::pin::Pin;

use crate::OpenAiAdapter;
use crate::api_v1::ChatCompletionRequest;
use chatwire_core::error::{RelayError, Result};
use chatwire_core::provider::{ChatCompleteParameters, StreamingChatProvider};
use futures_core::stream::Stream;

impl StreamingChatProvider for OpenAiAdapter {
    type Delta<'s>
        = Pin<Box<dyn Stream<Item = Result<String>> + Send + 's>>
    where
        Self: 's;

    fn chat_complete_stream<'p, M>(&'p self, params: ChatCompleteParameters<M>) -> Self::Delta<'p>
    where
        M: Into<Self::Message> + Clone + Send + Sync + 'p,
    {
        let client = self.client.clone();

        Box::pin(async_stream::try_stream! {
            use futures_util::StreamExt;

            let request = ChatCompletionRequest::try_from(params)?;

            let stream = client.chat_completion_stream(request);
            futures_util::pin_mut!(stream);

            while let Some(chunk) = stream.next().await {
                let chunk = chunk.map_err(RelayError::from)?;
                // Only the first choice carries the conversation; deltas
                // for other indices are not requested and are ignored.
                if let Some(choice) = chunk.choices.into_iter().next()
                    && let Some(text) = choice.delta.content
                    && !text.is_empty()
                {
                    yield text;
                }
            }
        })
    }
}
