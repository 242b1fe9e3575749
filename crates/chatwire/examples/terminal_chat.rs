//! # Streaming Chat – Real-time Example
//!
//! Talks to the configured OpenAI-compatible endpoint directly (no relay
//! in between) and renders the assistant's reply as the deltas arrive –
//! the same incremental experience the browser gets through the relay.
//!
//! ```bash
//! export OPENAI_API_KEY=sk-…          # mandatory
//! export OPENAI_BASE_URL=…            # optional, e.g. a local gateway
//! cargo run -p chatwire --example terminal_chat
//! ```
//!
//! You should see the reply appear fragment by fragment.

use chatwire::model::Model;
use chatwire::openai::OpenAiAdapterBuilder;
use chatwire::provider::{ChatCompleteParameters, StreamingChatProvider as _};
use chatwire::{ChatMessage, ChatRole};
use futures_util::StreamExt;
use std::io::{self, Write};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Spin up the backend (needs `OPENAI_API_KEY` in the env).
    let backend = OpenAiAdapterBuilder::new_from_env().build()?;

    // 2. A tiny conversation.
    let messages = vec![
        ChatMessage::new(
            ChatRole::System,
            "You are a real-time narrator. Respond sentence by sentence.",
        ),
        ChatMessage::new(
            ChatRole::User,
            "Tell me a short story about a crab learning to stream.",
        ),
    ];

    // 3. Bundle messages + model, kick off the streaming request.
    let params = ChatCompleteParameters::new(messages, Model::parse("gpt-4o-mini"))
        .with_temperature(0.7)
        .with_max_tokens(512);
    let mut stream = backend.chat_complete_stream(params);

    // 4. Render the output as it flows in.
    print!("Assistant: ");
    io::stdout().flush().ok();

    while let Some(chunk) = stream.next().await {
        match chunk {
            Ok(text) => {
                print!("{text}");
                io::stdout().flush().ok();
            }
            Err(err) => {
                eprintln!("\nstream error: {err}");
                break;
            }
        }
    }
    println!();

    Ok(())
}
