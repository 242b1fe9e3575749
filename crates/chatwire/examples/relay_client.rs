//! # Relay Client – the browser-side protocol, in Rust
//!
//! Exercises a running `chatwire-server` the way the chat UI does:
//!
//! 1. `POST /api/chat` with the conversation so far,
//! 2. consume the SSE byte stream through
//!    [`fragment_stream`](chatwire::sse::fragment_stream),
//! 3. fold each fragment into the trailing assistant message of a
//!    [`Conversation`](chatwire::Conversation).
//!
//! ```bash
//! cargo run -p chatwire-server &            # relay on :8080
//! cargo run -p chatwire --example relay_client
//! ```

use chatwire::Conversation;
use futures_util::StreamExt;
use std::io::{self, Write};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let relay_url =
        std::env::var("RELAY_URL").unwrap_or_else(|_| "http://127.0.0.1:8080/api/chat".into());

    let mut conversation = Conversation::new();
    conversation.push_user("Hi! In one sentence, what do you do?");

    let response = reqwest::Client::new()
        .post(&relay_url)
        // Preferences travel as cookies; try `translateLang=Fran%C3%A7ais`.
        .header("cookie", "translateLang=English")
        .json(&serde_json::json!({ "messages": conversation.messages() }))
        .send()
        .await?;

    if !response.status().is_success() {
        anyhow::bail!(
            "relay answered {}: {}",
            response.status(),
            response.text().await.unwrap_or_default()
        );
    }

    let token = conversation
        .begin_assistant()
        .expect("fresh conversation has no turn in flight");

    let fragments = chatwire::sse::fragment_stream(response.bytes_stream());
    let mut fragments = std::pin::pin!(fragments);

    print!("Assistant: ");
    io::stdout().flush().ok();

    while let Some(item) = fragments.next().await {
        match item {
            Ok(fragment) => {
                print!("{fragment}");
                io::stdout().flush().ok();
                conversation.apply_delta(&token, &fragment);
            }
            Err(err) => {
                conversation.fail(&token, &err);
                break;
            }
        }
    }
    conversation.finish(&token);
    println!();

    Ok(())
}
