//! End-to-end walkthrough against the live service.
//!
//! Discovers the organization, lists its conversations, opens a new one and
//! streams a reply to stdout.
//!
//! ```text
//! CLAUDE_WEB_SESSION_KEY='sessionKey=...' \
//!     cargo run -p claude-web-infrastructure --example walkthrough -- "Hello!" [file.pdf]
//! ```
//!
//! Set `RUST_LOG=claude_web_infrastructure=debug` to see every request.

use anyhow::{Context, bail};
use claude_web_application::{ChatClient, ChatGateway};
use claude_web_domain::DEFAULT_CONVERSATION_NAME;
use claude_web_infrastructure::{ClaudeWebGateway, ConfigLoader};
use futures::StreamExt;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

const SLOT: u64 = 0;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut args = std::env::args().skip(1);
    let message = args.next().unwrap_or_else(|| "Hello!".to_string());
    let upload = args.next().map(PathBuf::from);

    let config = ConfigLoader::load(None).map_err(|e| anyhow::anyhow!("{}", e))?;
    let issues = config.validate();
    if !issues.is_empty() {
        for issue in &issues {
            eprintln!("config: {}", issue);
        }
        bail!("invalid configuration");
    }

    let gateway = ClaudeWebGateway::new(&config)?;
    let client = ChatClient::new(Arc::new(gateway)).with_options(config.completion_options());

    let organization = client.organization_id().await?;
    println!("organization: {}", organization);

    let conversations = client
        .gateway()
        .list_conversations(&organization)
        .await
        .context("listing conversations")?;
    println!("{} existing conversations", conversations.len());
    for conversation in conversations.iter().take(5) {
        println!(
            "  {} {}",
            conversation.uuid,
            conversation.name.as_deref().unwrap_or("")
        );
    }

    let conversation = client
        .open_conversation(SLOT, DEFAULT_CONVERSATION_NAME)
        .await?;
    let history = client
        .gateway()
        .get_conversation(&organization, &conversation)
        .await?;
    println!("opened {}: {}", conversation, history);

    let mut attachments = Vec::new();
    if let Some(path) = upload {
        let attachment = client
            .gateway()
            .upload_document(&organization, &path)
            .await
            .with_context(|| format!("uploading {}", path.display()))?;
        println!(
            "uploaded {} ({} bytes extracted)",
            attachment.file_name,
            attachment.extracted_content.len()
        );
        attachments.push(attachment);
    }

    let mut stream = client
        .ask_with_attachments(SLOT, &message, attachments)
        .await?;
    let mut stdout = std::io::stdout();
    while let Some(fragment) = stream.next().await {
        writeln!(stdout, "{}", fragment?)?;
    }

    Ok(())
}
