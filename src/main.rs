use anyhow::Context;
use carechat::ai::providers;
use carechat::config::AssistantConfig;
use carechat::document::{PlainTextExtractor, load_excerpt};
use carechat::resolver::Resolver;
use carechat::session::ChatSession;
use carechat::types::ChatMessage;
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

const HELP: &str = "Commands: /attach <path>, /detach, /help, /quit";

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("carechat=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_message(label: &str, msg: &ChatMessage) {
    match msg.display_time() {
        Some(time) => println!("[{time}] {label}: {}", msg.text),
        None => println!("{label}: {}", msg.text),
    }
}

fn prompt() -> anyhow::Result<()> {
    print!("> ");
    std::io::stdout().flush().context("Failed to flush stdout")
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine; settings may come from the real environment.
    let _ = dotenvy::dotenv();
    init_tracing();

    let config = AssistantConfig::from_env();
    let remote = providers::from_config(&config).context("Failed to initialize remote model")?;
    let resolver = Resolver::new(remote).with_timeout(config.timeout);
    let mut session = ChatSession::new(resolver);

    println!("Hospital assistant. {HELP}");
    prompt()?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("Failed to read input")? {
        let line = line.trim();
        match line.split_once(' ').map_or((line, ""), |(cmd, rest)| (cmd, rest.trim())) {
            ("/quit" | "/exit", _) => break,
            ("/help", _) => println!("{HELP}"),
            ("/detach", _) => match session.detach_document() {
                Some(_) => println!("(document removed)"),
                None => println!("(no document attached)"),
            },
            ("/attach", "") => println!("usage: /attach <path>"),
            ("/attach", path) => match load_excerpt(path, &PlainTextExtractor).await {
                Ok(excerpt) => {
                    println!("(attached {path})");
                    session.attach_document(excerpt);
                }
                Err(err) => {
                    tracing::warn!(path, error = %err, "could not attach document");
                    println!("(could not attach {path}: {err})");
                }
            },
            _ => {
                if !line.is_empty() {
                    println!("Assistant is typing...");
                }
                if let Some(reply) = session.send(line).await {
                    print_message("Assistant", &reply);
                }
            }
        }
        prompt()?;
    }

    tracing::info!(messages = session.transcript().len(), "chat session closed");
    Ok(())
}
