//! Sends one question to a running ragchat server and prints the raw reply.
//!
//!  cargo run -p ragchat-server --bin ragchat-smoke -- --url http://127.0.0.1:8000/chat

use anyhow::{Context, Result};
use clap::Parser;
use ragchat_server::ChatRequest;

#[derive(Parser)]
#[command(name = "ragchat-smoke", about = "Smoke-test a ragchat /chat endpoint", version)]
struct Cli {
    /// Full URL of the chat endpoint.
    #[arg(long, default_value = "http://127.0.0.1:8000/chat")]
    url: String,

    #[arg(long, default_value = "What is Acne?")]
    question: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let payload = ChatRequest { question: cli.question, chat_history: Vec::new() };

    let response = reqwest::Client::new()
        .post(&cli.url)
        .json(&payload)
        .send()
        .await
        .with_context(|| format!("request to {} failed", cli.url))?;

    println!("Status Code: {}", response.status().as_u16());
    let text = response.text().await.context("failed to read response body")?;
    println!("Raw Text: {text}");
    Ok(())
}
