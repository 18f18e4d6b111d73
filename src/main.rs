//! # docclaw — ask questions about your documents
//!
//! Thin CLI over the docclaw engine: wires the filesystem loader and an
//! OpenAI-compatible backend into the retrieval engine, indexes one
//! document, then answers questions (one-shot or interactive).
//!
//! Usage:
//!   docclaw manual.txt                      # interactive question loop
//!   docclaw manual.txt -q "What is X?"      # one-shot question
//!   docclaw manual.txt --config my.toml     # custom config

use std::io::{BufRead, Write};
use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use docclaw_core::DocclawConfig;
use docclaw_engine::RagEngine;
use docclaw_providers::{FileLoader, OpenAiCompatibleClient};

#[derive(Parser)]
#[command(name = "docclaw", version, about = "Ask questions about your documents")]
struct Cli {
    /// Document to index (UTF-8 text; form feeds separate pages)
    document: String,

    /// Ask a single question and exit
    #[arg(short, long)]
    question: Option<String>,

    /// Config file path (default: ~/.docclaw/config.toml)
    #[arg(long)]
    config: Option<String>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "docclaw=debug" } else { "docclaw=info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    let config = match &cli.config {
        Some(path) => DocclawConfig::load_from(Path::new(
            shellexpand::tilde(path).as_ref(),
        ))?,
        None => DocclawConfig::load()?,
    };

    let client = Arc::new(OpenAiCompatibleClient::from_config(&config));
    if !client.health_check().await {
        tracing::warn!("Backend at {} is not responding", client.base_url());
    }

    let mut engine = RagEngine::new(
        &config,
        Arc::new(FileLoader::new()),
        client.clone(),
        client,
    )?;

    let document = shellexpand::tilde(&cli.document).to_string();
    let has_generation = engine.initialize(Path::new(&document)).await?;
    println!("Indexed {} chunk(s) from {}", engine.chunk_count(), document);

    if !has_generation {
        println!("Embedding backend unavailable — questions cannot be answered this session.");
        return Ok(());
    }

    match cli.question {
        Some(question) => answer(&engine, &question).await,
        None => {
            println!("Enter a question (empty line to quit):");
            let stdin = std::io::stdin();
            loop {
                print!("> ");
                std::io::stdout().flush()?;
                let mut line = String::new();
                if stdin.lock().read_line(&mut line)? == 0 {
                    break;
                }
                let question = line.trim();
                if question.is_empty() {
                    break;
                }
                answer(&engine, question).await?;
            }
            Ok(())
        }
    }
}

async fn answer(engine: &RagEngine, question: &str) -> Result<()> {
    let answer = engine.ask(question).await?;
    println!("\n{}\n", answer.text);
    if !answer.sources.is_empty() {
        println!("Sources:");
        for source in &answer.sources {
            let preview: String = source.text.chars().take(60).collect();
            println!(
                "  [{}] {:.3}  {}",
                source.id,
                source.similarity,
                preview.replace('\n', " ")
            );
        }
        println!();
    }
    Ok(())
}
