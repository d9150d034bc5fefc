// Tasklark - talk through your task list with an LLM
// Main entry point

use anyhow::Result;
use clap::Parser;
use std::sync::Arc;

use tasklark::cli::{Args, TerminalConsole};
use tasklark::config::load_config;
use tasklark::logging::init_tracing;
use tasklark::prioritize::TaskSource;
use tasklark::providers::{ChatSession, OpenAIProvider};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.debug);

    let mode = args.resolved_mode();
    tracing::debug!("Using {:?} mode for {}", mode, args.file.display());

    // Task file errors are reported before any configuration problem
    let source = TaskSource::load(mode, &args.file)?;

    // Configuration is resolved once here and passed down explicitly
    let config = load_config(&args.config_overrides())?;

    let provider = Arc::new(OpenAIProvider::from_config(&config)?);
    let session = ChatSession::from_config(provider, source.mode().system_prompt(), &config);
    let console = TerminalConsole::new()?;

    let outcome = source.run(session, console).await?;
    tracing::debug!(
        "Session ended after {} turns (all finished: {})",
        outcome.turns,
        outcome.finished
    );

    Ok(())
}
