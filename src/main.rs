use anyhow::Context;
use clap::Parser;
use crane::{Config, ResearchOrchestrator};
use tracing_subscriber::EnvFilter;

/// C.R.A.N.E - research a commercial real estate question from the
/// command line.
#[derive(Parser)]
#[command(name = "crane-research", version, about)]
struct Args {
    /// The research question
    query: String,

    /// Session identifier (generated when omitted)
    #[arg(long)]
    session: Option<String>,

    /// Override the model provider: openai, anthropic, or offline
    #[arg(long)]
    provider: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("crane=info")),
        )
        .init();

    let args = Args::parse();

    let mut config = Config::from_env()
        .map_err(|e| anyhow::anyhow!("{e}"))
        .context("loading configuration")?;
    if args.provider.is_some() {
        config.llm.provider = args.provider;
    }

    let orchestrator =
        ResearchOrchestrator::from_config(&config).context("building orchestrator")?;

    let session_id = args
        .session
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    tracing::info!(session = %session_id, "starting research");
    let answer = orchestrator
        .run_research(&args.query, &session_id, None)
        .await?;

    println!("{}", answer.response);

    if !answer.citations.is_empty() {
        println!("\n---\nCitations:");
        for (i, citation) in answer.citations.iter().enumerate() {
            println!(
                "[{}] {} - {} ({})",
                i + 1,
                citation.title,
                citation.source,
                citation.link
            );
        }
    }

    let progress = orchestrator.status(&session_id);
    tracing::info!(
        session = %session_id,
        steps = progress.events.len(),
        complete = progress.complete,
        "research finished"
    );

    Ok(())
}
