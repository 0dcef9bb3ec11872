use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;

use gauntlet_core::security::ApiKey;
use gauntlet_engine::Orchestrator;
use gauntlet_reasoner::{GeminiReasoner, ReliableReasoner, RetryConfig};
use gauntlet_server::{AppState, ServerConfig};
use gauntlet_store::{Database, VerdictRepo};

#[derive(Debug, Parser)]
#[command(name = "gauntlet", about = "Multi-round interview orchestration server")]
struct Cli {
    /// Port to listen on.
    #[arg(long, default_value_t = 9100)]
    port: u16,

    /// Path to the decision-memory database. Defaults to ~/.gauntlet/verdicts.db.
    #[arg(long)]
    db: Option<PathBuf>,

    /// Reasoning model identifier.
    #[arg(long)]
    model: Option<String>,

    /// API key for the reasoning service.
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    api_key: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    gauntlet_telemetry::init("info");
    tracing::info!("Starting gauntlet server");

    let db_path = cli
        .db
        .unwrap_or_else(|| dirs_home().join(".gauntlet").join("verdicts.db"));
    let db = Database::open(&db_path).context("failed to open decision memory")?;
    let verdicts = VerdictRepo::new(db);

    let gemini = GeminiReasoner::new(ApiKey::new(cli.api_key), cli.model.as_deref());
    let reliable = ReliableReasoner::new(gemini, RetryConfig::default());
    let metrics = reliable.metrics();

    let state = AppState {
        orchestrator: Arc::new(Orchestrator::new(Arc::new(reliable), verdicts)),
        metrics,
    };

    let handle = gauntlet_server::start(ServerConfig { port: cli.port }, state)
        .await
        .context("failed to start server")?;
    tracing::info!(port = handle.port, "gauntlet ready");

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for ctrl+c")?;
    tracing::info!("Shutting down");
    Ok(())
}

fn dirs_home() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/tmp"))
}
