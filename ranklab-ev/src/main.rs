//! ranklab-ev - Submission Evaluation & Ranking service
//!
//! Scores classification submissions against the active answer key,
//! enforces per-participant quotas and attempt numbering, and serves the
//! leaderboard.

use anyhow::Result;
use clap::Parser;
use tracing::{info, warn};

use ranklab_common::config;
use ranklab_common::db::init_database;
use ranklab_ev::{build_router, AppState};

#[derive(Debug, Parser)]
#[command(name = "ranklab-ev", version, about = "Submission evaluation and ranking service")]
struct Args {
    /// Root folder holding the database (overrides RANKLAB_ROOT and config file)
    #[arg(long)]
    root_folder: Option<String>,

    /// Address to listen on
    #[arg(long, env = "RANKLAB_BIND", default_value = "127.0.0.1:5730")]
    bind: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("Starting RankLab Evaluation (ranklab-ev) v{}", env!("CARGO_PKG_VERSION"));

    let args = Args::parse();

    let root_folder = config::resolve_root_folder(args.root_folder.as_deref(), "RANKLAB_ROOT")?;
    let db_path = config::prepare_root_folder(&root_folder)?;
    info!("Database path: {}", db_path.display());

    let pool = init_database(&db_path).await?;

    let state = AppState::new(pool);

    // Load the active answer key, if one has been uploaded
    if state.answer_key.load_active(&state.db).await? {
        info!("✓ Active answer key loaded");
    } else {
        warn!("No active answer key; submissions will fail until one is uploaded");
    }

    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&args.bind).await?;
    info!("ranklab-ev listening on http://{}", args.bind);
    info!("Health check: http://{}/health", args.bind);

    axum::serve(listener, app).await?;

    Ok(())
}
