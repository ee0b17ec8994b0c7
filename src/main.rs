use anyhow::{Context, Result};
use clap::Parser;
use live_scribe::{create_router, AppState, Config, SessionManager, WhisperCliEngine};
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(name = "live-scribe")]
#[command(about = "Chunked live transcription server")]
struct Args {
    /// Path to the configuration file (without extension)
    #[arg(short, long, default_value = "config/live-scribe")]
    config: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let cfg = Config::load(&args.config)?;

    info!("{} starting", cfg.service.name);
    info!("Engine binary: {}", cfg.engine.binary);
    info!("Upload directory: {}", cfg.storage.upload_dir);

    tokio::fs::create_dir_all(&cfg.storage.upload_dir)
        .await
        .context("Failed to create upload directory")?;
    tokio::fs::create_dir_all(&cfg.engine.output_dir)
        .await
        .context("Failed to create engine output directory")?;

    let engine = Arc::new(WhisperCliEngine::new(
        cfg.engine.binary.clone(),
        cfg.engine.output_dir.clone(),
    ));
    let manager = Arc::new(SessionManager::new(engine));
    let state = AppState::new(manager, &cfg.storage.upload_dir);

    let addr = format!("{}:{}", cfg.service.http.bind, cfg.service.http.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("HTTP server listening on {}", addr);

    axum::serve(listener, create_router(state))
        .await
        .context("HTTP server error")?;

    Ok(())
}
