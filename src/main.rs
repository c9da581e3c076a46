use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use gleaner::api::create_router;
use gleaner::config::{Cli, Config, log_filter};
use gleaner::pipeline::Pipeline;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(log_filter())
        .with_target(true)
        .init();

    let cli = Cli::parse();
    let config = Config::load(&cli).context("Failed to load configuration")?;
    let pipeline = Pipeline::from_config(&config).context("Failed to build HTTP client")?;

    let app = create_router(Arc::new(pipeline));
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    tracing::info!("Starting gleaner on {}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}
