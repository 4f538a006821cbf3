mod config;
mod error;
mod handlers;
mod inference;
mod logging;
mod metrics;
mod middleware;
mod models;
mod rate_limit;
mod router;
mod state;

use anyhow::Context;
use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::Args;
use crate::inference::OllamaClient;
use crate::rate_limit::{SlidingWindowLimiter, idle_sweeper};
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logging::init_logging(&args.log_level, args.log_json)?;
    args.validate()?;

    let policy = args.policy();
    if policy.max_requests == 0 {
        warn!("rate limit is 0, every summarize request will be rejected");
    }

    let limiter = SlidingWindowLimiter::new(policy);
    let inference = OllamaClient::new(
        &args.ollama_url,
        args.model.clone(),
        args.api_key.clone(),
        args.inference_timeout(),
    )?;

    if let Some(every) = args.sweep_interval() {
        tokio::spawn(idle_sweeper(limiter.clone(), every));
    }

    let state = Arc::new(AppState { limiter, inference });
    let app = router::build_router(state);

    let addr = format!("{}:{}", args.host, args.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    info!("Gateway running on http://{addr}");
    info!("Forwarding to Ollama at {} (model {})", args.ollama_url, args.model);
    info!(
        "Rate limit: {} requests per {} seconds",
        args.rate_limit, args.rate_window
    );

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("Gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
