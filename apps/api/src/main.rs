mod config;
mod documents;
mod errors;
mod llm_client;
mod models;
mod pipeline;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::GeminiClient;
use crate::pipeline::orchestrator::PipelineOptions;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting ResumeFit API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize the generation client
    let client = GeminiClient::new(
        config.gemini_api_key.clone(),
        config.gemini_model.clone(),
        Duration::from_secs(config.retry_backoff_secs),
    );
    info!("LLM client initialized (model: {})", client.model());

    // Build app state
    let state = AppState {
        invoker: Arc::new(client),
        pipeline: PipelineOptions {
            extraction_mode: config.extraction_mode,
            include_refinement: config.include_refinement,
            max_text_chars: config.max_text_chars,
        },
    };
    info!(
        "Pipeline options: mode={:?}, refinement={}, max_text_chars={}",
        state.pipeline.extraction_mode, state.pipeline.include_refinement,
        state.pipeline.max_text_chars
    );

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
