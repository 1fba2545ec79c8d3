mod archive;
mod config;
mod error;
mod gemini;
mod generator;
mod models;
mod prompts;
mod routes;
mod service;
mod stage;
mod store;
mod validation;

use anyhow::Context;
use routes::{router, AppState};
use std::net::SocketAddr;
use tracing_subscriber::{fmt, EnvFilter};
use std::sync::Arc;
use tower_http::cors::{CorsLayer, Any};

use crate::{
    archive::JsonFileArchive,
    config::AppConfig,
    gemini::GeminiClient,
    generator::{CannedGenerator, LlmGenerator, MessageGenerator},
    service::ConversationService,
    store::InMemoryStore,
};

fn build_generator(config: &AppConfig) -> Arc<dyn MessageGenerator> {
    if config.demo_mode {
        tracing::info!("Using demo mode - canned replies, no model calls");
        return Arc::new(CannedGenerator);
    }

    let api_key = config.api_key.clone().unwrap_or_else(|| {
        tracing::warn!("GEMINI_API_KEY not set; replies will fall back to the canned apology");
        String::new()
    });
    tracing::info!("Using Gemini model {} for live replies", config.model);
    let client = GeminiClient::new(api_key, config.api_base.clone(), config.model.clone(), config.request_timeout);
    Arc::new(LlmGenerator::new(client, config.max_output_tokens))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    // Init tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();

    let config = AppConfig::from_env();
    let archive = JsonFileArchive::new(config.data_dir.clone());
    tracing::info!("Completed conversations go to {}", archive.dir().display());

    let service = ConversationService::new(
        Arc::new(InMemoryStore::new()),
        build_generator(&config),
        Arc::new(archive),
    );
    let state = AppState { service: Arc::new(service) };

    let app = router(state).layer(
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    );

    let addr = SocketAddr::from(([0,0,0,0], config.port));
    tracing::info!(%addr, "Starting server");
    let listener = tokio::net::TcpListener::bind(addr).await.with_context(|| format!("binding {addr}"))?;
    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
