mod assessment;
mod config;
mod errors;
mod interview;
mod llm_client;
mod matrix;
mod routes;
mod state;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use std::sync::Arc;

use crate::config::Config;
use crate::interview::store::InMemorySessionStore;
use crate::llm_client::{LlmClient, OpenAiChatClient};
use crate::matrix::SkillsMatrix;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Interview API v{}", env!("CARGO_PKG_VERSION"));

    // Skills matrix is read once; a bad file stops startup
    let matrix = SkillsMatrix::load(&config.skills_matrix_path).with_context(|| {
        format!(
            "Failed to load skills matrix from {}",
            config.skills_matrix_path.display()
        )
    })?;
    info!(
        "Skills matrix loaded: {} ({} skills)",
        matrix.role,
        matrix.skills.len()
    );

    let settings = config.interview_settings()?;

    // Initialize LLM client
    let chat = OpenAiChatClient::new(
        &config.llm_base_url,
        config.llm_api_key.clone(),
        config.llm_timeout(),
    )?;
    let llm = LlmClient::new(Arc::new(chat), config.retry_policy());
    info!(
        "LLM client initialized ({}; planner {}, {} assessors)",
        config.llm_base_url,
        settings.planner_model,
        settings.assessors.len()
    );

    // Build app state
    let state = AppState {
        llm,
        sessions: Arc::new(InMemorySessionStore::new()),
        matrix: Arc::new(matrix),
        settings: Arc::new(settings),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
