mod config;
mod errors;
mod interview;
mod llm_client;
mod models;
mod resume;
mod results;
mod routes;
mod state;
mod store;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::interview::questions::QuestionBank;
use crate::interview::scoring::{HeuristicScorer, LlmScorer, ScoringOracle};
use crate::interview::service::SessionService;
use crate::interview::timer::spawn_ticker;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::{MemoryStore, RedisStore, SnapshotStore};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Interview API v{}", env!("CARGO_PKG_VERSION"));

    // Snapshot store: Redis when configured, otherwise in process
    let store: Arc<dyn SnapshotStore> = match &config.redis_url {
        Some(url) => Arc::new(RedisStore::connect(url, config.snapshot_key.clone()).await?),
        None => {
            info!("REDIS_URL not set, snapshots are kept in memory only");
            Arc::new(MemoryStore::new())
        }
    };

    // Scoring oracle (HeuristicScorer by default — swap via ENABLE_LLM_SCORING)
    let oracle: Arc<dyn ScoringOracle> = match (&config.anthropic_api_key, config.enable_llm_scoring) {
        (Some(key), true) => {
            info!("LLM scoring enabled (model: {})", llm_client::MODEL);
            Arc::new(LlmScorer(LlmClient::new(key.clone())?))
        }
        _ => {
            info!(variation = config.scoring_variation, "heuristic scoring enabled");
            Arc::new(HeuristicScorer::new(config.scoring_variation))
        }
    };

    let sessions = Arc::new(
        SessionService::open(
            store,
            oracle,
            Arc::new(QuestionBank::full_stack()),
            config.max_resume_bytes,
        )
        .await,
    );
    if let Some(prompt) = sessions.recover().await {
        info!(
            "Unfinished interview suspended at question {}/{}",
            prompt.question_number, prompt.total_questions
        );
    }
    spawn_ticker(sessions.clone(), config.tick_interval);

    // Build app state
    let state = AppState {
        sessions,
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the display layer has a fixed host

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
