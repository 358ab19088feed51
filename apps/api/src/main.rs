mod config;
mod errors;
mod llm_client;
mod persona;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::persona::loader::load_resume_text;
use crate::persona::{FileSessionLog, Session};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Persona Chat v{}", env!("CARGO_PKG_VERSION"));

    // Initialize generation client
    if config.gemini_api_key.is_none() {
        warn!("GEMINI_API_KEY is not set; questions will fail until it is configured");
    }
    let llm = LlmClient::new(
        config.gemini_api_key.clone(),
        config.gemini_api_base.clone(),
        config.gemini_model.clone(),
    )?;
    info!("LLM client initialized (model: {})", config.gemini_model);

    // Load the resume; a failure leaves the session empty until a reload succeeds
    info!("Loading resume from {}...", config.resume_path.display());
    let session = match load_resume_text(config.resume_path.clone()).await {
        Ok(text) => {
            info!("Resume loaded ({} chars)", text.chars().count());
            Session::with_resume(text, config.resume_path.clone())
        }
        Err(e) => {
            error!("Resume not loaded: {e}");
            Session::new()
        }
    };

    let session_log = FileSessionLog::new(&config.unknown_log_path, &config.contact_log_path);

    let state = AppState {
        session: Arc::new(Mutex::new(session)),
        generator: Arc::new(llm),
        session_log: Arc::new(session_log),
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
