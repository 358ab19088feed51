pub mod health;
pub mod shell;

use axum::{
    routing::{get, post},
    Router,
};

use crate::persona::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(shell::transcript_page))
        .route("/health", get(health::health_handler))
        // Chat API
        .route("/api/v1/chat", post(handlers::handle_chat))
        .route("/api/v1/resume/reload", post(handlers::handle_reload))
        .route("/api/v1/session", get(handlers::handle_session_status))
        .with_state(state)
}
