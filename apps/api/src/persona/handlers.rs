//! Axum route handlers for the chat API.

use std::path::PathBuf;

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::persona::loader::load_resume_text;
use crate::persona::session::ContactFlowLabel;
use crate::persona::{handle_message, ReplyKind};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub reply: String,
    pub kind: ReplyKind,
    pub contact_flow: ContactFlowLabel,
}

#[derive(Debug, Serialize)]
pub struct ReloadResponse {
    pub loaded: bool,
    pub source: PathBuf,
    pub characters: usize,
    pub loaded_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct SessionStatusResponse {
    pub resume_loaded: bool,
    pub source: Option<PathBuf>,
    pub loaded_at: Option<DateTime<Utc>>,
    pub characters: usize,
    pub contact_flow: ContactFlowLabel,
    pub model: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/chat
pub async fn handle_chat(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    let message = req.message.trim();
    if message.is_empty() {
        return Err(AppError::Validation("message must not be empty".to_string()));
    }

    let mut session = state.session.lock().await;
    let reply = handle_message(
        &mut session,
        message,
        state.generator.as_ref(),
        state.session_log.as_ref(),
    )
    .await;

    Ok(Json(ChatResponse {
        reply: reply.text,
        kind: reply.kind,
        contact_flow: session.flow().label(),
    }))
}

/// POST /api/v1/resume/reload
/// A failed reload leaves the current session untouched.
pub async fn handle_reload(
    State(state): State<AppState>,
) -> Result<Json<ReloadResponse>, AppError> {
    let path = state.config.resume_path.clone();
    let text = load_resume_text(path.clone()).await?;
    let characters = text.chars().count();

    let mut session = state.session.lock().await;
    session.load(text, path.clone());
    let loaded_at = session
        .resume()
        .map(|r| r.loaded_at())
        .unwrap_or_else(Utc::now);
    info!("Resume reloaded from {} ({characters} chars)", path.display());

    Ok(Json(ReloadResponse {
        loaded: true,
        source: path,
        characters,
        loaded_at,
    }))
}

/// GET /api/v1/session
pub async fn handle_session_status(State(state): State<AppState>) -> Json<SessionStatusResponse> {
    let session = state.session.lock().await;
    let resume = session.resume();
    Json(SessionStatusResponse {
        resume_loaded: session.system_prompt().is_some(),
        source: resume.map(|r| r.source().to_path_buf()),
        loaded_at: resume.map(|r| r.loaded_at()),
        characters: resume.map_or(0, |r| r.text().chars().count()),
        contact_flow: session.flow().label(),
        model: state.generator.model().to_string(),
    })
}
