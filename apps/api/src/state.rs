use std::sync::Arc;

use tokio::sync::Mutex;

use crate::config::Config;
use crate::llm_client::Generator;
use crate::persona::{Session, SessionLog};

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// The one conversation. Turns hold the lock for their whole duration,
    /// generation call included, so they never interleave.
    pub session: Arc<Mutex<Session>>,
    pub generator: Arc<dyn Generator>,
    pub session_log: Arc<dyn SessionLog>,
    pub config: Config,
}
