use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::persona::prompts::build_system_prompt;

/// Where the contact flow stands between turns.
///
/// The pending email only exists inside `AwaitingReason`, so an idle session
/// can never hold a stale address.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ContactFlowState {
    #[default]
    Idle,
    AwaitingReason { pending_email: String },
}

/// Serializable label for `ContactFlowState`, without the held email.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactFlowLabel {
    Idle,
    AwaitingReason,
}

impl ContactFlowState {
    pub fn label(&self) -> ContactFlowLabel {
        match self {
            ContactFlowState::Idle => ContactFlowLabel::Idle,
            ContactFlowState::AwaitingReason { .. } => ContactFlowLabel::AwaitingReason,
        }
    }

    pub fn pending_email(&self) -> Option<&str> {
        match self {
            ContactFlowState::Idle => None,
            ContactFlowState::AwaitingReason { pending_email } => Some(pending_email),
        }
    }
}

/// A resume that loaded successfully, with its derived system prompt.
#[derive(Debug, Clone)]
pub struct LoadedResume {
    text: String,
    system_prompt: String,
    source: PathBuf,
    loaded_at: DateTime<Utc>,
}

impl LoadedResume {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }
}

/// The single conversation of a running instance.
#[derive(Debug, Default)]
pub struct Session {
    resume: Option<LoadedResume>,
    flow: ContactFlowState,
}

impl Session {
    /// A session with no resume; every turn asks for one to be loaded.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_resume(text: impl Into<String>, source: impl Into<PathBuf>) -> Self {
        let mut session = Self::new();
        session.load(text, source);
        session
    }

    /// Replaces the resume wholesale and drops any in-progress contact flow.
    pub fn load(&mut self, text: impl Into<String>, source: impl Into<PathBuf>) {
        let text = text.into();
        self.resume = Some(LoadedResume {
            system_prompt: build_system_prompt(&text),
            text,
            source: source.into(),
            loaded_at: Utc::now(),
        });
        self.flow = ContactFlowState::Idle;
    }

    pub fn resume(&self) -> Option<&LoadedResume> {
        self.resume.as_ref()
    }

    /// The system prompt, or `None` while no resume is loaded.
    pub fn system_prompt(&self) -> Option<&str> {
        self.resume
            .as_ref()
            .map(|r| r.system_prompt.as_str())
            .filter(|p| !p.is_empty())
    }

    pub fn flow(&self) -> &ContactFlowState {
        &self.flow
    }

    pub(crate) fn set_flow(&mut self, flow: ContactFlowState) {
        self.flow = flow;
    }
}
