//! In-memory doubles for the generation backend and the session log.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::llm_client::{GenerationError, Generator};
use crate::persona::session_log::{contact_line, unknown_line, SessionLog};

/// Replays queued results in order; an exhausted queue answers "ok".
/// With a delay set, each call sleeps before answering and records how many
/// calls overlapped.
#[derive(Default)]
pub struct ScriptedGenerator {
    replies: Mutex<VecDeque<Result<String, GenerationError>>>,
    calls: AtomicUsize,
    last_system_prompt: Mutex<Option<String>>,
    delay: Option<Duration>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl ScriptedGenerator {
    pub fn replying(reply: &str) -> Self {
        let generator = Self::default();
        generator.push(Ok(reply.to_string()));
        generator
    }

    pub fn failing(error: GenerationError) -> Self {
        let generator = Self::default();
        generator.push(Err(error));
        generator
    }

    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Default::default()
        }
    }

    pub fn push(&self, reply: Result<String, GenerationError>) {
        self.replies.lock().unwrap().push_back(reply);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_system_prompt(&self) -> Option<String> {
        self.last_system_prompt.lock().unwrap().clone()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Generator for ScriptedGenerator {
    async fn generate(
        &self,
        system_prompt: &str,
        _user_message: &str,
    ) -> Result<String, GenerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_system_prompt.lock().unwrap() = Some(system_prompt.to_string());

        if let Some(delay) = self.delay {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(delay).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
        }

        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok("ok".to_string()))
    }

    fn model(&self) -> &str {
        "scripted"
    }
}

/// Collects log lines in memory, optionally failing every write.
#[derive(Default)]
pub struct MemoryLog {
    pub unknown: Mutex<Vec<String>>,
    pub contacts: Mutex<Vec<String>>,
    pub fail_writes: bool,
}

impl MemoryLog {
    pub fn failing() -> Self {
        Self {
            fail_writes: true,
            ..Default::default()
        }
    }

    pub fn unknown_entries(&self) -> Vec<String> {
        self.unknown.lock().unwrap().clone()
    }

    pub fn contact_entries(&self) -> Vec<String> {
        self.contacts.lock().unwrap().clone()
    }

    fn check(&self) -> std::io::Result<()> {
        if self.fail_writes {
            return Err(std::io::Error::new(std::io::ErrorKind::Other, "disk full"));
        }
        Ok(())
    }
}

#[async_trait]
impl SessionLog for MemoryLog {
    async fn log_unknown(&self, question: &str) -> std::io::Result<()> {
        self.check()?;
        let line = unknown_line(question);
        self.unknown.lock().unwrap().push(line.trim_end().to_string());
        Ok(())
    }

    async fn log_contact(&self, email: &str, context: &str) -> std::io::Result<()> {
        self.check()?;
        let line = contact_line(email, context);
        self.contacts.lock().unwrap().push(line.trim_end().to_string());
        Ok(())
    }
}
