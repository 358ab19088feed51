//! Conversation Router — decides, per message, whether to finish a pending
//! contact capture, start one, or ask the generation backend.
//!
//! Order per turn:
//! 0. no resume loaded → ask for one, nothing else happens
//! 1. `AwaitingReason` → the message is the reason; log it and go idle
//! 2. contact keywords → hold the email (if any) or ask for it
//! 3. otherwise → generate; empty or fallback replies are logged as unknown

use serde::Serialize;
use tracing::{debug, warn};

use crate::llm_client::Generator;
use crate::persona::contact::{extract_email, is_contact_request};
use crate::persona::prompts::{
    CONTACT_RECORDED_REPLY, DETAILS_REQUESTED_REPLY, FALLBACK_SENTENCE, REASON_REQUESTED_REPLY,
    RESUME_MISSING_REPLY,
};
use crate::persona::session::{ContactFlowState, Session};
use crate::persona::session_log::SessionLog;

/// Which branch produced a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplyKind {
    ResumeMissing,
    ContactRecorded,
    ReasonRequested,
    DetailsRequested,
    Answered,
    Fallback,
    GenerationFailed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub kind: ReplyKind,
}

impl Reply {
    fn new(kind: ReplyKind, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind,
        }
    }
}

/// Handles one user turn against the session.
///
/// Log write failures are reported through `tracing` and do not change the
/// reply or the state transition.
pub async fn handle_message(
    session: &mut Session,
    message: &str,
    generator: &dyn Generator,
    log: &dyn SessionLog,
) -> Reply {
    let Some(system_prompt) = session.system_prompt().map(str::to_owned) else {
        return Reply::new(ReplyKind::ResumeMissing, RESUME_MISSING_REPLY);
    };

    if let Some(pending_email) = session.flow().pending_email().map(str::to_owned) {
        if let Err(e) = log.log_contact(&pending_email, message).await {
            warn!("Failed to write contact log: {e}");
        }
        session.set_flow(ContactFlowState::Idle);
        return Reply::new(ReplyKind::ContactRecorded, CONTACT_RECORDED_REPLY);
    }

    if is_contact_request(message) {
        return match extract_email(message) {
            Some(email) => {
                debug!("Contact request with email, awaiting reason");
                session.set_flow(ContactFlowState::AwaitingReason {
                    pending_email: email.to_string(),
                });
                Reply::new(ReplyKind::ReasonRequested, REASON_REQUESTED_REPLY)
            }
            None => Reply::new(ReplyKind::DetailsRequested, DETAILS_REQUESTED_REPLY),
        };
    }

    let generated = match generator.generate(&system_prompt, message).await {
        Ok(text) => text,
        Err(e) => {
            warn!(model = generator.model(), "Generation failed: {e}");
            return Reply::new(ReplyKind::GenerationFailed, format!("Generation error: {e}"));
        }
    };

    let generated = generated.trim();
    if generated.is_empty() || generated == FALLBACK_SENTENCE {
        if let Err(e) = log.log_unknown(message).await {
            warn!("Failed to write unknown-question log: {e}");
        }
        return Reply::new(ReplyKind::Fallback, FALLBACK_SENTENCE);
    }

    Reply::new(ReplyKind::Answered, generated)
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::llm_client::GenerationError;
    use crate::persona::testing::{MemoryLog, ScriptedGenerator};

    const RESUME: &str = "Jane Doe\nStaff Engineer at Acme\nBSc Computer Science, MIT";

    fn loaded() -> Session {
        Session::with_resume(RESUME, "resume.pdf")
    }

    fn awaiting(email: &str) -> Session {
        let mut session = loaded();
        session.set_flow(ContactFlowState::AwaitingReason {
            pending_email: email.to_string(),
        });
        session
    }

    #[tokio::test]
    async fn test_no_resume_short_circuits() {
        let mut session = Session::new();
        let generator = ScriptedGenerator::replying("hello");
        let log = MemoryLog::default();

        for msg in ["Where did you study?", "contact me at a@b.com"] {
            let reply = handle_message(&mut session, msg, &generator, &log).await;
            assert_eq!(reply.kind, ReplyKind::ResumeMissing);
            assert_eq!(reply.text, "Please load a resume PDF first.");
        }
        assert_eq!(session.flow(), &ContactFlowState::Idle);
        assert_eq!(generator.calls(), 0);
        assert!(log.unknown_entries().is_empty());
        assert!(log.contact_entries().is_empty());
    }

    #[tokio::test]
    async fn test_awaiting_reason_always_records_and_goes_idle() {
        for msg in [
            "discuss a role",
            "please contact me at other@x.io instead",
            "I don't have that information in my resume.",
        ] {
            let mut session = awaiting("a@b.com");
            let generator = ScriptedGenerator::default();
            let log = MemoryLog::default();

            let reply = handle_message(&mut session, msg, &generator, &log).await;

            assert_eq!(reply.kind, ReplyKind::ContactRecorded);
            assert_eq!(
                reply.text,
                "Thanks. I have your email and reason, and will pass it along."
            );
            assert_eq!(session.flow(), &ContactFlowState::Idle);
            assert_eq!(generator.calls(), 0);
            assert_eq!(
                log.contact_entries(),
                vec![format!("email: a@b.com | context: {msg}")]
            );
        }
    }

    #[tokio::test]
    async fn test_contact_with_email_awaits_reason() {
        let mut session = loaded();
        let generator = ScriptedGenerator::default();
        let log = MemoryLog::default();

        let reply =
            handle_message(&mut session, "Can we talk? I'm at jo.smith@corp.example.com", &generator, &log)
                .await;

        assert_eq!(reply.kind, ReplyKind::ReasonRequested);
        assert_eq!(
            reply.text,
            "Thanks. Please share the reason you want to contact me."
        );
        assert_eq!(
            session.flow().pending_email(),
            Some("jo.smith@corp.example.com")
        );
        assert_eq!(generator.calls(), 0);
        assert!(log.contact_entries().is_empty());
    }

    #[tokio::test]
    async fn test_contact_without_email_stays_idle() {
        let mut session = loaded();
        let generator = ScriptedGenerator::default();
        let log = MemoryLog::default();

        let reply = handle_message(&mut session, "How do I reach you?", &generator, &log).await;

        assert_eq!(reply.kind, ReplyKind::DetailsRequested);
        assert_eq!(
            reply.text,
            "Sure. Please share your email and the reason you want to contact me."
        );
        assert_eq!(session.flow(), &ContactFlowState::Idle);
        assert_eq!(generator.calls(), 0);
    }

    #[tokio::test]
    async fn test_contact_round_trip_writes_one_entry() {
        let mut session = loaded();
        let generator = ScriptedGenerator::default();
        let log = MemoryLog::default();

        let first = handle_message(&mut session, "please contact me at a@b.com", &generator, &log).await;
        assert_eq!(first.kind, ReplyKind::ReasonRequested);
        let second = handle_message(&mut session, "discuss a role", &generator, &log).await;
        assert_eq!(second.kind, ReplyKind::ContactRecorded);

        assert_eq!(
            log.contact_entries(),
            vec!["email: a@b.com | context: discuss a role".to_string()]
        );
        assert!(log.unknown_entries().is_empty());
        assert_eq!(session.flow(), &ContactFlowState::Idle);
        assert_eq!(generator.calls(), 0);
    }

    #[tokio::test]
    async fn test_answer_is_returned_trimmed_without_logging() {
        let mut session = loaded();
        let generator = ScriptedGenerator::replying("\n  I studied Computer Science at MIT.  ");
        let log = MemoryLog::default();

        let reply = handle_message(&mut session, "Where did you study?", &generator, &log).await;

        assert_eq!(reply.kind, ReplyKind::Answered);
        assert_eq!(reply.text, "I studied Computer Science at MIT.");
        assert!(log.unknown_entries().is_empty());
        assert!(log.contact_entries().is_empty());
        assert_eq!(generator.calls(), 1);
        assert_eq!(
            generator.last_system_prompt().as_deref(),
            session.system_prompt()
        );
    }

    #[tokio::test]
    async fn test_fallback_reply_logs_question() {
        let mut session = loaded();
        let generator = ScriptedGenerator::replying("  I don't have that information in my resume.\n");
        let log = MemoryLog::default();

        let reply = handle_message(&mut session, "What is your GPA?", &generator, &log).await;

        assert_eq!(reply.kind, ReplyKind::Fallback);
        assert_eq!(reply.text, FALLBACK_SENTENCE);
        assert_eq!(log.unknown_entries(), vec!["What is your GPA?".to_string()]);
    }

    #[tokio::test]
    async fn test_empty_reply_becomes_fallback() {
        let mut session = loaded();
        let generator = ScriptedGenerator::replying("   ");
        let log = MemoryLog::default();

        let reply = handle_message(&mut session, "Favourite colour?", &generator, &log).await;

        assert_eq!(reply.kind, ReplyKind::Fallback);
        assert_eq!(reply.text, "I don't have that information in my resume.");
        assert_eq!(log.unknown_entries(), vec!["Favourite colour?".to_string()]);
    }

    #[tokio::test]
    async fn test_fallback_prefix_is_a_normal_answer() {
        let mut session = loaded();
        let generator = ScriptedGenerator::replying(
            "I don't have that information in my resume. But I know Rust.",
        );
        let log = MemoryLog::default();

        let reply = handle_message(&mut session, "Do you know Java?", &generator, &log).await;

        assert_eq!(reply.kind, ReplyKind::Answered);
        assert!(log.unknown_entries().is_empty());
    }

    #[tokio::test]
    async fn test_generation_failure_is_inline_and_stateless() {
        let mut session = loaded();
        let generator = ScriptedGenerator::failing(GenerationError::Api {
            status: 503,
            message: "overloaded".to_string(),
        });
        let log = MemoryLog::default();

        let reply = handle_message(&mut session, "Where did you work?", &generator, &log).await;

        assert_eq!(reply.kind, ReplyKind::GenerationFailed);
        assert_eq!(
            reply.text,
            "Generation error: API error (status 503): overloaded"
        );
        assert_eq!(session.flow(), &ContactFlowState::Idle);
        assert!(log.unknown_entries().is_empty());
    }

    #[tokio::test]
    async fn test_log_failure_does_not_break_the_turn() {
        let mut session = awaiting("a@b.com");
        let generator = ScriptedGenerator::default();
        let log = MemoryLog::failing();

        let reply = handle_message(&mut session, "discuss a role", &generator, &log).await;
        assert_eq!(reply.kind, ReplyKind::ContactRecorded);
        assert_eq!(session.flow(), &ContactFlowState::Idle);

        let generator = ScriptedGenerator::replying("");
        let reply = handle_message(&mut session, "What is your GPA?", &generator, &log).await;
        assert_eq!(reply.kind, ReplyKind::Fallback);
    }

    #[tokio::test]
    async fn test_reload_drops_pending_contact() {
        let mut session = loaded();
        let generator = ScriptedGenerator::replying("I worked at Acme.");
        let log = MemoryLog::default();

        handle_message(&mut session, "email me: a@b.com", &generator, &log).await;
        assert!(session.flow().pending_email().is_some());

        session.load(RESUME, "resume.pdf");
        assert_eq!(session.flow(), &ContactFlowState::Idle);

        let reply = handle_message(&mut session, "Where did you work?", &generator, &log).await;
        assert_eq!(reply.kind, ReplyKind::Answered);
        assert!(log.contact_entries().is_empty());
    }
}
