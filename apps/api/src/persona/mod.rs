// Persona chat core: resume loading, prompt template, contact capture and
// the per-turn conversation router. HTTP handlers sit on top in `handlers`.

pub mod contact;
pub mod conversation;
pub mod handlers;
pub mod loader;
pub mod prompts;
pub mod session;
pub mod session_log;

#[cfg(test)]
pub mod testing;

pub use conversation::{handle_message, ReplyKind};
pub use session::Session;
pub use session_log::{FileSessionLog, SessionLog};
