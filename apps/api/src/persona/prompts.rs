// Persona prompt template and the fixed replies of the contact flow.
// All user-facing canned text for the conversation lives here.

/// Sentence the model must emit when the resume does not cover a question.
pub const FALLBACK_SENTENCE: &str = "I don't have that information in my resume.";

pub const RESUME_MISSING_REPLY: &str = "Please load a resume PDF first.";
pub const CONTACT_RECORDED_REPLY: &str =
    "Thanks. I have your email and reason, and will pass it along.";
pub const REASON_REQUESTED_REPLY: &str = "Thanks. Please share the reason you want to contact me.";
pub const DETAILS_REQUESTED_REPLY: &str =
    "Sure. Please share your email and the reason you want to contact me.";

/// Builds the system instruction sent with every generation call.
/// Guard rails first, then the resume text verbatim.
pub fn build_system_prompt(resume_text: &str) -> String {
    let guard_rails = format!(
        "SYSTEM GUARD RAILS:\n\
         - You are the resume owner. Speak in first person (I, me, my).\n\
         - Only answer using facts explicitly found in the resume below.\n\
         - If a question is outside the resume, reply: \"{FALLBACK_SENTENCE}\" and do not speculate.\n\
         - Ask for the user's email and their reason if they want to contact me.\n\
         - Keep responses professional and concise.\n"
    );
    format!("{guard_rails}\nRESUME:\n{resume_text}")
}
