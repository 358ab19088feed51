//! Contact Extractor — keyword intent detection and email extraction.
//!
//! Matching is plain lowercase substring search with no word boundaries, so
//! "recall" counts as "call". Callers rely on that exact behavior.

use std::sync::LazyLock;

use regex::Regex;

const CONTACT_KEYWORDS: &[&str] = &[
    "contact", "email", "reach", "connect", "talk", "call", "meeting",
];

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").expect("email pattern is valid")
});

/// True when the message mentions any contact keyword.
pub fn is_contact_request(text: &str) -> bool {
    let lowered = text.to_lowercase();
    CONTACT_KEYWORDS.iter().any(|k| lowered.contains(k))
}

/// First email-shaped substring in the message, if any.
pub fn extract_email(text: &str) -> Option<&str> {
    EMAIL_RE.find(text).map(|m| m.as_str())
}
