//! Typed operations against the portal backend.

pub mod auth;
pub mod perfil;
pub mod types;

use regex::Regex;
use serde_json::Value;

/// Shape check only; the backend is the authority on whether an address
/// is deliverable.
#[must_use]
pub fn valid_email(email: &str) -> bool {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").map_or(false, |re| re.is_match(email))
}

/// Extract the backend's message from an `{ "error": "…" }` body.
pub(crate) fn error_message(body: &Value) -> &str {
    body.get("error").and_then(Value::as_str).unwrap_or("")
}
