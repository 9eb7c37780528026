//! User-facing messages extracted from API error bodies.
//!
//! The backend answers failures with a JSON body shaped like
//! `{"message": "...", "errors": {"field": ["first", "second"]}}`. Field
//! order is preserved so "first validation message" means the first field
//! the server listed.

use serde_json::Value;

use super::types::ApiError;

pub const GENERIC_FAILURE: &str = "Something went wrong, please try again.";
pub const LOGIN_FAILURE: &str = "Login failed. Check your email and password.";
pub const REGISTER_FAILURE: &str = "Registration failed. Please check the form.";

fn parse(body: &str) -> Option<Value> {
    serde_json::from_str(body).ok()
}

fn non_empty(text: &str) -> Option<String> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Top-level `message` (or `error`) string of an error body.
pub fn server_message(body: &str) -> Option<String> {
    let value = parse(body)?;
    ["message", "error"]
        .iter()
        .filter_map(|key| value.get(*key).and_then(Value::as_str))
        .find_map(non_empty)
}

/// First field-level validation message of an error body, if any.
///
/// Each field may carry either a list of messages or a single string.
pub fn first_validation_message(body: &str) -> Option<String> {
    let value = parse(body)?;
    let errors = value.get("errors")?.as_object()?;
    errors.values().find_map(|messages| match messages {
        Value::String(text) => non_empty(text),
        Value::Array(items) => items.iter().filter_map(Value::as_str).find_map(non_empty),
        _ => None,
    })
}

/// Message to show after a failed action.
///
/// Network failures are reported verbatim; server failures use the body's
/// message, then its first validation message, then `fallback`.
pub fn user_message(error: &ApiError, fallback: &str) -> String {
    match error {
        ApiError::Transport(_) => error.to_string(),
        ApiError::Status { body, .. } => server_message(body)
            .or_else(|| first_validation_message(body))
            .unwrap_or_else(|| fallback.to_string()),
        _ => fallback.to_string(),
    }
}

/// Message for a failed registration: field errors win over the summary.
pub fn registration_message(error: &ApiError) -> String {
    match error {
        ApiError::Status { body, .. } => first_validation_message(body)
            .unwrap_or_else(|| REGISTER_FAILURE.to_string()),
        ApiError::Transport(_) => error.to_string(),
        _ => REGISTER_FAILURE.to_string(),
    }
}
