use crate::error::AgentError;
use regex::Regex;
use std::sync::LazyLock;

static MOBILE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+[1-9][0-9]{1,14}$").expect("mobile pattern compiles"));

pub(super) fn name(value: &str) -> Result<String, AgentError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AgentError::Invalid("Name is required".to_string()));
    }
    Ok(value.to_string())
}

/// Emails are stored trimmed and lowercased so uniqueness is case-insensitive.
pub(super) fn email(value: &str) -> Result<String, AgentError> {
    let value = value.trim().to_lowercase();
    if value.is_empty() {
        return Err(AgentError::Invalid("Email is required".to_string()));
    }
    if !(value.contains('@') && value.contains('.')) {
        return Err(AgentError::Invalid("Email is not valid".to_string()));
    }
    Ok(value)
}

pub(super) fn mobile(value: &str) -> Result<String, AgentError> {
    let value = value.trim();
    if !MOBILE_RE.is_match(value) {
        return Err(AgentError::Invalid(
            "Mobile number must be in international format with country code (e.g., +1234567890)"
                .to_string(),
        ));
    }
    Ok(value.to_string())
}
