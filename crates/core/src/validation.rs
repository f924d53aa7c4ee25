//! Input validation helpers for account and catalog data.

use std::sync::LazyLock;

use regex::Regex;
use validator::ValidationErrors;

use crate::error::CoreError;

/// Minimum accepted password length (characters).
pub const MIN_PASSWORD_LENGTH: usize = 6;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid regex"));

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Enforce the password policy. Length is counted in characters, not bytes.
pub fn validate_password(password: &str) -> Result<(), CoreError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(CoreError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters long"
        )));
    }
    Ok(())
}

/// Reject empty or whitespace-only required fields.
pub fn require_non_empty(field: &'static str, value: &str) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        return Err(CoreError::Validation(format!("{field} is required")));
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), CoreError> {
    if !is_valid_email(email) {
        return Err(CoreError::Validation(format!(
            "'{email}' is not a valid email address"
        )));
    }
    Ok(())
}

/// Flatten `validator` derive output into a single [`CoreError::Validation`].
///
/// Fields are reported in alphabetical order so messages are stable.
pub fn from_validation_errors(errors: &ValidationErrors) -> CoreError {
    let mut parts: Vec<String> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter()
                .map(|e| match &e.message {
                    Some(msg) => format!("{field}: {msg}"),
                    None => format!("{field}: {}", e.code),
                })
                .collect::<Vec<_>>()
        })
        .collect();
    parts.sort();
    CoreError::Validation(parts.join("; "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn email_shapes() {
        assert!(is_valid_email("alice@x.com"));
        assert!(!is_valid_email("alice@x"));
        assert!(!is_valid_email("alice x@y.com"));
        assert!(!is_valid_email("@x.com"));
    }

    #[test]
    fn password_minimum_boundary() {
        assert!(validate_password("secret").is_ok());
        assert_matches!(validate_password("short"), Err(CoreError::Validation(msg)) if msg.contains("at least 6"));
    }

    #[test]
    fn blank_fields_are_rejected() {
        assert!(require_non_empty("userName", "alice").is_ok());
        assert_matches!(
            require_non_empty("userName", "   "),
            Err(CoreError::Validation(msg)) if msg == "userName is required"
        );
    }
}
