use std::collections::HashMap;

use crate::error::ApiError;

/// Collects per-field problems so a request can report all of them at once
#[derive(Debug, Default)]
pub struct FieldErrors {
    errors: HashMap<String, String>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, problem: impl Into<String>) {
        self.errors.entry(field.to_string()).or_insert_with(|| problem.into());
    }

    /// Record `field` as missing when `value` is blank
    pub fn require(&mut self, field: &str, value: &str) {
        if value.trim().is_empty() {
            self.add(field, "This field is required");
        }
    }

    /// Record `field` when `value` will not fit a column of `max` characters
    /// or holds a NUL, which Postgres text cannot store
    pub fn limit(&mut self, field: &str, value: &str, max: usize) {
        if value.chars().count() > max {
            self.add(field, format!("Must be at most {} characters", max));
        }
        self.text(field, value);
    }

    /// Record `field` when `value` holds a NUL character
    pub fn text(&mut self, field: &str, value: &str) {
        if value.contains('\0') {
            self.add(field, "Contains invalid characters");
        }
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn into_result(self, message: &str) -> Result<(), ApiError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ApiError::validation_error(message, Some(self.errors)))
        }
    }
}

/// Lowercased, trimmed form used for storage and lookup
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Basic email shape check for registration and account updates
pub fn validate_email_format(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("Email cannot be empty".to_string());
    }

    let mut parts = email.split('@');
    let (local, domain) = match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => (local, domain),
        _ => return Err("Invalid email format".to_string()),
    };

    if local.is_empty() || domain.is_empty() || !domain.contains('.') || email.contains(char::is_whitespace) {
        return Err("Invalid email format".to_string());
    }
    if domain.starts_with('.') || domain.ends_with('.') {
        return Err("Invalid email format".to_string());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_addresses() {
        assert!(validate_email_format("amy@x.com").is_ok());
        assert!(validate_email_format("first.last+tag@mail.example.org").is_ok());
    }

    #[test]
    fn rejects_malformed_addresses() {
        for email in ["", "amy", "amy@", "@x.com", "amy@x", "a@b@c.com", "amy @x.com", "amy@.com", "amy@x."] {
            assert!(validate_email_format(email).is_err(), "accepted {:?}", email);
        }
    }

    #[test]
    fn normalizes_case_and_whitespace() {
        assert_eq!(normalize_email("  Amy@X.com "), "amy@x.com");
    }

    #[test]
    fn limits_count_characters_not_bytes() {
        let mut errors = FieldErrors::new();
        errors.limit("name", &"é".repeat(10), 10);
        assert!(errors.is_empty());

        errors.limit("name", &"a".repeat(11), 10);
        let body = errors.into_result("Invalid input").unwrap_err().to_json();
        assert_eq!(body["field_errors"]["name"], "Must be at most 10 characters");
    }

    #[test]
    fn rejects_nul_characters() {
        let mut errors = FieldErrors::new();
        errors.limit("username", "nul\u{0}x", 100);
        errors.text("description", "fine");
        let body = errors.into_result("Invalid input").unwrap_err().to_json();
        assert_eq!(body["field_errors"]["username"], "Contains invalid characters");
        assert!(body["field_errors"].get("description").is_none());
    }

    #[test]
    fn collects_first_problem_per_field() {
        let mut errors = FieldErrors::new();
        errors.require("username", "  ");
        errors.require("email", "amy@x.com");
        errors.add("username", "second problem is ignored");
        assert!(!errors.is_empty());

        let err = errors.into_result("Invalid input").unwrap_err();
        let body = err.to_json();
        assert_eq!(body["field_errors"]["username"], "This field is required");
        assert!(body["field_errors"].get("email").is_none());
    }
}
