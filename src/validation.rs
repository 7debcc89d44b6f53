//! Field-level validation for the checkout form.

use std::fmt;

pub const NAME_MIN_LEN: usize = 3;
pub const PHONE_MIN_DIGITS: usize = 10;
pub const DOCUMENT_MIN_DIGITS: usize = 11;
/// Minimum charge, in cents.
pub const AMOUNT_MIN_CENTS: i64 = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

pub type ValidationResult = Result<(), ValidationError>;

pub fn sanitize_string(value: &str) -> String {
    value
        .chars()
        .filter(|ch| !ch.is_control())
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn validate_name(name: &str) -> ValidationResult {
    let name = sanitize_string(name);
    if name.chars().count() < NAME_MIN_LEN {
        return Err(ValidationError::new(
            "name",
            format!("must be at least {NAME_MIN_LEN} characters"),
        ));
    }
    Ok(())
}

pub fn validate_email(email: &str) -> ValidationResult {
    let email = sanitize_string(email);
    let valid = email
        .split_once('@')
        .map(|(local, domain)| !local.is_empty() && domain.contains('.') && !domain.starts_with('.'))
        .unwrap_or(false);
    if !valid {
        return Err(ValidationError::new("email", "must be a valid email"));
    }
    Ok(())
}

pub fn validate_phone(phone: &str) -> ValidationResult {
    let digits = phone.chars().filter(char::is_ascii_digit).count();
    if digits < PHONE_MIN_DIGITS {
        return Err(ValidationError::new(
            "phone",
            format!("must have at least {PHONE_MIN_DIGITS} digits"),
        ));
    }
    Ok(())
}

/// CPF (11 digits) or CNPJ (14 digits); only length is checked here, the
/// provider does the full document validation.
pub fn validate_document(document: &str) -> ValidationResult {
    let digits = document.chars().filter(char::is_ascii_digit).count();
    if digits < DOCUMENT_MIN_DIGITS {
        return Err(ValidationError::new(
            "document",
            format!("must have at least {DOCUMENT_MIN_DIGITS} digits (CPF/CNPJ)"),
        ));
    }
    Ok(())
}

pub fn validate_amount(amount_cents: i64) -> ValidationResult {
    if amount_cents < AMOUNT_MIN_CENTS {
        return Err(ValidationError::new(
            "amount",
            format!("must be at least {AMOUNT_MIN_CENTS} cents"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitizes_string() {
        assert_eq!(sanitize_string("  Ana \t Souza  "), "Ana Souza");
        assert_eq!(sanitize_string("ab\u{0000}cd"), "abcd");
    }

    #[test]
    fn validates_name_length() {
        assert!(validate_name("Ana").is_ok());
        assert!(validate_name("Al").is_err());
        assert!(validate_name("   ").is_err());
    }

    #[test]
    fn validates_email_shape() {
        assert!(validate_email("ana@example.com").is_ok());
        assert!(validate_email("ana@example").is_err());
        assert!(validate_email("example.com").is_err());
        assert!(validate_email("@example.com").is_err());
    }

    #[test]
    fn validates_phone_digits() {
        assert!(validate_phone("11999990000").is_ok());
        assert!(validate_phone("(11) 99999-0000").is_ok());
        assert!(validate_phone("99999").is_err());
    }

    #[test]
    fn validates_document_digits() {
        assert!(validate_document("12345678901").is_ok());
        assert!(validate_document("12.345.678/0001-95").is_ok());
        assert!(validate_document("1234567890").is_err());
    }

    #[test]
    fn validates_amount_floor() {
        assert!(validate_amount(100).is_ok());
        assert!(validate_amount(5000).is_ok());
        assert!(validate_amount(99).is_err());
        assert!(validate_amount(-100).is_err());
    }

    #[test]
    fn validation_error_names_the_field() {
        let err = validate_amount(1).unwrap_err();
        assert_eq!(err.field, "amount");
        assert!(err.to_string().starts_with("amount:"));
    }
}
