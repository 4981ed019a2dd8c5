//! Client-side checks run before any request leaves the machine.
//!
//! These only weed out obviously bad input; the server remains the authority.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::i18n::Message;

/// Minimum signup password length, in characters
pub const MIN_PASSWORD_LENGTH: usize = 8;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("email is malformed or password is empty")]
    InvalidLogin,

    #[error("email is malformed")]
    InvalidEmail,

    #[error("password is shorter than 8 characters")]
    PasswordTooShort,

    #[error("password needs at least one letter and one digit")]
    PasswordNeedsLetterAndDigit,

    #[error("username is empty")]
    EmptyUsername,
}

impl ValidationError {
    /// The localized message shown for this failure
    pub fn message(self) -> Message {
        match self {
            ValidationError::InvalidLogin => Message::LoginInvalid,
            ValidationError::InvalidEmail => Message::SignupInvalidEmail,
            ValidationError::PasswordTooShort => Message::PasswordTooShort,
            ValidationError::PasswordNeedsLetterAndDigit => Message::PasswordNeedsLetterAndDigit,
            ValidationError::EmptyUsername => Message::UsernameEmpty,
        }
    }
}

/// `local@domain.tld`: one `@`, no whitespace, a dot after the `@`
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ValidationError::PasswordTooShort);
    }
    let has_letter = password.chars().any(|c| c.is_ascii_alphabetic());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    if !has_letter || !has_digit {
        return Err(ValidationError::PasswordNeedsLetterAndDigit);
    }
    Ok(())
}

/// Login only asks for a well-formed email and a non-blank password.
pub fn validate_login(email: &str, password: &str) -> Result<(), ValidationError> {
    if !is_valid_email(email) || password.trim().is_empty() {
        return Err(ValidationError::InvalidLogin);
    }
    Ok(())
}

/// Signup checks email, then password, then username, stopping at the first failure.
pub fn validate_signup(email: &str, password: &str, username: &str) -> Result<(), ValidationError> {
    if !is_valid_email(email) {
        return Err(ValidationError::InvalidEmail);
    }
    validate_password(password)?;
    if username.trim().is_empty() {
        return Err(ValidationError::EmptyUsername);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_emails() {
        assert!(is_valid_email("a@b.com"));
        assert!(is_valid_email("first.last+tag@mail.example.org"));
        assert!(is_valid_email("x@y.z"));
    }

    #[test]
    fn test_malformed_emails() {
        assert!(!is_valid_email("")); // empty
        assert!(!is_valid_email("ab.com")); // no @
        assert!(!is_valid_email("a@bcom")); // no dot in domain
        assert!(!is_valid_email("a b@c.com")); // whitespace in local part
        assert!(!is_valid_email("a@b .com")); // whitespace in domain
        assert!(!is_valid_email(" a@b.com")); // leading whitespace
        assert!(!is_valid_email("a@b.com\n")); // trailing newline
        assert!(!is_valid_email("a@@b.com")); // double @
        assert!(!is_valid_email("a@b@c.com")); // two @
        assert!(!is_valid_email("@b.com")); // empty local part
        assert!(!is_valid_email("a@.com")); // empty domain label
        assert!(!is_valid_email("a@b.")); // empty tld
    }

    #[test]
    fn test_password_rules() {
        assert_eq!(validate_password("short"), Err(ValidationError::PasswordTooShort));
        assert_eq!(validate_password("abc1234"), Err(ValidationError::PasswordTooShort));
        assert_eq!(
            validate_password("abcdefgh"),
            Err(ValidationError::PasswordNeedsLetterAndDigit)
        );
        assert_eq!(
            validate_password("12345678"),
            Err(ValidationError::PasswordNeedsLetterAndDigit)
        );
        assert_eq!(validate_password("abcdefg1"), Ok(()));
        assert_eq!(validate_password("P4ssword!"), Ok(()));
    }

    #[test]
    fn test_password_length_counts_chars() {
        // 7 chars but more than 8 bytes
        assert_eq!(validate_password("ñandú1a"), Err(ValidationError::PasswordTooShort));
        assert_eq!(validate_password("ñandú1ab"), Ok(()));
    }

    #[test]
    fn test_password_letter_must_be_ascii() {
        assert_eq!(
            validate_password("ññññ1234"),
            Err(ValidationError::PasswordNeedsLetterAndDigit)
        );
    }

    #[test]
    fn test_login_rules() {
        assert_eq!(validate_login("a@b.com", "secret1"), Ok(()));
        // Login has no strength rules
        assert_eq!(validate_login("a@b.com", "x"), Ok(()));
        assert_eq!(validate_login("a@b.com", "   "), Err(ValidationError::InvalidLogin));
        assert_eq!(validate_login("a@b.com", ""), Err(ValidationError::InvalidLogin));
        assert_eq!(validate_login("ab.com", "secret1"), Err(ValidationError::InvalidLogin));
    }

    #[test]
    fn test_signup_rule_order() {
        assert_eq!(
            validate_signup("bad", "short", ""),
            Err(ValidationError::InvalidEmail)
        );
        assert_eq!(
            validate_signup("a@b.com", "short", ""),
            Err(ValidationError::PasswordTooShort)
        );
        assert_eq!(
            validate_signup("a@b.com", "longenough", ""),
            Err(ValidationError::PasswordNeedsLetterAndDigit)
        );
        assert_eq!(
            validate_signup("a@b.com", "longenough1", "  "),
            Err(ValidationError::EmptyUsername)
        );
        assert_eq!(validate_signup("a@b.com", "longenough1", "ana"), Ok(()));
    }

    #[test]
    fn test_each_error_has_its_own_message() {
        let errors = [
            ValidationError::InvalidLogin,
            ValidationError::InvalidEmail,
            ValidationError::PasswordTooShort,
            ValidationError::PasswordNeedsLetterAndDigit,
            ValidationError::EmptyUsername,
        ];
        for (i, a) in errors.iter().enumerate() {
            for b in &errors[i + 1..] {
                assert_ne!(a.message(), b.message());
            }
        }
    }
}
