//! Localized user-facing strings.
//!
//! Spanish is the default; every message has an English rendering too.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Es,
    En,
}

/// Every string the views show that depends on the locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Message {
    LoginInvalid,
    LoginFailed,
    SignupInvalidEmail,
    PasswordTooShort,
    PasswordNeedsLetterAndDigit,
    UsernameEmpty,
    SignupFailed,
    LoginButton,
    LoginInProgress,
    SignupButton,
    SignupInProgress,
    NoAccountPrompt,
    HaveAccountPrompt,
    Welcome,
    Logout,
    CheckingSession,
}

impl Locale {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "es" | "es-es" | "spanish" => Some(Locale::Es),
            "en" | "en-us" | "en-gb" | "english" => Some(Locale::En),
            _ => None,
        }
    }

    pub fn text(self, message: Message) -> &'static str {
        match self {
            Locale::Es => spanish(message),
            Locale::En => english(message),
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locale::Es => f.write_str("es"),
            Locale::En => f.write_str("en"),
        }
    }
}

fn spanish(message: Message) -> &'static str {
    match message {
        Message::LoginInvalid => "Por favor, introduce un email y contraseña válidos.",
        Message::LoginFailed => "Error al iniciar sesión.",
        Message::SignupInvalidEmail => "Por favor, introduce un email válido.",
        Message::PasswordTooShort => "La contraseña debe tener al menos 8 caracteres.",
        Message::PasswordNeedsLetterAndDigit => {
            "La contraseña debe contener al menos una letra y un número."
        }
        Message::UsernameEmpty => "El nombre de usuario no puede estar vacío.",
        Message::SignupFailed => "Error al registrarse.",
        Message::LoginButton => "Login",
        Message::LoginInProgress => "Iniciando...",
        Message::SignupButton => "Sign Up",
        Message::SignupInProgress => "Registrando...",
        Message::NoAccountPrompt => "¿No tienes cuenta?",
        Message::HaveAccountPrompt => "¿Ya tienes cuenta?",
        Message::Welcome => "Bienvenido",
        Message::Logout => "Cerrar sesión",
        Message::CheckingSession => "Comprobando sesión...",
    }
}

fn english(message: Message) -> &'static str {
    match message {
        Message::LoginInvalid => "Please enter a valid email and password.",
        Message::LoginFailed => "Login failed.",
        Message::SignupInvalidEmail => "Please enter a valid email.",
        Message::PasswordTooShort => "Password must be at least 8 characters long.",
        Message::PasswordNeedsLetterAndDigit => {
            "Password must contain at least one letter and one number."
        }
        Message::UsernameEmpty => "Username cannot be empty.",
        Message::SignupFailed => "Signup failed.",
        Message::LoginButton => "Login",
        Message::LoginInProgress => "Logging in...",
        Message::SignupButton => "Sign Up",
        Message::SignupInProgress => "Signing up...",
        Message::NoAccountPrompt => "Don't have an account?",
        Message::HaveAccountPrompt => "Already have an account?",
        Message::Welcome => "Welcome",
        Message::Logout => "Logout",
        Message::CheckingSession => "Checking session...",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_locale_is_spanish() {
        assert_eq!(Locale::default(), Locale::Es);
        assert_eq!(
            Locale::default().text(Message::LoginFailed),
            "Error al iniciar sesión."
        );
    }

    #[test]
    fn test_parse_locale() {
        assert_eq!(Locale::parse("EN"), Some(Locale::En));
        assert_eq!(Locale::parse(" es "), Some(Locale::Es));
        assert_eq!(Locale::parse("fr"), None);
    }

    #[test]
    fn test_locale_serde_lowercase() {
        assert_eq!(serde_json::to_string(&Locale::En).unwrap(), "\"en\"");
        let parsed: Locale = serde_json::from_str("\"es\"").unwrap();
        assert_eq!(parsed, Locale::Es);
    }

    #[test]
    fn test_english_messages_differ() {
        assert_eq!(
            Locale::En.text(Message::PasswordTooShort),
            "Password must be at least 8 characters long."
        );
        assert_ne!(
            Locale::En.text(Message::SignupFailed),
            Locale::Es.text(Message::SignupFailed)
        );
    }
}
