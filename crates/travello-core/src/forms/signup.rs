use std::sync::Arc;

use tracing::{debug, info};

use super::validation::validate_signup;
use super::{
    accept_response, push_limited, FlashMessage, MAX_EMAIL_LENGTH, MAX_PASSWORD_LENGTH,
    MAX_USERNAME_LENGTH,
};
use crate::api::{ApiError, AuthApi};
use crate::auth::SessionContext;
use crate::i18n::{Locale, Message};
use crate::models::{AuthResponse, Credentials};
use crate::routes::Route;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignupFocus {
    Email,
    Password,
    Username,
    Submit,
    LoginLink,
}

impl SignupFocus {
    pub fn next(&self) -> Self {
        match self {
            SignupFocus::Email => SignupFocus::Password,
            SignupFocus::Password => SignupFocus::Username,
            SignupFocus::Username => SignupFocus::Submit,
            SignupFocus::Submit => SignupFocus::LoginLink,
            SignupFocus::LoginLink => SignupFocus::Email,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            SignupFocus::Email => SignupFocus::LoginLink,
            SignupFocus::Password => SignupFocus::Email,
            SignupFocus::Username => SignupFocus::Password,
            SignupFocus::Submit => SignupFocus::Username,
            SignupFocus::LoginLink => SignupFocus::Submit,
        }
    }
}

/// Account creation form. A successful signup signs the new user in directly.
pub struct SignupForm {
    pub email: String,
    pub password: String,
    pub username: String,
    pub focus: SignupFocus,
    error: FlashMessage,
    loading: bool,
    submitted_email: Option<String>,
    locale: Locale,
    api: Arc<dyn AuthApi>,
    session: SessionContext,
}

impl SignupForm {
    pub fn new(api: Arc<dyn AuthApi>, session: SessionContext, locale: Locale) -> Self {
        Self {
            email: String::new(),
            password: String::new(),
            username: String::new(),
            focus: SignupFocus::Email,
            error: FlashMessage::default(),
            loading: false,
            submitted_email: None,
            locale,
            api,
            session,
        }
    }

    pub fn api(&self) -> Arc<dyn AuthApi> {
        Arc::clone(&self.api)
    }

    pub fn error(&self) -> Option<&str> {
        self.error.text()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Email of the last submission that passed validation. Survives `reset`.
    pub fn submitted_email(&self) -> Option<&str> {
        self.submitted_email.as_deref()
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn submit_label(&self) -> &'static str {
        let message = if self.loading {
            Message::SignupInProgress
        } else {
            Message::SignupButton
        };
        self.locale.text(message)
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn focus_prev(&mut self) {
        self.focus = self.focus.prev();
    }

    pub fn input_char(&mut self, c: char) {
        if self.loading {
            return;
        }
        match self.focus {
            SignupFocus::Email => push_limited(&mut self.email, c, MAX_EMAIL_LENGTH),
            SignupFocus::Password => push_limited(&mut self.password, c, MAX_PASSWORD_LENGTH),
            SignupFocus::Username => push_limited(&mut self.username, c, MAX_USERNAME_LENGTH),
            SignupFocus::Submit | SignupFocus::LoginLink => {}
        }
    }

    pub fn backspace(&mut self) {
        if self.loading {
            return;
        }
        let field = match self.focus {
            SignupFocus::Email => &mut self.email,
            SignupFocus::Password => &mut self.password,
            SignupFocus::Username => &mut self.username,
            SignupFocus::Submit | SignupFocus::LoginLink => return,
        };
        field.pop();
    }

    pub fn tick(&mut self) -> bool {
        self.error.tick()
    }

    /// Clear every field. Half-typed signups are not worth keeping.
    pub fn reset(&mut self) {
        self.email.clear();
        self.password.clear();
        self.username.clear();
        self.error.clear();
        self.focus = SignupFocus::Email;
    }

    /// Validate and mark the form as submitting. `None` when validation failed
    /// or a submission is already in flight.
    pub fn begin_submit(&mut self) -> Option<Credentials> {
        if self.loading {
            debug!("Signup already in flight");
            return None;
        }
        self.loading = true;

        if let Err(e) = validate_signup(&self.email, &self.password, &self.username) {
            debug!(reason = %e, "Signup rejected client-side");
            self.error.set(self.locale.text(e.message()));
            self.loading = false;
            return None;
        }

        self.submitted_email = Some(self.email.clone());
        Some(Credentials::signup(
            self.email.clone(),
            self.password.clone(),
            self.username.clone(),
        ))
    }

    fn accept(&mut self, result: Result<AuthResponse, ApiError>) -> bool {
        let default_message = self.locale.text(Message::SignupFailed);
        let stored = accept_response(result, &self.session, &mut self.error, default_message);
        self.loading = false;
        if stored {
            self.password.clear();
            info!(username = %self.username, "Signup successful");
        }
        stored
    }

    pub fn finish_submit(&mut self, result: Result<AuthResponse, ApiError>) -> Option<Route> {
        if !self.accept(result) {
            return None;
        }
        self.session.spawn_authentication();
        Some(Route::Home)
    }

    pub async fn submit(&mut self) -> Option<Route> {
        let credentials = self.begin_submit()?;
        let result = self.api.signup(&credentials).await;
        if !self.accept(result) {
            return None;
        }
        self.session.authenticate_user().await;
        Some(Route::Home)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;
    use reqwest::StatusCode;

    use super::*;
    use crate::auth::{MemoryTokenStore, SessionState, TokenStore};
    use crate::models::User;

    struct StubApi {
        signup_result: Mutex<Option<Result<AuthResponse, ApiError>>>,
        signup_calls: AtomicUsize,
        last_credentials: Mutex<Option<Credentials>>,
    }

    impl StubApi {
        fn answering(result: Result<AuthResponse, ApiError>) -> Arc<Self> {
            Arc::new(Self {
                signup_result: Mutex::new(Some(result)),
                signup_calls: AtomicUsize::new(0),
                last_credentials: Mutex::new(None),
            })
        }

        fn calls(&self) -> usize {
            self.signup_calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl AuthApi for StubApi {
        async fn login(&self, _credentials: &Credentials) -> Result<AuthResponse, ApiError> {
            unreachable!("signup form never logs in")
        }

        async fn signup(&self, credentials: &Credentials) -> Result<AuthResponse, ApiError> {
            self.signup_calls.fetch_add(1, Ordering::SeqCst);
            *self.last_credentials.lock().unwrap() = Some(credentials.clone());
            self.signup_result
                .lock()
                .unwrap()
                .take()
                .expect("signup called more than once")
        }

        async fn verify(&self) -> Result<User, ApiError> {
            Ok(User {
                id: "u2".to_string(),
                username: Some("nuevo".to_string()),
                email: Some("n@b.com".to_string()),
                extra: HashMap::new(),
            })
        }
    }

    fn form_with(api: Arc<StubApi>) -> (SignupForm, SessionContext, Arc<MemoryTokenStore>) {
        let store = Arc::new(MemoryTokenStore::default());
        let session = SessionContext::new(api.clone(), store.clone());
        let form = SignupForm::new(api, session.clone(), Locale::Es);
        (form, session, store)
    }

    fn fill(form: &mut SignupForm, email: &str, password: &str, username: &str) {
        form.email = email.to_string();
        form.password = password.to_string();
        form.username = username.to_string();
    }

    #[tokio::test]
    async fn test_successful_signup_signs_in() {
        let api = StubApi::answering(Ok(AuthResponse {
            auth_token: "T2".to_string(),
        }));
        let (mut form, session, store) = form_with(api.clone());
        fill(&mut form, "n@b.com", "abcdefg1", "nuevo");

        assert_eq!(form.submit().await, Some(Route::Home));
        assert_eq!(store.load().unwrap().as_deref(), Some("T2"));
        assert!(matches!(session.state(), SessionState::Authenticated(_)));

        let sent = api.last_credentials.lock().unwrap().clone().unwrap();
        assert_eq!(sent, Credentials::signup("n@b.com", "abcdefg1", "nuevo"));
    }

    #[tokio::test]
    async fn test_submitted_email_survives_reset() {
        let api = StubApi::answering(Ok(AuthResponse {
            auth_token: "T2".to_string(),
        }));
        let (mut form, _, _) = form_with(api);
        fill(&mut form, "n@b.com", "abcdefg1", "nuevo");
        assert_eq!(form.submitted_email(), None);

        assert!(form.begin_submit().is_some());
        form.reset();
        assert!(form.email.is_empty());
        assert_eq!(form.submitted_email(), Some("n@b.com"));
    }

    #[tokio::test]
    async fn test_short_password_blocks_request() {
        let api = StubApi::answering(Ok(AuthResponse {
            auth_token: "T2".to_string(),
        }));
        let (mut form, _, _) = form_with(api.clone());
        fill(&mut form, "n@b.com", "short", "nuevo");

        assert_eq!(form.submit().await, None);
        assert_eq!(api.calls(), 0);
        assert_eq!(
            form.error(),
            Some("La contraseña debe tener al menos 8 caracteres.")
        );
        assert!(!form.is_loading());
    }

    #[tokio::test]
    async fn test_validation_messages_in_order() {
        let cases = [
            ("bad", "short", "", "Por favor, introduce un email válido."),
            (
                "n@b.com",
                "abcdefgh",
                "nuevo",
                "La contraseña debe contener al menos una letra y un número.",
            ),
            (
                "n@b.com",
                "abcdefg1",
                "   ",
                "El nombre de usuario no puede estar vacío.",
            ),
        ];
        for (email, password, username, expected) in cases {
            let api = StubApi::answering(Ok(AuthResponse {
                auth_token: "T2".to_string(),
            }));
            let (mut form, _, _) = form_with(api.clone());
            fill(&mut form, email, password, username);

            assert_eq!(form.submit().await, None);
            assert_eq!(form.error(), Some(expected));
            assert_eq!(api.calls(), 0);
        }
    }

    #[tokio::test]
    async fn test_server_rejection_shows_message() {
        let api = StubApi::answering(Err(ApiError::from_status(
            StatusCode::BAD_REQUEST,
            r#"{"message":"Email already registered"}"#,
        )));
        let (mut form, _, store) = form_with(api);
        fill(&mut form, "n@b.com", "abcdefg1", "nuevo");

        assert_eq!(form.submit().await, None);
        assert_eq!(form.error(), Some("Email already registered"));
        assert_eq!(store.load().unwrap(), None);
        // Fields survive so the user can fix and resubmit
        assert_eq!(form.password, "abcdefg1");
    }

    #[tokio::test]
    async fn test_server_rejection_without_message_uses_default() {
        let api = StubApi::answering(Err(ApiError::InvalidResponse("no body".to_string())));
        let (mut form, _, _) = form_with(api);
        fill(&mut form, "n@b.com", "abcdefg1", "nuevo");

        form.submit().await;
        assert_eq!(form.error(), Some("Error al registrarse."));
    }

    #[tokio::test]
    async fn test_loading_label_and_double_submit() {
        let api = StubApi::answering(Ok(AuthResponse {
            auth_token: "T2".to_string(),
        }));
        let (mut form, _, _) = form_with(api);
        fill(&mut form, "n@b.com", "abcdefg1", "nuevo");

        assert_eq!(form.submit_label(), "Sign Up");
        assert!(form.begin_submit().is_some());
        assert_eq!(form.submit_label(), "Registrando...");
        assert!(form.begin_submit().is_none());
    }

    #[test]
    fn test_username_is_capped() {
        let api = StubApi::answering(Ok(AuthResponse {
            auth_token: "T2".to_string(),
        }));
        let (mut form, _, _) = form_with(api);
        form.focus = SignupFocus::Username;
        for _ in 0..(MAX_USERNAME_LENGTH + 10) {
            form.input_char('x');
        }
        assert_eq!(form.username.chars().count(), MAX_USERNAME_LENGTH);

        form.reset();
        assert!(form.username.is_empty());
        assert_eq!(form.focus, SignupFocus::Email);
    }

    #[test]
    fn test_focus_cycle() {
        let mut focus = SignupFocus::Email;
        for _ in 0..5 {
            focus = focus.next();
        }
        assert_eq!(focus, SignupFocus::Email);
        assert_eq!(SignupFocus::Username.prev(), SignupFocus::Password);
    }
}
