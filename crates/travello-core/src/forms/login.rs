use std::sync::Arc;

use tracing::{debug, info};

use super::validation::validate_login;
use super::{accept_response, push_limited, FlashMessage, MAX_EMAIL_LENGTH, MAX_PASSWORD_LENGTH};
use crate::api::{ApiError, AuthApi};
use crate::auth::SessionContext;
use crate::i18n::{Locale, Message};
use crate::models::{AuthResponse, Credentials};
use crate::routes::Route;

/// Login form focus state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginFocus {
    Email,
    Password,
    Submit,
    SignupLink,
}

impl LoginFocus {
    pub fn next(&self) -> Self {
        match self {
            LoginFocus::Email => LoginFocus::Password,
            LoginFocus::Password => LoginFocus::Submit,
            LoginFocus::Submit => LoginFocus::SignupLink,
            LoginFocus::SignupLink => LoginFocus::Email,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            LoginFocus::Email => LoginFocus::SignupLink,
            LoginFocus::Password => LoginFocus::Email,
            LoginFocus::Submit => LoginFocus::Password,
            LoginFocus::SignupLink => LoginFocus::Submit,
        }
    }
}

pub struct LoginForm {
    pub email: String,
    pub password: String,
    pub focus: LoginFocus,
    error: FlashMessage,
    loading: bool,
    submitted_email: Option<String>,
    locale: Locale,
    api: Arc<dyn AuthApi>,
    session: SessionContext,
}

impl LoginForm {
    pub fn new(api: Arc<dyn AuthApi>, session: SessionContext, locale: Locale) -> Self {
        Self {
            email: String::new(),
            password: String::new(),
            focus: LoginFocus::Email,
            error: FlashMessage::default(),
            loading: false,
            submitted_email: None,
            locale,
            api,
            session,
        }
    }

    /// Prefill the email field (e.g. the last address that signed in)
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = email.into();
        if !self.email.is_empty() {
            self.focus = LoginFocus::Password;
        }
        self
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
        if self.loading {
            self.locale.text(Message::LoginInProgress)
        } else {
            self.locale.text(Message::LoginButton)
        }
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn focus_prev(&mut self) {
        self.focus = self.focus.prev();
    }

    /// Type into the focused field. Ignored on buttons and while submitting.
    pub fn input_char(&mut self, c: char) {
        if self.loading {
            return;
        }
        match self.focus {
            LoginFocus::Email => push_limited(&mut self.email, c, MAX_EMAIL_LENGTH),
            LoginFocus::Password => push_limited(&mut self.password, c, MAX_PASSWORD_LENGTH),
            LoginFocus::Submit | LoginFocus::SignupLink => {}
        }
    }

    pub fn backspace(&mut self) {
        if self.loading {
            return;
        }
        match self.focus {
            LoginFocus::Email => {
                self.email.pop();
            }
            LoginFocus::Password => {
                self.password.pop();
            }
            LoginFocus::Submit | LoginFocus::SignupLink => {}
        }
    }

    /// Expire the error message if its window has passed
    pub fn tick(&mut self) -> bool {
        self.error.tick()
    }

    /// Leave the view: forget the password and any pending message.
    /// The email stays so returning to the form is painless.
    pub fn reset(&mut self) {
        self.password.clear();
        self.error.clear();
        self.focus = if self.email.is_empty() {
            LoginFocus::Email
        } else {
            LoginFocus::Password
        };
    }

    /// Validate and mark the form as submitting.
    ///
    /// Returns the credentials to send, or `None` when validation failed (the
    /// message is set) or a submission is already in flight.
    pub fn begin_submit(&mut self) -> Option<Credentials> {
        if self.loading {
            debug!("Login already in flight");
            return None;
        }
        self.loading = true;

        if let Err(e) = validate_login(&self.email, &self.password) {
            debug!(reason = %e, "Login rejected client-side");
            self.error.set(self.locale.text(e.message()));
            self.loading = false;
            return None;
        }

        self.submitted_email = Some(self.email.clone());
        Some(Credentials::login(self.email.clone(), self.password.clone()))
    }

    fn accept(&mut self, result: Result<AuthResponse, ApiError>) -> bool {
        let default_message = self.locale.text(Message::LoginFailed);
        let stored = accept_response(result, &self.session, &mut self.error, default_message);
        self.loading = false;
        if stored {
            self.password.clear();
            info!("Login successful");
        }
        stored
    }

    /// Apply the service's answer to a submission started with `begin_submit`.
    ///
    /// On success the token is stored, the session re-validates in the background,
    /// and the home route is returned.
    pub fn finish_submit(&mut self, result: Result<AuthResponse, ApiError>) -> Option<Route> {
        if !self.accept(result) {
            return None;
        }
        self.session.spawn_authentication();
        Some(Route::Home)
    }

    /// Validate, call the service, and settle the session before returning.
    pub async fn submit(&mut self) -> Option<Route> {
        let credentials = self.begin_submit()?;
        let result = self.api.login(&credentials).await;
        if !self.accept(result) {
            return None;
        }
        self.session.authenticate_user().await;
        Some(Route::Home)
    }
}
