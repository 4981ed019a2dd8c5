//! Keyboard input handling for the TUI.
//!
//! This module translates key events into view and navigation changes.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use travello_core::forms::{LoginFocus, SignupFocus};
use travello_core::Route;

use crate::app::{App, AppState};

/// Handle keyboard input. Returns true if the app should quit.
pub fn handle_input(app: &mut App, key: KeyEvent) -> bool {
    // Handle help overlay
    if matches!(app.state, AppState::ShowingHelp) {
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
            app.state = AppState::Normal;
        }
        return false;
    }

    // Handle quit confirmation
    if matches!(app.state, AppState::ConfirmingQuit) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                app.state = AppState::Quitting;
                return true;
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                app.state = AppState::Normal;
            }
            _ => {}
        }
        return false;
    }

    // Nothing to interact with until the session check settles
    if app.session.is_loading() {
        handle_global_input(app, key);
        return false;
    }

    match app.visible_route() {
        Route::Login => handle_login_input(app, key),
        Route::Signup => handle_signup_input(app, key),
        Route::Profile if key.code == KeyCode::Enter => app.logout(),
        Route::Home | Route::Profile => handle_global_input(app, key),
    }
    false
}

fn handle_global_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.state = AppState::ConfirmingQuit,
        KeyCode::Char('?') => app.state = AppState::ShowingHelp,
        KeyCode::Char('h') | KeyCode::Esc => app.navigate(Route::Home),
        KeyCode::Char('l') => app.navigate(Route::Login),
        KeyCode::Char('s') => app.navigate(Route::Signup),
        KeyCode::Char('p') => app.navigate(Route::Profile),
        KeyCode::Char('o') if app.session.is_logged_in() => app.logout(),
        _ => {}
    }
}

/// Printable input, excluding chords like Ctrl+U
fn typed_char(key: &KeyEvent) -> Option<char> {
    match key.code {
        KeyCode::Char(c)
            if !key
                .modifiers
                .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
        {
            Some(c)
        }
        _ => None,
    }
}

fn handle_login_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.navigate(Route::Home),
        KeyCode::Down | KeyCode::Tab => app.login.focus_next(),
        KeyCode::Up | KeyCode::BackTab => app.login.focus_prev(),
        KeyCode::Enter => match app.login.focus {
            LoginFocus::Email => app.login.focus_next(),
            LoginFocus::Password | LoginFocus::Submit => app.submit_login(),
            LoginFocus::SignupLink => app.navigate(Route::Signup),
        },
        KeyCode::Backspace => app.login.backspace(),
        _ => {
            if let Some(c) = typed_char(&key) {
                app.login.input_char(c);
            }
        }
    }
}

fn handle_signup_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.navigate(Route::Home),
        KeyCode::Down | KeyCode::Tab => app.signup.focus_next(),
        KeyCode::Up | KeyCode::BackTab => app.signup.focus_prev(),
        KeyCode::Enter => match app.signup.focus {
            SignupFocus::Email | SignupFocus::Password => app.signup.focus_next(),
            SignupFocus::Username | SignupFocus::Submit => app.submit_signup(),
            SignupFocus::LoginLink => app.navigate(Route::Login),
        },
        KeyCode::Backspace => app.signup.backspace(),
        _ => {
            if let Some(c) = typed_char(&key) {
                app.signup.input_char(c);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use travello_core::api::{ApiError, AuthApi};
    use travello_core::auth::MemoryTokenStore;
    use travello_core::models::{AuthResponse, Credentials, User};
    use travello_core::Config;

    use super::*;

    /// Never called: these tests stop before anything is submitted
    struct OfflineApi;

    #[async_trait]
    impl AuthApi for OfflineApi {
        async fn login(&self, _credentials: &Credentials) -> Result<AuthResponse, ApiError> {
            Err(ApiError::InvalidResponse("offline".to_string()))
        }

        async fn signup(&self, _credentials: &Credentials) -> Result<AuthResponse, ApiError> {
            Err(ApiError::InvalidResponse("offline".to_string()))
        }

        async fn verify(&self) -> Result<User, ApiError> {
            Err(ApiError::InvalidResponse("offline".to_string()))
        }
    }

    async fn signed_out_app() -> App {
        let app = App::new(
            Config::default(),
            Arc::new(OfflineApi),
            Arc::new(MemoryTokenStore::default()),
        );
        app.session.authenticate_user().await;
        app
    }

    fn press(app: &mut App, code: KeyCode) -> bool {
        handle_input(app, KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_str(app: &mut App, s: &str) {
        for c in s.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    #[tokio::test]
    async fn test_home_shortcuts_navigate() {
        let mut app = signed_out_app().await;

        press(&mut app, KeyCode::Char('l'));
        assert_eq!(app.route(), Route::Login);

        press(&mut app, KeyCode::Esc);
        press(&mut app, KeyCode::Char('s'));
        assert_eq!(app.route(), Route::Signup);

        press(&mut app, KeyCode::Esc);
        press(&mut app, KeyCode::Char('p'));
        // Profile needs a session
        assert_eq!(app.route(), Route::Login);
    }

    #[tokio::test]
    async fn test_typing_fills_login_fields() {
        let mut app = signed_out_app().await;
        press(&mut app, KeyCode::Char('l'));

        // Letters that are shortcuts elsewhere are plain text in a form
        type_str(&mut app, "lqs@b.com");
        press(&mut app, KeyCode::Tab);
        type_str(&mut app, "pw");
        press(&mut app, KeyCode::Backspace);

        assert_eq!(app.login.email, "lqs@b.com");
        assert_eq!(app.login.password, "p");
        assert_eq!(app.route(), Route::Login);
        assert_eq!(app.state, AppState::Normal);
    }

    #[tokio::test]
    async fn test_control_chords_are_not_typed() {
        let mut app = signed_out_app().await;
        press(&mut app, KeyCode::Char('l'));

        handle_input(
            &mut app,
            KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL),
        );
        assert!(app.login.email.is_empty());
    }

    #[tokio::test]
    async fn test_enter_on_link_switches_form() {
        let mut app = signed_out_app().await;
        press(&mut app, KeyCode::Char('l'));
        press(&mut app, KeyCode::BackTab);
        assert_eq!(app.login.focus, LoginFocus::SignupLink);

        press(&mut app, KeyCode::Enter);
        assert_eq!(app.route(), Route::Signup);
    }

    #[tokio::test]
    async fn test_enter_with_bad_input_shows_error() {
        let mut app = signed_out_app().await;
        press(&mut app, KeyCode::Char('s'));
        type_str(&mut app, "n@b.com");
        press(&mut app, KeyCode::Enter);
        type_str(&mut app, "short");
        press(&mut app, KeyCode::Enter);
        type_str(&mut app, "nuevo");
        press(&mut app, KeyCode::Enter);

        assert_eq!(
            app.signup.error(),
            Some("La contraseña debe tener al menos 8 caracteres.")
        );
        assert!(!app.signup.is_loading());
    }

    #[tokio::test]
    async fn test_quit_flow() {
        let mut app = signed_out_app().await;

        assert!(!press(&mut app, KeyCode::Char('q')));
        assert_eq!(app.state, AppState::ConfirmingQuit);
        assert!(!press(&mut app, KeyCode::Char('n')));
        assert_eq!(app.state, AppState::Normal);

        press(&mut app, KeyCode::Char('q'));
        assert!(press(&mut app, KeyCode::Char('y')));
        assert_eq!(app.state, AppState::Quitting);
    }

    #[tokio::test]
    async fn test_help_overlay_swallows_keys() {
        let mut app = signed_out_app().await;
        press(&mut app, KeyCode::Char('?'));
        assert_eq!(app.state, AppState::ShowingHelp);

        press(&mut app, KeyCode::Char('l'));
        assert_eq!(app.route(), Route::Home);

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.state, AppState::Normal);
    }
}
