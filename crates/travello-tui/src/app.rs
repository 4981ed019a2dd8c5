//! Application state for the Travello terminal client.
//!
//! `App` owns the session, one instance of each view, and the current route.
//! Remote calls started from the forms run as Tokio tasks and report back over
//! an mpsc channel that the event loop drains every frame.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info};

use travello_core::api::{ApiError, AuthApi};
use travello_core::auth::TokenStore;
use travello_core::forms::{LoginForm, ProfileView, SignupForm};
use travello_core::models::AuthResponse;
use travello_core::{Config, Route, SessionContext};

// ============================================================================
// Constants
// ============================================================================

/// Buffer size for the background task message channel.
/// At most one login and one signup can be in flight.
const CHANNEL_BUFFER_SIZE: usize = 4;

/// Overall application state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Normal,
    ShowingHelp,
    ConfirmingQuit,
    Quitting,
}

/// Results sent back from background tasks, tagged with the view that started them.
enum TaskResult {
    Login(Result<AuthResponse, ApiError>),
    Signup(Result<AuthResponse, ApiError>),
}

pub struct App {
    pub config: Config,
    pub session: SessionContext,
    pub state: AppState,
    /// Base URL requests go to, shown in the status bar
    pub server: String,

    route: Route,
    pub login: LoginForm,
    pub signup: SignupForm,
    pub profile: ProfileView,

    task_tx: mpsc::Sender<TaskResult>,
    task_rx: mpsc::Receiver<TaskResult>,
}

impl App {
    pub fn new(config: Config, api: Arc<dyn AuthApi>, store: Arc<dyn TokenStore>) -> Self {
        let session = SessionContext::new(Arc::clone(&api), store);
        let locale = config.locale;

        let login = LoginForm::new(Arc::clone(&api), session.clone(), locale)
            .with_email(config.last_email.clone().unwrap_or_default());
        let signup = SignupForm::new(api, session.clone(), locale);
        let profile = ProfileView::new(session.clone(), locale);

        let (task_tx, task_rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);

        Self {
            server: config.api_base_url(),
            config,
            session,
            state: AppState::Normal,
            route: Route::Home,
            login,
            signup,
            profile,
            task_tx,
            task_rx,
        }
    }

    /// Kick off the one startup check of the stored token
    pub fn start(&self) {
        debug!("Starting session check");
        self.session.spawn_authentication();
    }

    /// The route last asked for
    pub fn route(&self) -> Route {
        self.route
    }

    /// The route to draw, after the session's redirects
    pub fn visible_route(&self) -> Route {
        self.session.guard(self.route)
    }

    /// Switch views. Leaving a form resets it.
    pub fn navigate(&mut self, route: Route) {
        let route = self.session.guard(route);
        if route == self.route {
            return;
        }
        match self.route {
            Route::Login => self.login.reset(),
            Route::Signup => self.signup.reset(),
            Route::Home | Route::Profile => {}
        }
        debug!(from = %self.route, to = %route, "Navigating");
        self.route = route;
    }

    // =========================================================================
    // Actions
    // =========================================================================

    pub fn submit_login(&mut self) {
        let Some(credentials) = self.login.begin_submit() else {
            return;
        };
        let api = self.login.api();
        let tx = self.task_tx.clone();
        tokio::spawn(async move {
            let result = api.login(&credentials).await;
            if tx.send(TaskResult::Login(result)).await.is_err() {
                debug!("App closed before login finished");
            }
        });
    }

    pub fn submit_signup(&mut self) {
        let Some(credentials) = self.signup.begin_submit() else {
            return;
        };
        let api = self.signup.api();
        let tx = self.task_tx.clone();
        tokio::spawn(async move {
            let result = api.signup(&credentials).await;
            if tx.send(TaskResult::Signup(result)).await.is_err() {
                debug!("App closed before signup finished");
            }
        });
    }

    pub fn logout(&mut self) {
        let next = self.profile.logout();
        self.navigate(next);
    }

    // =========================================================================
    // Event loop hooks
    // =========================================================================

    /// Apply every finished background task
    pub fn check_background_tasks(&mut self) {
        while let Ok(result) = self.task_rx.try_recv() {
            self.process_task_result(result);
        }
    }

    /// Results always land on their own form, but only move the user if that
    /// form is still on screen.
    fn process_task_result(&mut self, result: TaskResult) {
        match result {
            TaskResult::Login(result) => {
                if let Some(next) = self.login.finish_submit(result) {
                    info!("Signed in from login form");
                    if let Some(email) = self.login.submitted_email() {
                        self.config.last_email = Some(email.to_string());
                    }
                    if self.route == Route::Login {
                        self.navigate(next);
                    }
                }
            }
            TaskResult::Signup(result) => {
                if let Some(next) = self.signup.finish_submit(result) {
                    info!("Signed in from signup form");
                    // The form may have been reset while the request was out
                    if let Some(email) = self.signup.submitted_email() {
                        self.config.last_email = Some(email.to_string());
                        self.login.email = email.to_string();
                    }
                    if self.route == Route::Signup {
                        self.navigate(next);
                    }
                }
            }
        }
    }

    /// Expire error messages and follow redirects caused by session changes
    pub fn tick(&mut self) {
        self.login.tick();
        self.signup.tick();

        let visible = self.visible_route();
        if visible != self.route {
            self.navigate(visible);
        }
    }

    /// Wait for the next background result and apply it
    #[cfg(test)]
    async fn next_task_result(&mut self) {
        if let Some(result) = self.task_rx.recv().await {
            self.process_task_result(result);
        }
    }
}
