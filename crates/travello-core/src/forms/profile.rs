use tracing::debug;

use crate::auth::SessionContext;
use crate::i18n::{Locale, Message};
use crate::models::User;
use crate::routes::Route;

/// Shown when the server gave no usable username
pub const DEFAULT_DISPLAY_NAME: &str = "User";

pub fn display_name(user: Option<&User>) -> String {
    user.and_then(User::username)
        .unwrap_or(DEFAULT_DISPLAY_NAME)
        .to_string()
}

/// The signed-in user's page: a greeting and a logout action.
#[derive(Clone)]
pub struct ProfileView {
    session: SessionContext,
    locale: Locale,
}

impl ProfileView {
    pub fn new(session: SessionContext, locale: Locale) -> Self {
        Self { session, locale }
    }

    pub fn display_name(&self) -> String {
        display_name(self.session.user().as_ref())
    }

    pub fn greeting(&self) -> String {
        format!("{}, {}", self.locale.text(Message::Welcome), self.display_name())
    }

    pub fn logout_label(&self) -> &'static str {
        self.locale.text(Message::Logout)
    }

    /// Sign out locally and go home
    pub fn logout(&self) -> Route {
        debug!("Logout requested from profile");
        self.session.log_out_user();
        Route::Home
    }
}
