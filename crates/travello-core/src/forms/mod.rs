//! Headless views: form state, validation and submission, with no rendering.
//!
//! - `LoginForm`, `SignupForm`: editable fields, one auto-dismissing error slot,
//!   and a loading flag that blocks double submission
//! - `ProfileView`: the signed-in user's name and the logout action
//!
//! Views receive the `SessionContext` and the `AuthApi` at construction and
//! report where to navigate next as a `Route`.

pub mod flash;
pub mod login;
pub mod profile;
pub mod signup;
pub mod validation;

pub use flash::{FlashMessage, DISMISS_AFTER};
pub use login::{LoginFocus, LoginForm};
pub use profile::{display_name, ProfileView, DEFAULT_DISPLAY_NAME};
pub use signup::{SignupFocus, SignupForm};
pub use validation::ValidationError;

use tracing::warn;

use crate::api::ApiError;
use crate::auth::SessionContext;
use crate::models::AuthResponse;

/// Maximum length for email input.
pub const MAX_EMAIL_LENGTH: usize = 50;

/// Maximum length for username input.
pub const MAX_USERNAME_LENGTH: usize = 50;

/// Maximum length for password input.
/// 128 chars accommodates password managers and passphrases.
pub const MAX_PASSWORD_LENGTH: usize = 128;

/// Check if a character is valid for input (no control characters)
fn is_valid_input_char(c: char) -> bool {
    !c.is_control()
}

/// Append `c` to `field` if it is printable and the field has room
fn push_limited(field: &mut String, c: char, max_chars: usize) {
    if is_valid_input_char(c) && field.chars().count() < max_chars {
        field.push(c);
    }
}

/// Turn a login/signup result into session and display state.
///
/// On success the token is handed to the session; on failure the server's message,
/// or `default_message` when there is none, goes into `error`. Returns whether the
/// token was stored.
fn accept_response(
    result: Result<AuthResponse, ApiError>,
    session: &SessionContext,
    error: &mut FlashMessage,
    default_message: &str,
) -> bool {
    match result {
        Ok(response) => match session.store_token(&response.auth_token) {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "Failed to store token");
                error.set(default_message);
                false
            }
        },
        Err(e) => {
            error.set(e.server_message().unwrap_or(default_message));
            false
        }
    }
}
