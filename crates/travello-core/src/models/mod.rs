//! Wire types exchanged with the auth API.
//!
//! - `Credentials`: login/signup payload, built per submission
//! - `AuthResponse`: token returned by login and signup
//! - `User`: identity returned when a token is verified

pub mod user;

pub use user::{AuthResponse, Credentials, User};
