//! Core library for the Travello client.
//!
//! Everything a front end needs to sign users in and keep them signed in:
//!
//! - `api`: token-bearing HTTP client and the remote auth service
//! - `auth`: the session context and persisted token storage
//! - `forms`: headless login, signup and profile views
//! - `config`, `i18n`, `routes`: configuration, localized strings, navigation targets
//!
//! Renderers own a [`SessionContext`] and pass it to the views; nothing here is global.

pub mod api;
pub mod auth;
pub mod config;
pub mod forms;
pub mod i18n;
pub mod models;
pub mod routes;

pub use api::{ApiError, AuthApi, AuthService, HttpClient};
pub use auth::{SessionContext, SessionState, TokenStore};
pub use config::Config;
pub use i18n::Locale;
pub use routes::Route;
