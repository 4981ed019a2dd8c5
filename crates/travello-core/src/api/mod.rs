//! REST API client module for the Travello auth server.
//!
//! `HttpClient` attaches the persisted bearer token to every request and
//! applies a fixed timeout. `AuthService` turns the `login`, `signup` and
//! `verify` endpoints into typed calls behind the `AuthApi` trait.

pub mod client;
pub mod error;
pub mod service;

pub use client::HttpClient;
pub use error::ApiError;
pub use service::{AuthApi, AuthService};
