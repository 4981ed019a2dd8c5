//! Authentication module for managing the user session and its token.
//!
//! This module provides:
//! - `SessionContext`: the single owner of session state and the token slot
//! - `TokenStore`: durable storage for the token (file, OS keyring, or memory)
//!
//! A token survives restarts; the user behind it is re-validated on every start.

pub mod credentials;
pub mod session;
pub mod token_store;

pub use credentials::KeyringTokenStore;
pub use session::{SessionContext, SessionState};
pub use token_store::{
    open_token_store, FileTokenStore, MemoryTokenStore, TokenBackend, TokenStore, TOKEN_KEY,
};
