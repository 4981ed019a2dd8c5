//! The session context: current authentication state plus the token slot.
//!
//! `SessionContext` is a cheap, cloneable handle. Every clone sees the same state,
//! and state only changes through the methods here. Renderers either poll
//! `state()` or `subscribe()` to a watch channel.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use anyhow::Result;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::TokenStore;
use crate::api::AuthApi;
use crate::models::User;
use crate::routes::Route;

/// Authentication state of the session
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SessionState {
    /// Startup: the stored token has not been checked yet
    #[default]
    Unknown,
    Authenticated(User),
    Unauthenticated,
}

impl SessionState {
    pub fn user(&self) -> Option<&User> {
        match self {
            SessionState::Authenticated(user) => Some(user),
            _ => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionState::Authenticated(_))
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, SessionState::Unknown)
    }

    /// The route to actually show when `requested` is asked for.
    ///
    /// While the state is `Unknown` the request stands; the renderer shows a
    /// loading indicator until the check settles.
    pub fn guard(&self, requested: Route) -> Route {
        match self {
            SessionState::Unknown => requested,
            SessionState::Authenticated(_) if requested.is_anonymous_only() => Route::Home,
            SessionState::Unauthenticated if requested.is_protected() => Route::Login,
            _ => requested,
        }
    }
}

struct Inner {
    api: Arc<dyn AuthApi>,
    store: Arc<dyn TokenStore>,
    state: watch::Sender<SessionState>,
    /// Bumped whenever the token slot changes hands (store or logout), so a
    /// validation started against an older token can tell it is stale.
    epoch: AtomicU64,
}

#[derive(Clone)]
pub struct SessionContext {
    inner: Arc<Inner>,
}

impl SessionContext {
    /// Create a session in the `Unknown` state. Call `authenticate_user` once at
    /// startup to settle it.
    pub fn new(api: Arc<dyn AuthApi>, store: Arc<dyn TokenStore>) -> Self {
        let (state, _) = watch::channel(SessionState::Unknown);
        Self {
            inner: Arc::new(Inner {
                api,
                store,
                state,
                epoch: AtomicU64::new(0),
            }),
        }
    }

    pub fn state(&self) -> SessionState {
        self.inner.state.borrow().clone()
    }

    pub fn user(&self) -> Option<User> {
        self.inner.state.borrow().user().cloned()
    }

    pub fn is_logged_in(&self) -> bool {
        self.inner.state.borrow().is_authenticated()
    }

    pub fn is_loading(&self) -> bool {
        self.inner.state.borrow().is_unknown()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.inner.state.subscribe()
    }

    pub fn guard(&self, requested: Route) -> Route {
        self.inner.state.borrow().guard(requested)
    }

    /// The persisted token, if any. Read failures are logged and read as absent.
    pub fn token(&self) -> Option<String> {
        match self.inner.store.load() {
            Ok(token) => token,
            Err(e) => {
                warn!(error = %e, "Failed to read stored token");
                None
            }
        }
    }

    /// Persist a freshly issued token. Session state is left alone until the
    /// next `authenticate_user`.
    pub fn store_token(&self, token: &str) -> Result<()> {
        self.inner.epoch.fetch_add(1, Ordering::SeqCst);
        self.inner.store.save(token)?;
        debug!("Token stored");
        Ok(())
    }

    /// Validate the stored token against the server and settle the state.
    ///
    /// No token means `Unauthenticated` without touching the network. A token that
    /// cannot be read, or that the server will not vouch for, is cleared.
    pub async fn authenticate_user(&self) -> SessionState {
        let epoch = self.inner.epoch.load(Ordering::SeqCst);

        match self.inner.store.load() {
            Ok(Some(_)) => {}
            Ok(None) => {
                debug!("No stored token");
                return self.settle(epoch, SessionState::Unauthenticated);
            }
            Err(e) => {
                warn!(error = %e, "Stored token unreadable, clearing it");
                self.discard_token(epoch);
                return self.settle(epoch, SessionState::Unauthenticated);
            }
        }

        let next = match self.inner.api.verify().await {
            Ok(user) => {
                info!(user_id = %user.id, "Session authenticated");
                SessionState::Authenticated(user)
            }
            Err(e) => {
                warn!(error = %e, "Stored token rejected, clearing it");
                self.discard_token(epoch);
                SessionState::Unauthenticated
            }
        };

        self.settle(epoch, next)
    }

    /// Run `authenticate_user` in the background.
    /// Returns `None` when called outside a Tokio runtime.
    pub fn spawn_authentication(&self) -> Option<JoinHandle<SessionState>> {
        let handle = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(_) => {
                warn!("No async runtime available, skipping session check");
                return None;
            }
        };

        let session = self.clone();
        Some(handle.spawn(async move { session.authenticate_user().await }))
    }

    /// Forget the token and the user. Local only; the server is not contacted.
    pub fn log_out_user(&self) {
        self.inner.epoch.fetch_add(1, Ordering::SeqCst);
        if let Err(e) = self.inner.store.clear() {
            warn!(error = %e, "Failed to clear stored token on logout");
        }
        self.inner.state.send_replace(SessionState::Unauthenticated);
        info!("Logged out");
    }

    /// Clear the slot unless a newer token has replaced the one being checked
    fn discard_token(&self, epoch: u64) {
        if !self.is_current(epoch) {
            return;
        }
        if let Err(e) = self.inner.store.clear() {
            warn!(error = %e, "Failed to clear stored token");
        }
    }

    fn is_current(&self, epoch: u64) -> bool {
        self.inner.epoch.load(Ordering::SeqCst) == epoch
    }

    fn settle(&self, epoch: u64, next: SessionState) -> SessionState {
        if !self.is_current(epoch) {
            debug!("Token changed during validation, discarding result");
            return self.state();
        }
        self.inner.state.send_replace(next.clone());
        next
    }
}
