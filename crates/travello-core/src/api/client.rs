//! HTTP client wrapper for the Travello API.
//!
//! Every request built through `HttpClient` is aimed at the configured base URL,
//! carries the persisted bearer token when one exists, and is bounded by a fixed
//! timeout. Responses and transport errors are handed back untouched; turning them
//! into typed results is the service layer's job.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use reqwest::{header, Client, Method, RequestBuilder, Response};
use tracing::{debug, warn};

use crate::auth::TokenStore;

// ============================================================================
// Constants
// ============================================================================

/// Base URL used when neither the environment nor the config file names one
pub const DEFAULT_API_BASE_URL: &str = "https://travello-server-rose.vercel.app/api";

/// HTTP request timeout in seconds.
const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Token-bearing HTTP client.
/// Clone is cheap - reqwest::Client and the token store are both behind Arcs.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    base_url: Arc<str>,
    store: Arc<dyn TokenStore>,
}

impl HttpClient {
    /// Create a client with the standard request timeout
    pub fn new(base_url: &str, store: Arc<dyn TokenStore>) -> Result<Self> {
        Self::with_timeout(base_url, store, Duration::from_secs(REQUEST_TIMEOUT_SECS))
    }

    pub fn with_timeout(
        base_url: &str,
        store: Arc<dyn TokenStore>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: Arc::from(base_url.trim_end_matches('/')),
            store,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Join an endpoint path onto the base URL with exactly one slash
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Build the Authorization header from the persisted token, if any.
    /// A store that cannot be read is treated as holding no token.
    fn bearer_header(&self) -> Option<header::HeaderValue> {
        let token = match self.store.load() {
            Ok(Some(token)) => token,
            Ok(None) => return None,
            Err(e) => {
                warn!(error = %e, "Failed to read stored token, sending request without it");
                return None;
            }
        };

        match header::HeaderValue::from_str(&format!("Bearer {}", token)) {
            Ok(mut value) => {
                value.set_sensitive(true);
                Some(value)
            }
            Err(_) => {
                warn!("Stored token is not a valid header value, sending request without it");
                None
            }
        }
    }

    /// Start a request with caller-supplied headers.
    ///
    /// The caller's headers are kept; only `Authorization` is replaced when a token
    /// is stored.
    pub fn request_with_headers(
        &self,
        method: Method,
        path: &str,
        mut headers: header::HeaderMap,
    ) -> RequestBuilder {
        if let Some(bearer) = self.bearer_header() {
            headers.insert(header::AUTHORIZATION, bearer);
        }

        let url = self.url(path);
        debug!(%method, url = %url, "Building request");
        self.client.request(method, url).headers(headers)
    }

    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.request_with_headers(method, path, header::HeaderMap::new())
    }

    pub fn get(&self, path: &str) -> RequestBuilder {
        self.request(Method::GET, path)
    }

    pub fn post(&self, path: &str) -> RequestBuilder {
        self.request(Method::POST, path)
    }

    /// Send a built request. Single attempt, no retry.
    pub async fn send(&self, request: RequestBuilder) -> Result<Response, reqwest::Error> {
        request.send().await
    }
}
