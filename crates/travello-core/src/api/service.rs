//! Typed calls against the auth endpoints.

use async_trait::async_trait;
use reqwest::Response;
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

use super::{ApiError, HttpClient};
use crate::models::{AuthResponse, Credentials, User};

const LOGIN_PATH: &str = "/auth/login";
const SIGNUP_PATH: &str = "/auth/signup";
const VERIFY_PATH: &str = "/auth/verify";

/// The remote operations the views and the session depend on.
/// Implemented by `AuthService` and by stubs in tests.
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// Exchange email and password for a token.
    async fn login(&self, credentials: &Credentials) -> Result<AuthResponse, ApiError>;

    /// Create an account and receive a token for it.
    async fn signup(&self, credentials: &Credentials) -> Result<AuthResponse, ApiError>;

    /// Resolve the stored token to the user it belongs to.
    async fn verify(&self) -> Result<User, ApiError>;
}

#[derive(Serialize)]
struct LoginBody<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct SignupBody<'a> {
    email: &'a str,
    password: &'a str,
    username: &'a str,
}

/// Auth endpoints over the token-bearing `HttpClient`. No validation happens here.
#[derive(Clone)]
pub struct AuthService {
    http: HttpClient,
}

impl AuthService {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: Response) -> Result<Response, ApiError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body))
        }
    }

    async fn parse_json<T: DeserializeOwned>(response: Response, what: &str) -> Result<T, ApiError> {
        let text = response.text().await?;
        serde_json::from_str(&text)
            .map_err(|e| ApiError::InvalidResponse(format!("{} response: {}", what, e)))
    }

    async fn send_credentials<B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
        what: &str,
    ) -> Result<AuthResponse, ApiError> {
        let response = self.http.send(self.http.post(path).json(body)).await?;
        let response = Self::check_response(response).await?;
        Self::parse_json(response, what).await
    }

    async fn fetch_user(&self) -> Result<User, ApiError> {
        let response = self.http.send(self.http.get(VERIFY_PATH)).await?;
        let response = Self::check_response(response).await?;
        Self::parse_json(response, "verify").await
    }

    async fn post_json<B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
        what: &str,
    ) -> Result<AuthResponse, ApiError> {
        let result = self.send_credentials(path, body, what).await;

        match &result {
            Ok(_) => debug!(endpoint = path, "Auth request succeeded"),
            Err(e) => warn!(endpoint = path, error = %e, "Auth request failed"),
        }
        result
    }
}

#[async_trait]
impl AuthApi for AuthService {
    async fn login(&self, credentials: &Credentials) -> Result<AuthResponse, ApiError> {
        let body = LoginBody {
            email: &credentials.email,
            password: &credentials.password,
        };
        self.post_json(LOGIN_PATH, &body, "login").await
    }

    async fn signup(&self, credentials: &Credentials) -> Result<AuthResponse, ApiError> {
        let body = SignupBody {
            email: &credentials.email,
            password: &credentials.password,
            username: credentials.username.as_deref().unwrap_or_default(),
        };
        self.post_json(SIGNUP_PATH, &body, "signup").await
    }

    async fn verify(&self) -> Result<User, ApiError> {
        let result = self.fetch_user().await;

        match &result {
            Ok(user) => debug!(endpoint = VERIFY_PATH, user_id = %user.id, "Token verified"),
            Err(e) => warn!(endpoint = VERIFY_PATH, error = %e, "Auth request failed"),
        }
        result
    }
}
