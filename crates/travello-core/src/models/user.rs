use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Login or signup payload. Never persisted.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

impl Credentials {
    pub fn login(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            username: None,
        }
    }

    pub fn signup(
        email: impl Into<String>,
        password: impl Into<String>,
        username: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            username: Some(username.into()),
        }
    }
}

// Keep passwords out of logs and panic messages
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("username", &self.username)
            .finish()
    }
}

/// Successful login/signup body. Other fields the server sends are ignored.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct AuthResponse {
    #[serde(rename = "authToken")]
    pub auth_token: String,
}

impl fmt::Debug for AuthResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthResponse")
            .field("auth_token", &"<redacted>")
            .finish()
    }
}

/// Identity returned by the verify endpoint.
///
/// The server issues Mongo-style `_id` keys, sometimes alongside a virtual `id`;
/// either key is accepted, as a string or a number. Fields this client does not
/// model (token timestamps and the like) are kept in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "UserPayload")]
pub struct User {
    pub id: String,
    pub username: Option<String>,
    pub email: Option<String>,
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

/// Wire shape of `User` before the id is settled
#[derive(Deserialize)]
struct UserPayload {
    #[serde(default)]
    id: Option<serde_json::Value>,
    #[serde(default, rename = "_id")]
    mongo_id: Option<serde_json::Value>,
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(flatten)]
    extra: HashMap<String, serde_json::Value>,
}

fn id_string(value: serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) if !s.is_empty() => Some(s),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

impl TryFrom<UserPayload> for User {
    type Error = String;

    fn try_from(payload: UserPayload) -> Result<Self, Self::Error> {
        let id = payload
            .id
            .and_then(id_string)
            .or_else(|| payload.mongo_id.and_then(id_string))
            .ok_or_else(|| "user has no usable `id` or `_id`".to_string())?;

        Ok(Self {
            id,
            username: payload.username,
            email: payload.email,
            extra: payload.extra,
        })
    }
}

impl User {
    /// Username if the server supplied a non-blank one
    pub fn username(&self) -> Option<&str> {
        self.username
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_credentials_omit_username() {
        let creds = Credentials::login("a@b.com", "secret1");
        let json = serde_json::to_value(&creds).unwrap();
        assert_eq!(json, serde_json::json!({"email": "a@b.com", "password": "secret1"}));
    }

    #[test]
    fn test_signup_credentials_include_username() {
        let creds = Credentials::signup("a@b.com", "secret12", "ana");
        let json = serde_json::to_value(&creds).unwrap();
        assert_eq!(json["username"], "ana");
    }

    #[test]
    fn test_credentials_debug_hides_password() {
        let creds = Credentials::login("a@b.com", "hunter2");
        let debug = format!("{:?}", creds);
        assert!(debug.contains("a@b.com"));
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn test_auth_response_ignores_extra_fields() {
        let resp: AuthResponse =
            serde_json::from_str(r#"{"authToken":"T1","expiresIn":"6h"}"#).unwrap();
        assert_eq!(resp.auth_token, "T1");
    }

    #[test]
    fn test_user_accepts_mongo_id_and_keeps_extra() {
        let json = r#"{"_id":"65f0c","email":"a@b.com","username":"ana","iat":1700000000,"exp":1700021600}"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.id, "65f0c");
        assert_eq!(user.username(), Some("ana"));
        assert_eq!(user.email.as_deref(), Some("a@b.com"));
        assert_eq!(user.extra.get("iat"), Some(&serde_json::json!(1700000000)));
    }

    #[test]
    fn test_user_accepts_both_id_keys() {
        let json = r#"{"_id":"65f0c","id":"65f0c","username":"ana"}"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.id, "65f0c");
        assert!(user.extra.is_empty());
    }

    #[test]
    fn test_user_accepts_numeric_id() {
        let user: User = serde_json::from_str(r#"{"id":42,"username":"ana"}"#).unwrap();
        assert_eq!(user.id, "42");

        let user: User = serde_json::from_str(r#"{"_id":7}"#).unwrap();
        assert_eq!(user.id, "7");
    }

    #[test]
    fn test_user_without_id_is_rejected() {
        assert!(serde_json::from_str::<User>(r#"{"username":"ana"}"#).is_err());
        assert!(serde_json::from_str::<User>(r#"{"id":null,"_id":{}}"#).is_err());
    }

    #[test]
    fn test_user_blank_username() {
        let user: User = serde_json::from_str(r#"{"id":"1","username":"   "}"#).unwrap();
        assert_eq!(user.username(), None);

        let user: User = serde_json::from_str(r#"{"id":"1"}"#).unwrap();
        assert_eq!(user.username(), None);
    }
}
