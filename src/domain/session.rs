//! Session context passed explicitly to the HTTP client.

use serde::{Deserialize, Serialize};

use crate::domain::types::TypeConstraintError;
use crate::domain::user::User;

/// Opaque session token issued by the backend at login.
///
/// Only its presence matters to the panel; `Debug` never prints the value.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let value = value.into().trim().to_string();
        if value.is_empty() {
            return Err(TypeConstraintError::EmptyString);
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SessionToken(***)")
    }
}

/// How the token is written into the `Authorization` header.
///
/// The backend reads the raw token; `Bearer` exists for deployments behind
/// gateways that insist on the standard scheme.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AuthScheme {
    #[default]
    Raw,
    Bearer,
}

impl AuthScheme {
    pub fn header_value(self, token: &SessionToken) -> String {
        match self {
            AuthScheme::Raw => token.as_str().to_string(),
            AuthScheme::Bearer => format!("Bearer {}", token.as_str()),
        }
    }
}

/// Body of the login request.
#[derive(Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

/// Successful login answer: the session token and, when the backend sends
/// it, the signed-in account.
#[derive(Clone, Debug, Deserialize)]
pub struct LoginResponse {
    #[serde(alias = "accessToken")]
    pub token: String,
    #[serde(default)]
    pub user: Option<User>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_value_per_scheme() {
        let token = SessionToken::new("abc.def").unwrap();
        assert_eq!(AuthScheme::Raw.header_value(&token), "abc.def");
        assert_eq!(AuthScheme::Bearer.header_value(&token), "Bearer abc.def");
    }

    #[test]
    fn blank_token_is_rejected() {
        assert_eq!(SessionToken::new("  "), Err(TypeConstraintError::EmptyString));
    }

    #[test]
    fn credentials_debug_hides_password() {
        let credentials = Credentials {
            email: "admin@example.com".into(),
            password: "Secret1!".into(),
        };
        let printed = format!("{credentials:?}");
        assert!(printed.contains("admin@example.com"));
        assert!(!printed.contains("Secret1!"));
    }

    #[test]
    fn debug_hides_token() {
        let token = SessionToken::new("secret").unwrap();
        assert_eq!(format!("{token:?}"), "SessionToken(***)");
    }
}
