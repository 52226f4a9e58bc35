//! GitHub credential handling
//!
//! Two credential shapes are supported:
//!
//! - **Token**: a personal access token, sent as a bearer token as-is
//! - **App**: a GitHub App identity (app id, private key, installation id).
//!   A short-lived RS256 JWT is signed with the private key and exchanged
//!   for an installation access token, which is then used as bearer token.

use crate::github::error::Result;
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Backdate `iat` to tolerate clock drift between us and GitHub
const JWT_BACKDATE_SECS: i64 = 60;

/// GitHub rejects app JWTs valid for more than ten minutes
const JWT_LIFETIME_SECS: i64 = 9 * 60;

/// Resolved credential used to build a [`GithubClient`](super::GithubClient)
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    /// Personal access token
    Token(String),

    /// GitHub App installation identity
    App {
        app_id: String,
        private_key: String,
        installation_id: String,
    },
}

impl Credentials {
    /// Short label for logs, never includes secret material
    pub fn kind(&self) -> &'static str {
        match self {
            Credentials::Token(_) => "personal access token",
            Credentials::App { .. } => "GitHub App installation",
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credentials::Token(_) => f.debug_tuple("Token").field(&"<redacted>").finish(),
            Credentials::App {
                app_id,
                installation_id,
                ..
            } => f
                .debug_struct("App")
                .field("app_id", app_id)
                .field("private_key", &"<redacted>")
                .field("installation_id", installation_id)
                .finish(),
        }
    }
}

/// Claims of a GitHub App JWT
#[derive(Debug, Serialize, Deserialize)]
pub struct AppClaims {
    pub iat: i64,
    pub exp: i64,
    pub iss: String,
}

/// Sign the JWT that authenticates as the app itself
pub fn app_jwt(app_id: &str, private_key: &str) -> Result<String> {
    let now = Utc::now();
    let claims = AppClaims {
        iat: (now - Duration::seconds(JWT_BACKDATE_SECS)).timestamp(),
        exp: (now + Duration::seconds(JWT_LIFETIME_SECS)).timestamp(),
        iss: app_id.to_string(),
    };

    let key = EncodingKey::from_rsa_pem(normalize_pem(private_key).as_bytes())?;
    let token = encode(&Header::new(Algorithm::RS256), &claims, &key)?;
    Ok(token)
}

/// CI secrets often carry the PEM on one line with literal `\n` escapes
pub fn normalize_pem(key: &str) -> String {
    key.trim().replace("\\n", "\n")
}
