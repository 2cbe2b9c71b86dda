use chrono::Utc;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{SecurityConfig, DEV_FALLBACK_SECRET};
use crate::database::models::user::User;

/// Tokens are valid for one hour from issuance and never refreshed.
pub const TOKEN_TTL_SECS: i64 = 60 * 60;

/// Identity embedded in a signed token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    pub id: i64,
    pub email: String,
    pub full_name: String,
    pub iat: i64,
    pub exp: i64,
}

/// Why a token was refused. Clients only ever see "unauthorized"; the
/// variants exist for server-side diagnostics.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("token is malformed")]
    Malformed,

    #[error("token signature is invalid")]
    InvalidSignature,

    #[error("token has expired")]
    Expired,

    #[error("token could not be issued: {0}")]
    Issue(String),
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => TokenError::InvalidSignature,
            _ => TokenError::Malformed,
        }
    }
}

/// HS256 signer/verifier over a single symmetric secret
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl_secs: i64,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("ttl_secs", &self.ttl_secs)
            .finish_non_exhaustive()
    }
}

impl TokenService {
    pub fn new(secret: &str, ttl_secs: i64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl_secs,
        }
    }

    /// Build from configuration, falling back to the development secret
    /// (with a warning) when none is configured.
    pub fn from_config(security: &SecurityConfig) -> Self {
        let secret = match security.configured_secret() {
            Some(secret) => secret,
            None => {
                tracing::warn!(
                    "JWT_SECRET is not set; signing tokens with the insecure development fallback secret"
                );
                DEV_FALLBACK_SECRET
            }
        };
        Self::new(secret, TOKEN_TTL_SECS)
    }

    pub fn issue(&self, user: &User) -> Result<String, TokenError> {
        self.issue_at(user, Utc::now().timestamp())
    }

    /// Issue a token as if the current time were `now` (unix seconds)
    pub fn issue_at(&self, user: &User, now: i64) -> Result<String, TokenError> {
        let claims = SessionClaims {
            id: user.id,
            email: user.email.clone(),
            full_name: user.full_name.clone(),
            iat: now,
            exp: now + self.ttl_secs,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| TokenError::Issue(e.to_string()))
    }

    pub fn verify(&self, token: &str) -> Result<SessionClaims, TokenError> {
        let data = decode::<SessionClaims>(token, &self.decoding, &self.validation)?;
        Ok(data.claims)
    }
}
