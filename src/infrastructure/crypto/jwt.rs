//! Session token handling
//!
//! Tokens are stateless HMAC-signed JWTs carrying the account's username as
//! `sub` and an absolute `exp`. There is no server-side session store, so a
//! token stays valid until it expires or the signing secret is rotated.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default access token lifetime
pub const DEFAULT_EXPIRATION_MINUTES: i64 = 30;

/// JWT configuration
#[derive(Clone)]
pub struct JwtConfig {
    /// Secret key for signing tokens
    pub secret: String,
    /// HMAC algorithm (HS256, HS384 or HS512)
    pub algorithm: Algorithm,
    /// Token lifetime in minutes
    pub expiration_minutes: i64,
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("algorithm", &self.algorithm)
            .field("expiration_minutes", &self.expiration_minutes)
            .finish()
    }
}

impl JwtConfig {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            algorithm: Algorithm::HS256,
            expiration_minutes: DEFAULT_EXPIRATION_MINUTES,
        }
    }

    pub fn expires_in_seconds(&self) -> i64 {
        self.expiration_minutes * 60
    }
}

/// JWT claims
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TokenClaims {
    /// Subject (username)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    #[serde(default)]
    pub iat: i64,
}

impl TokenClaims {
    pub fn new(username: &str, issued_at: DateTime<Utc>, config: &JwtConfig) -> Self {
        let exp = issued_at + Duration::minutes(config.expiration_minutes);
        Self {
            sub: Some(username.to_string()),
            exp: exp.timestamp(),
            iat: issued_at.timestamp(),
        }
    }

    /// A token is valid strictly before `exp`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.exp
    }
}

/// Reasons a presented token is rejected
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("invalid token: {0}")]
    Invalid(#[from] jsonwebtoken::errors::Error),
    #[error("token has expired")]
    Expired,
    #[error("token has no subject")]
    MissingSubject,
}

/// Create a signed token for `username`, valid from now.
pub fn create_token(
    username: &str,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    create_token_at(username, Utc::now(), config)
}

pub fn create_token_at(
    username: &str,
    issued_at: DateTime<Utc>,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    encode_claims(&TokenClaims::new(username, issued_at, config), config)
}

pub fn encode_claims(
    claims: &TokenClaims,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    encode(
        &Header::new(config.algorithm),
        claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Verify a token and return its subject.
pub fn verify_token(token: &str, config: &JwtConfig) -> Result<String, TokenError> {
    verify_token_at(token, Utc::now(), config)
}

pub fn verify_token_at(
    token: &str,
    now: DateTime<Utc>,
    config: &JwtConfig,
) -> Result<String, TokenError> {
    // Expiry is checked below against `now` with no leeway.
    let mut validation = Validation::new(config.algorithm);
    validation.validate_exp = false;
    validation.leeway = 0;
    validation.set_required_spec_claims(&["exp"]);

    let token_data = decode::<TokenClaims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )?;
    let claims = token_data.claims;

    if claims.is_expired_at(now) {
        return Err(TokenError::Expired);
    }

    match claims.sub {
        Some(sub) if !sub.is_empty() => Ok(sub),
        _ => Err(TokenError::MissingSubject),
    }
}
