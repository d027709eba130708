//! Session tokens
//!
//! HS256-signed JWTs carrying the user id. The user row is re-read on every
//! request, so a token never grants more than the user currently has.

use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// JWT claims embedded in every session token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user's id
    pub sub: String,
    /// Issued-at time (UTC Unix timestamp)
    pub iat: i64,
    /// Expiration time (UTC Unix timestamp)
    pub exp: i64,
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("failed to sign token: {0}")]
    Sign(#[source] jsonwebtoken::errors::Error),

    #[error("invalid token: {0}")]
    Invalid(#[source] jsonwebtoken::errors::Error),
}

/// Signs and checks session tokens
#[derive(Clone)]
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    lifetime: Duration,
}

impl TokenIssuer {
    pub fn new(secret: &str, lifetime_days: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            lifetime: Duration::days(lifetime_days),
        }
    }

    pub fn issue(&self, user_id: &str) -> Result<String, TokenError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: (now + self.lifetime).timestamp(),
        };
        encode(&Header::default(), &claims, &self.encoding).map_err(TokenError::Sign)
    }

    /// Check the signature and expiry, and return the claims
    ///
    /// A leading `Bearer ` is ignored.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let token = token.strip_prefix("Bearer ").unwrap_or(token);
        decode::<Claims>(token, &self.decoding, &Validation::default())
            .map(|data| data.claims)
            .map_err(TokenError::Invalid)
    }
}
