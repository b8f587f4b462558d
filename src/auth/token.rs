use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Lifetime of every issued token.
pub const TOKEN_TTL_DAYS: i64 = 7;

/// Represents the claims encoded within a JWT (JSON Web Token).
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Identifier of the user the token was issued to.
    pub id: i32,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: usize,
    /// Expiration timestamp (seconds since epoch).
    pub exp: usize,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("token has expired")]
    Expired,
    /// Wrong secret, tampered payload or a string that is not a token at all.
    #[error("token signature is invalid: {0}")]
    InvalidSignature(String),
    #[error("failed to encode token: {0}")]
    Encoding(String),
}

/// Issues and verifies HS256 tokens with the process-wide signing secret.
///
/// Built once at startup from `Config`. Changing the secret invalidates every
/// token issued before the change; there is no key rollover.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl TokenService {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Issues a token for `user_id` expiring seven days from now.
    pub fn issue(&self, user_id: i32) -> Result<String, TokenError> {
        self.issue_at(user_id, Utc::now())
    }

    /// Issues a token as if it had been created at `issued_at`.
    pub fn issue_at(&self, user_id: i32, issued_at: DateTime<Utc>) -> Result<String, TokenError> {
        let expiration = issued_at
            .checked_add_signed(Duration::days(TOKEN_TTL_DAYS))
            .ok_or_else(|| TokenError::Encoding("expiration out of range".into()))?;

        let claims = Claims {
            id: user_id,
            iat: issued_at.timestamp().max(0) as usize,
            exp: expiration.timestamp().max(0) as usize,
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| TokenError::Encoding(e.to_string()))?;
        debug!("issued token for user {}", user_id);
        Ok(token)
    }

    /// Verifies the signature first, then the expiration instant.
    pub fn decode(&self, token: &str) -> Result<Claims, TokenError> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::InvalidSignature(e.to_string()),
            })
    }

    /// Returns the user identifier embedded in a valid token.
    pub fn verify(&self, token: &str) -> Result<i32, TokenError> {
        self.decode(token).map(|claims| claims.id)
    }
}
