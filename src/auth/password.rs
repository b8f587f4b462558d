use bcrypt::{hash, verify};
use lazy_static::lazy_static;
use log::warn;
use thiserror::Error;
use validator::ValidationError;

/// bcrypt work factor. Each increment doubles the cost of a guess.
pub const HASH_COST: u32 = 10;

/// bcrypt only reads this many bytes of input. Longer passwords are refused
/// rather than silently truncated.
pub const MAX_PASSWORD_BYTES: usize = 72;

lazy_static! {
    // Verified against when a login names no account.
    static ref UNKNOWN_USER_HASH: String =
        hash("unknown-user-placeholder", HASH_COST).unwrap_or_default();
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PasswordError {
    /// The plaintext could not be hashed.
    #[error("Invalid password input: {0}")]
    InvalidInput(String),
    /// The plaintext does not match, or the stored hash is unusable.
    #[error("Password does not match")]
    Mismatch,
}

/// Produces a salted bcrypt digest of `password`.
///
/// This is CPU bound; request handlers call it through `web::block`.
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    if password.is_empty() {
        return Err(PasswordError::InvalidInput("Password must not be empty".into()));
    }
    if password.len() > MAX_PASSWORD_BYTES {
        return Err(PasswordError::InvalidInput(format!(
            "Password must be at most {} bytes",
            MAX_PASSWORD_BYTES
        )));
    }
    hash(password, HASH_COST)
        .map_err(|e| PasswordError::InvalidInput(format!("Failed to hash password: {}", e)))
}

/// Checks `password` against a stored digest.
///
/// A corrupt or empty digest is reported as `Mismatch`, never as a failure of its own.
/// So is a password longer than `MAX_PASSWORD_BYTES`, which could otherwise match
/// on its first 72 bytes alone.
pub fn verify_password(password: &str, hashed_password: &str) -> Result<(), PasswordError> {
    if password.len() > MAX_PASSWORD_BYTES {
        return Err(PasswordError::Mismatch);
    }
    match verify(password, hashed_password) {
        Ok(true) => Ok(()),
        Ok(false) => Err(PasswordError::Mismatch),
        Err(e) => {
            warn!("stored password hash is unusable: {}", e);
            Err(PasswordError::Mismatch)
        }
    }
}

/// Burns one bcrypt verification for a login that names no account and
/// reports `Mismatch`, the same outcome as a wrong password.
pub fn verify_unknown_user(password: &str) -> PasswordError {
    let _ = verify(password, &UNKNOWN_USER_HASH);
    PasswordError::Mismatch
}

/// `validator` hook for request bodies: the byte cap on top of the character-length rule.
pub fn validate_password_bytes(password: &str) -> Result<(), ValidationError> {
    if password.len() <= MAX_PASSWORD_BYTES {
        return Ok(());
    }
    let mut error = ValidationError::new("password_bytes");
    error.message = Some("\"password\" must be at most 72 bytes".into());
    Err(error)
}
