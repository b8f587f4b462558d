pub mod extractors;
pub mod middleware;
pub mod password;
pub mod token;

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::PublicUser;

pub use extractors::AuthenticatedUser;
pub use middleware::{AuthMiddleware, AUTH_HEADER};
pub use password::{hash_password, verify_password, PasswordError};
pub use token::{Claims, TokenError, TokenService};

lazy_static! {
    // Any run of non-whitespace characters
    pub(crate) static ref USERNAME_REGEX: regex::Regex = regex::Regex::new(r"^\S+$").unwrap();
}

/// Represents the payload for a user login request.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(
        min = 1,
        max = 20,
        message = "\"username\" length must be between 1 and 20 characters"
    ))]
    pub username: String,
    #[validate(length(
        min = 6,
        max = 255,
        message = "\"password\" length must be between 6 and 255 characters"
    ))]
    pub password: String,
}

/// Represents the payload for a new user registration request.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Must be between 3 and 20 characters, without whitespace.
    #[validate(
        length(
            min = 3,
            max = 20,
            message = "\"username\" length must be between 3 and 20 characters"
        ),
        regex(
            path = "USERNAME_REGEX",
            message = "\"username\" must not contain whitespace"
        )
    )]
    pub username: String,
    #[validate(
        email(message = "\"email\" must be a valid email"),
        length(max = 255, message = "\"email\" length must be at most 255 characters")
    )]
    pub email: String,
    /// At most 72 bytes, the most bcrypt reads.
    #[validate(
        length(
            min = 6,
            max = 255,
            message = "\"password\" length must be between 6 and 255 characters"
        ),
        custom = "crate::auth::password::validate_password_bytes"
    )]
    pub password: String,
}

/// Body returned by register, login and token reissue.
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub message: String,
    pub user: PublicUser,
    /// Signed token to send back in the `authentication` header.
    pub token: String,
}
