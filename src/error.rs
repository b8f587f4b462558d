//!
//! # Custom Error Handling
//!
//! This module defines the `AppError` type returned by every handler and gate.
//! It centralizes the mapping from failures (validation, duplicate accounts,
//! bad credentials, missing records, storage faults) to HTTP responses.
//!
//! `AppError` implements `actix_web::error::ResponseError`, so handlers can return
//! `Result<impl Responder, AppError>` and use `?` on store, hasher and token results.
//! Every error body has the shape `{ "message": "..." }`. Internal failures are
//! logged with their cause and answered with a generic message.

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use log::error;
use serde_json::json;
use thiserror::Error;
use validator::ValidationErrors;

use crate::auth::password::PasswordError;
use crate::auth::token::TokenError;
use crate::store::StoreError;

/// Message returned to clients for any 500.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Represents all possible errors that can occur while serving a request.
#[derive(Debug, Error)]
pub enum AppError {
    /// Input failed validation before any persistence call (HTTP 400).
    #[error("Validation Error: {0}")]
    Validation(String),
    /// Request could not be interpreted at all: bad JSON, path or query (HTTP 400).
    #[error("Bad Request: {0}")]
    BadRequest(String),
    /// Username or email already taken (HTTP 400).
    #[error("Conflict: {0}")]
    Conflict(String),
    /// Bad credentials or a missing, invalid or expired token (HTTP 401).
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    /// Requested resource does not exist (HTTP 404).
    #[error("Not Found: {0}")]
    NotFound(String),
    /// Storage or unexpected failure (HTTP 500). The message is only logged.
    #[error("Internal Server Error: {0}")]
    Internal(String),
}

impl AppError {
    /// Text placed in the `message` field of the response body.
    pub fn client_message(&self) -> &str {
        match self {
            AppError::Validation(msg)
            | AppError::BadRequest(msg)
            | AppError::Conflict(msg)
            | AppError::Unauthorized(msg)
            | AppError::NotFound(msg) => msg,
            AppError::Internal(_) => INTERNAL_ERROR_MESSAGE,
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::BadRequest(_) | AppError::Conflict(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let AppError::Internal(cause) = self {
            error!("request failed: {}", cause);
        }
        HttpResponse::build(self.status_code()).json(json!({
            "message": self.client_message()
        }))
    }
}

/// Picks one human readable message out of a `ValidationErrors` set.
///
/// Fields are visited in name order so the same payload always yields the same message.
pub fn first_validation_message(errors: &ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by_key(|(field, _)| *field);

    for (field, field_errors) in fields {
        if let Some(first) = field_errors.first() {
            return match &first.message {
                Some(message) => message.to_string(),
                None => format!("\"{}\" is invalid", field),
            };
        }
    }
    "Invalid input".to_string()
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> AppError {
        AppError::Validation(first_validation_message(&errors))
    }
}

/// `RowNotFound` becomes `NotFound`; anything else is an internal failure.
impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> AppError {
        match error {
            sqlx::Error::RowNotFound => AppError::NotFound("Record not found".into()),
            _ => AppError::Internal(format!("database error: {}", error)),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(error: StoreError) -> AppError {
        match error {
            StoreError::Conflict(msg) => AppError::Conflict(msg),
            StoreError::Database(msg) => AppError::Internal(format!("database error: {}", msg)),
        }
    }
}

impl From<PasswordError> for AppError {
    fn from(error: PasswordError) -> AppError {
        match error {
            PasswordError::InvalidInput(msg) => AppError::Validation(msg),
            PasswordError::Mismatch => AppError::Unauthorized("Invalid credentials".into()),
        }
    }
}

/// Expired and forged tokens produce the same client-facing message.
impl From<TokenError> for AppError {
    fn from(error: TokenError) -> AppError {
        match error {
            TokenError::Expired | TokenError::InvalidSignature(_) => {
                AppError::Unauthorized("Invalid token".into())
            }
            TokenError::Encoding(msg) => AppError::Internal(format!("token encoding: {}", msg)),
        }
    }
}

impl From<actix_web::error::BlockingError> for AppError {
    fn from(error: actix_web::error::BlockingError) -> AppError {
        AppError::Internal(format!("blocking task failed: {}", error))
    }
}
