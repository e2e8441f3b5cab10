//!
//! # Error Handling
//!
//! `AppError` is the single failure type returned by every handler in the three
//! services. It implements `actix_web::error::ResponseError`, so a handler can
//! bubble any failure up with `?` and the client receives a JSON body of the
//! form `{"error": "..."}` with the matching status code.
//!
//! `From` conversions are provided for the collaborators we call into:
//! `sqlx`, `validator`, `jsonwebtoken` and `bcrypt`.

use actix_web::{
    error::ResponseError,
    http::{header, StatusCode},
    HttpResponse,
};
use log::{error, warn};
use serde_json::json;
use std::fmt;
use validator::ValidationErrors;

/// Represents all possible errors that can occur while handling a request.
#[derive(Debug)]
pub enum AppError {
    /// Bad credentials, or a missing/invalid bearer token (HTTP 401).
    Unauthorized(String),
    /// A request the handler refuses to act on (HTTP 400).
    BadRequest(String),
    /// A lookup by key or id missed (HTTP 404).
    NotFound(String),
    /// An unexpected server-side failure (HTTP 500).
    InternalServerError(String),
    /// A failure reported by the relational store (HTTP 500).
    DatabaseError(String),
    /// Input that deserialized but broke a field constraint (HTTP 422).
    ValidationError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::InternalServerError(msg) => write!(f, "Internal Server Error: {}", msg),
            AppError::DatabaseError(msg) => write!(f, "Database Error: {}", msg),
            AppError::ValidationError(msg) => write!(f, "Validation Error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::ValidationError(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::InternalServerError(_) | AppError::DatabaseError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status_code());
        match self {
            AppError::Unauthorized(msg) => builder
                .insert_header((header::WWW_AUTHENTICATE, "Bearer"))
                .json(json!({ "error": msg })),
            AppError::BadRequest(msg) | AppError::NotFound(msg) | AppError::ValidationError(msg) => {
                builder.json(json!({ "error": msg }))
            }
            // Server-side details go to the log, never to the client.
            AppError::InternalServerError(msg) => {
                error!("internal error: {}", msg);
                builder.json(json!({ "error": "Internal server error" }))
            }
            AppError::DatabaseError(msg) => {
                error!("database error: {}", msg);
                builder.json(json!({ "error": "Database error" }))
            }
        }
    }
}

/// `RowNotFound` becomes a 404; anything else the store reports is a 500.
impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> AppError {
        match error {
            sqlx::Error::RowNotFound => AppError::NotFound("Record not found".into()),
            _ => AppError::DatabaseError(error.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for AppError {
    fn from(error: sqlx::migrate::MigrateError) -> AppError {
        AppError::DatabaseError(format!("migration failed: {}", error))
    }
}

impl From<ValidationErrors> for AppError {
    fn from(error: ValidationErrors) -> AppError {
        AppError::ValidationError(error.to_string())
    }
}

/// Any decode or verification failure is treated as a bad credential. The
/// reason is logged; the client only learns that the token was refused.
impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(error: jsonwebtoken::errors::Error) -> AppError {
        warn!("rejected access token: {}", error);
        AppError::Unauthorized("Could not validate credentials".into())
    }
}

impl From<bcrypt::BcryptError> for AppError {
    fn from(error: bcrypt::BcryptError) -> AppError {
        AppError::InternalServerError(error.to_string())
    }
}
