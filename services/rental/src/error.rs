//! Custom error types for the rental service
//!
//! Every operation reports failures through [`ApiError`]; the `IntoResponse`
//! impl translates each variant into the `{message, data}` response envelope
//! with its status code, so failures never escape as unhandled faults.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Custom error type for the rental service
#[derive(Error, Debug)]
pub enum ApiError {
    /// Mandatory fields absent from the request payload
    #[error("Mandatory field(s) missing: [{0}]")]
    MissingMandatoryFields(String),

    /// Malformed date or structured string
    #[error("{0}")]
    WrongFormat(String),

    /// Payload value type mismatch
    #[error("The type of values of some fields is wrong: {0}")]
    WrongType(String),

    /// Value fails a domain rule
    #[error("{0}")]
    InputNotAcceptable(String),

    /// Password confirmation mismatch at registration
    #[error("Passwords don't match")]
    PasswordsNotMatching,

    /// Uniqueness violation, from the pre-check or the store constraint
    #[error("{0} already exists")]
    RecordAlreadyExists(String),

    /// Referenced entity absent
    #[error("{0} not found")]
    RecordNotFound(String),

    /// No valid session
    #[error("Unauthorized")]
    Unauthorized,

    /// Valid session, insufficient role or ownership
    #[error("Access to this resource is denied")]
    Forbidden,

    /// Database error
    #[error("Database error: {0}")]
    Database(sqlx::Error),

    /// Session store error
    #[error("Session store error: {0}")]
    Cache(#[from] common::error::CacheError),

    /// Internal server error
    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    /// Status code carried by this error category
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MissingMandatoryFields(_)
            | ApiError::WrongFormat(_)
            | ApiError::WrongType(_)
            | ApiError::InputNotAcceptable(_)
            | ApiError::PasswordsNotMatching => StatusCode::BAD_REQUEST,
            ApiError::RecordAlreadyExists(_) => StatusCode::CONFLICT,
            ApiError::RecordNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::Database(_) | ApiError::Cache(_) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Infra failures are logged with full detail; the response body stays
        // generic so no storage internals leak to the client.
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("Request failed: {}", self);
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        let body = Json(json!({
            "message": message,
            "data": null,
        }));

        (status, body).into_response()
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        // A unique violation arriving here means a concurrent writer won the
        // race after the validator's pre-check passed. The constraint is the
        // authoritative check; surface it as the same error category.
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                return ApiError::RecordAlreadyExists(field_from_constraint(db_err.constraint()));
            }
        }
        ApiError::Database(err)
    }
}

/// Derive the offending field name from a Postgres unique-constraint name,
/// e.g. `users_email_key` -> `email`, `licenses_license_number_key` ->
/// `license_number`.
fn field_from_constraint(constraint: Option<&str>) -> String {
    constraint
        .and_then(|name| {
            name.strip_suffix("_key")
                .and_then(|rest| rest.split_once('_'))
                .map(|(_, field)| field.to_string())
        })
        .unwrap_or_else(|| "Record".to_string())
}
