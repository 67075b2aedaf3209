// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Error taxonomy for feedhub-core.
//!
//! Workflows construct [`AppError`] values at the point of detection and the
//! executor propagates them unchanged; the transport boundary is the only
//! place that maps a code to a response status. Anything that is not an
//! `AppError` must be treated as internal there, with a generic message.

use std::collections::BTreeMap;
use std::fmt;

/// Result type using AppError
pub type Result<T> = std::result::Result<T, AppError>;

/// Message for a sign-up request missing an email.
pub const MSG_EMAIL_REQUIRED: &str = "email required.";
/// Message for a sign-up or sign-in request missing a password.
pub const MSG_PASSWORD_REQUIRED: &str = "password required.";
/// Message for a sign-up request missing a display name.
pub const MSG_NAME_REQUIRED: &str = "name required.";
/// Message for a sign-up against an email that already has an identity.
pub const MSG_USER_EXISTS: &str = "user exists.";
/// Message for a feed registration missing a URL.
pub const MSG_URL_REQUIRED: &str = "url required.";
/// Shared sign-in failure message. Deliberately identical for an unknown
/// email and a wrong password so the response reveals neither.
pub const MSG_INVALID_CREDENTIALS: &str = "invalid email and/or password was provided.";

/// Category tag carried by every [`AppError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorCode {
    /// Unexpected or library failure. Logged; callers see a generic message.
    Internal,
    /// Validation or business-rule rejection.
    Invalid,
    /// Credential or token failure.
    Unauthorized,
    /// Missing resource. Reserved; the workflows never produce it.
    NotFound,
}

impl ErrorCode {
    /// Stable string tag for this code.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Internal => "internal",
            Self::Invalid => "invalid",
            Self::Unauthorized => "unauthorized",
            Self::NotFound => "not_found",
        }
    }

    /// Externally visible status for this code.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Internal => 500,
            Self::Invalid => 400,
            Self::Unauthorized => 401,
            Self::NotFound => 404,
        }
    }
}

/// Error payload: a single message, or one message per rejected field.
///
/// The field map form is used by pre-validation, which aggregates every
/// missing field into one error instead of stopping at the first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorMessage {
    /// One human-readable message.
    Text(String),
    /// Field name to message, e.g. `{"email": "email required."}`.
    /// BTreeMap so the rendered form is deterministic.
    Fields(BTreeMap<String, String>),
}

impl ErrorMessage {
    /// Render the payload to a single string; map values join with `", "`.
    pub fn render(&self) -> String {
        match self {
            Self::Text(msg) => msg.clone(),
            Self::Fields(fields) => {
                let values: Vec<&str> = fields.values().map(String::as_str).collect();
                values.join(", ")
            }
        }
    }
}

/// Classified error propagated unchanged from workflows to the boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppError {
    /// Category tag used for status translation.
    pub code: ErrorCode,
    /// Payload returned to the caller (except for internal errors).
    pub message: ErrorMessage,
}

impl AppError {
    /// Construct an error with an explicit code and a single message.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: ErrorMessage::Text(message.into()),
        }
    }

    /// Unexpected or library failure.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Internal, message)
    }

    /// Validation or business-rule rejection with a single message.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Invalid, message)
    }

    /// Validation rejection carrying one message per failed field.
    pub fn invalid_fields(fields: BTreeMap<String, String>) -> Self {
        Self {
            code: ErrorCode::Invalid,
            message: ErrorMessage::Fields(fields),
        }
    }

    /// Credential or token failure.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unauthorized, message)
    }

    /// Missing resource.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    /// Externally visible status for this error.
    pub fn status_code(&self) -> u16 {
        self.code.status_code()
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} error: {}", self.code.as_str(), self.message.render())
    }
}

impl std::error::Error for AppError {}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::internal(format!("database error: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_to_status() {
        let test_cases = vec![
            (ErrorCode::Internal, 500, "internal"),
            (ErrorCode::Invalid, 400, "invalid"),
            (ErrorCode::Unauthorized, 401, "unauthorized"),
            (ErrorCode::NotFound, 404, "not_found"),
        ];

        for (code, expected_status, expected_tag) in test_cases {
            assert_eq!(code.status_code(), expected_status);
            assert_eq!(code.as_str(), expected_tag);
        }
    }

    #[test]
    fn test_constructors_set_codes() {
        assert_eq!(AppError::internal("x").code, ErrorCode::Internal);
        assert_eq!(AppError::invalid("x").code, ErrorCode::Invalid);
        assert_eq!(AppError::unauthorized("x").code, ErrorCode::Unauthorized);
        assert_eq!(AppError::not_found("x").code, ErrorCode::NotFound);
        assert_eq!(
            AppError::invalid_fields(BTreeMap::new()).code,
            ErrorCode::Invalid
        );
    }

    #[test]
    fn test_render_single_message() {
        let err = AppError::unauthorized(MSG_INVALID_CREDENTIALS);
        assert_eq!(err.message.render(), MSG_INVALID_CREDENTIALS);
        assert_eq!(
            err.to_string(),
            "unauthorized error: invalid email and/or password was provided."
        );
    }

    #[test]
    fn test_render_field_map_joins_values() {
        let mut fields = BTreeMap::new();
        fields.insert("email".to_string(), MSG_EMAIL_REQUIRED.to_string());
        fields.insert("name".to_string(), MSG_NAME_REQUIRED.to_string());
        fields.insert("password".to_string(), MSG_PASSWORD_REQUIRED.to_string());

        let err = AppError::invalid_fields(fields);
        // BTreeMap orders by field name: email, name, password.
        assert_eq!(
            err.message.render(),
            "email required., name required., password required."
        );
        assert_eq!(err.status_code(), 400);
    }

    #[test]
    fn test_sqlx_errors_map_to_internal() {
        let err: AppError = sqlx::Error::RowNotFound.into();
        assert_eq!(err.code, ErrorCode::Internal);
        assert_eq!(err.status_code(), 500);
    }
}
