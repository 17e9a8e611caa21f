// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Message returned for every authentication failure, whatever the cause.
pub const AUTHENTICATION_ERROR: &str = "Authentication Error";

/// Message returned when the CSRF header check fails.
pub const CSRF_CHECK_FAILED: &str = "Failed CSRF check";

/// Authentication error type.
///
/// The variants keep the precise cause for logs. Clients only ever see one
/// generic 401 message so they cannot probe which check failed.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No bearer header and no token cookie
    #[error("no token in Authorization header or cookie")]
    MissingToken,
    /// Token could not be decoded
    #[error("token is malformed")]
    MalformedToken,
    /// Token signature is invalid
    #[error("token signature is invalid")]
    InvalidSignature,
    /// Token has expired
    #[error("token has expired")]
    TokenExpired,
    /// Token is valid but its subject no longer exists
    #[error("token subject does not resolve to a user")]
    UnknownSubject,
    /// CSRF header missing or wrong on a state-changing request
    #[error("CSRF token missing or invalid")]
    CsrfCheckFailed,
    /// Internal error (signing, hashing, store lookup)
    #[error("internal authentication error: {0}")]
    Internal(String),
}

#[derive(Serialize)]
struct AuthErrorBody {
    message: &'static str,
}

impl AuthError {
    /// Get the error code for this error (logging only).
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::MissingToken => "missing_token",
            AuthError::MalformedToken => "malformed_token",
            AuthError::InvalidSignature => "invalid_signature",
            AuthError::TokenExpired => "token_expired",
            AuthError::UnknownSubject => "unknown_subject",
            AuthError::CsrfCheckFailed => "csrf_check_failed",
            AuthError::Internal(_) => "internal_error",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::MissingToken
            | AuthError::MalformedToken
            | AuthError::InvalidSignature
            | AuthError::TokenExpired
            | AuthError::UnknownSubject => StatusCode::UNAUTHORIZED,
            AuthError::CsrfCheckFailed => StatusCode::FORBIDDEN,
            AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show to the client.
    pub fn public_message(&self) -> &'static str {
        match self.status_code() {
            StatusCode::UNAUTHORIZED => AUTHENTICATION_ERROR,
            StatusCode::FORBIDDEN => CSRF_CHECK_FAILED,
            _ => "Internal server error",
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "Authentication pipeline failed");
        } else {
            tracing::debug!(reason = self.error_code(), "Request rejected: {self}");
        }

        let body = Json(AuthErrorBody {
            message: self.public_message(),
        });
        (status, body).into_response()
    }
}
