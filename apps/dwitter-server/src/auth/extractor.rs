// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractor for authenticated users.
//!
//! Use the `Auth` extractor in handlers to require authentication:
//!
//! ```rust,ignore
//! async fn my_handler(Auth(user): Auth) -> impl IntoResponse {
//!     // user is AuthenticatedUser
//! }
//! ```

use axum::{
    extract::FromRequestParts,
    http::{
        header::AUTHORIZATION,
        request::Parts,
        HeaderMap,
    },
};
use axum_extra::extract::cookie::CookieJar;

use super::{cookies::TOKEN_COOKIE, AuthError, AuthenticatedUser};
use crate::state::AppState;

/// Extractor for authenticated users.
///
/// The token is taken from `Authorization: Bearer <token>` first and from the
/// `token` cookie otherwise. It must verify, be unexpired, and name a user
/// that still exists.
///
/// # Example
///
/// ```rust,ignore
/// async fn me(
///     Auth(user): Auth,
///     State(state): State<AppState>,
/// ) -> Result<Json<AuthResponse>, ApiError> {
///     // user.user_id is the caller's id
/// }
/// ```
pub struct Auth(pub AuthenticatedUser);

impl FromRequestParts<AppState> for Auth {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = token_from_headers(&parts.headers).ok_or(AuthError::MissingToken)?;

        let user_id = state.tokens.verify(&token)?;

        let user = state
            .users
            .find_by_id(&user_id)
            .map_err(|e| AuthError::Internal(format!("user lookup: {e}")))?
            .ok_or(AuthError::UnknownSubject)?;

        Ok(Auth(AuthenticatedUser {
            user_id: user.id,
            token,
        }))
    }
}

/// Pull the raw token out of the request headers.
///
/// A bearer header wins over the cookie. An `Authorization` header that is
/// not a bearer credential is ignored. An empty value counts as absent.
fn token_from_headers(headers: &HeaderMap) -> Option<String> {
    let bearer = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty());
    if let Some(token) = bearer {
        return Some(token.to_string());
    }

    CookieJar::from_headers(headers)
        .get(TOKEN_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .filter(|token| !token.is_empty())
}
