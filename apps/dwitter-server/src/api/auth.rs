// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication endpoints.
//!
//! Signup and login hand the token back twice: in the body for API clients
//! and in the `token` cookie for browsers.

use axum::{extract::State, http::StatusCode, Json};
use axum_extra::extract::cookie::CookieJar;

use crate::{
    api::extract::JsonBody,
    auth::{clear_token_cookie, token_cookie, Auth},
    error::{ApiError, ErrorBody},
    models::{AuthResponse, CsrfTokenResponse, LoginRequest, MessageResponse, SignupRequest},
    state::AppState,
    storage::{NewUser, StorageError},
    validation::{validate_credentials, validate_signup},
};

const INVALID_CREDENTIALS: &str = "invalid user or password";

/// Issue a CSRF token for the `dwitter-csrf-token` header.
#[utoipa::path(
    get,
    path = "/auth/csrf-token",
    tag = "Auth",
    responses(
        (status = 200, description = "Fresh CSRF token", body = CsrfTokenResponse)
    )
)]
pub async fn csrf_token(State(state): State<AppState>) -> Result<Json<CsrfTokenResponse>, ApiError> {
    let csrf_token = state.csrf.issue()?;
    Ok(Json(CsrfTokenResponse { csrf_token }))
}

/// Create an account and sign in.
#[utoipa::path(
    post,
    path = "/auth/signup",
    tag = "Auth",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "Account created", body = AuthResponse),
        (status = 400, description = "Validation failed", body = ErrorBody),
        (status = 403, description = "Failed CSRF check", body = ErrorBody),
        (status = 409, description = "Username taken", body = ErrorBody)
    )
)]
pub async fn signup(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<SignupRequest>,
) -> Result<(StatusCode, CookieJar, Json<AuthResponse>), ApiError> {
    let signup = validate_signup(request)?;
    let username = signup.credentials.username;

    // Cheap check first so a taken name does not pay for a bcrypt hash.
    // `create` still rejects a duplicate that races in after it.
    if state.users.find_by_username(&username)?.is_some() {
        tracing::info!(username = %username, "Signup rejected: username taken");
        return Err(StorageError::AlreadyExists(username).into());
    }

    let password_hash = state.passwords.hash(&signup.credentials.password).await?;
    let user = state.users.create(NewUser {
        username,
        password_hash,
        name: signup.name,
        email: signup.email,
        url: signup.url,
    })?;
    tracing::info!(user_id = %user.id, username = %user.username, "User signed up");

    let token = state.tokens.issue(&user.id)?;
    let jar = CookieJar::new().add(token_cookie(token.clone(), state.tokens.ttl_secs()));

    Ok((
        StatusCode::CREATED,
        jar,
        Json(AuthResponse {
            token,
            username: user.username,
        }),
    ))
}

/// Sign in with username and password.
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed in", body = AuthResponse),
        (status = 400, description = "Validation failed", body = ErrorBody),
        (status = 401, description = "Invalid user or password", body = ErrorBody),
        (status = 403, description = "Failed CSRF check", body = ErrorBody)
    )
)]
pub async fn login(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<LoginRequest>,
) -> Result<(CookieJar, Json<AuthResponse>), ApiError> {
    let credentials = validate_credentials(request)?;

    let Some(user) = state.users.find_by_username(&credentials.username)? else {
        tracing::info!(username = %credentials.username, "Login rejected: unknown user");
        return Err(ApiError::unauthorized(INVALID_CREDENTIALS));
    };

    if !state
        .passwords
        .verify(&credentials.password, &user.password_hash)
        .await?
    {
        tracing::info!(user_id = %user.id, "Login rejected: wrong password");
        return Err(ApiError::unauthorized(INVALID_CREDENTIALS));
    }

    let token = state.tokens.issue(&user.id)?;
    let jar = CookieJar::new().add(token_cookie(token.clone(), state.tokens.ttl_secs()));
    tracing::info!(user_id = %user.id, "User logged in");

    Ok((
        jar,
        Json(AuthResponse {
            token,
            username: user.username,
        }),
    ))
}

/// Clear the token cookie.
///
/// The token itself stays valid until it expires; API clients that kept a
/// copy can keep using it.
#[utoipa::path(
    post,
    path = "/auth/logout",
    tag = "Auth",
    responses(
        (status = 200, description = "Cookie cleared", body = MessageResponse),
        (status = 403, description = "Failed CSRF check", body = ErrorBody)
    )
)]
pub async fn logout() -> (CookieJar, Json<MessageResponse>) {
    (
        CookieJar::new().add(clear_token_cookie()),
        Json(MessageResponse {
            message: "User has been logged out".to_string(),
        }),
    )
}

/// Return the caller's token and username.
#[utoipa::path(
    get,
    path = "/auth/me",
    tag = "Auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user", body = AuthResponse),
        (status = 401, description = "Authentication Error", body = ErrorBody),
        (status = 404, description = "User not found", body = ErrorBody)
    )
)]
pub async fn me(Auth(user): Auth, State(state): State<AppState>) -> Result<Json<AuthResponse>, ApiError> {
    let stored = state
        .users
        .find_by_id(&user.user_id)?
        .ok_or_else(|| ApiError::not_found("user not found"))?;

    Ok(Json(AuthResponse {
        token: user.token,
        username: stored.username,
    }))
}
