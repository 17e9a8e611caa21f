// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! The `token` cookie that carries the identity token for browser clients.

use axum_extra::extract::cookie::{Cookie, SameSite};
use time::Duration;

/// Name of the identity cookie.
pub const TOKEN_COOKIE: &str = "token";

/// Cookie carrying `token`, living for `max_age_secs`.
///
/// HttpOnly keeps scripts away from it. SameSite=None with Secure lets a
/// separately hosted frontend send it along with credentialed requests.
pub fn token_cookie(token: String, max_age_secs: i64) -> Cookie<'static> {
    Cookie::build((TOKEN_COOKIE, token))
        .http_only(true)
        .secure(true)
        .same_site(SameSite::None)
        .path("/")
        .max_age(Duration::seconds(max_age_secs))
        .build()
}

/// Cookie that makes the client drop its identity cookie.
pub fn clear_token_cookie() -> Cookie<'static> {
    token_cookie(String::new(), 0)
}
