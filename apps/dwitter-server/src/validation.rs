// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Input validation for request bodies.
//!
//! Rules run in a fixed order and the first failure is returned as a 400.
//! Validated values are trimmed, and the trimmed values are what handlers
//! store.

use url::Url;

use crate::{
    error::ApiError,
    models::{LoginRequest, SignupRequest, TextRequest},
};

pub const USERNAME_LENGTH: &str = "username should be between 6 and 15 characters";
pub const PASSWORD_LENGTH: &str = "password should be at least 5 characters";
pub const NAME_MISSING: &str = "name is missing";
pub const INVALID_EMAIL: &str = "invalid email";
pub const INVALID_URL: &str = "invalid URL";
pub const TEXT_LENGTH: &str = "text should be at least 3 characters.";

const USERNAME_MIN_CHARS: usize = 5;
const USERNAME_MAX_CHARS: usize = 15;
const PASSWORD_MIN_CHARS: usize = 5;
const TEXT_MIN_CHARS: usize = 3;

/// Trimmed login credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Signup fields after validation and normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidSignup {
    pub credentials: Credentials,
    pub name: String,
    /// Lower-cased
    pub email: String,
    pub url: Option<String>,
}

pub fn validate_credentials(req: LoginRequest) -> Result<Credentials, ApiError> {
    let username = req.username.trim();
    let username_len = username.chars().count();
    if !(USERNAME_MIN_CHARS..=USERNAME_MAX_CHARS).contains(&username_len) {
        return Err(ApiError::bad_request(USERNAME_LENGTH));
    }

    let password = req.password.trim();
    if password.chars().count() < PASSWORD_MIN_CHARS {
        return Err(ApiError::bad_request(PASSWORD_LENGTH));
    }

    Ok(Credentials {
        username: username.to_string(),
        password: password.to_string(),
    })
}

pub fn validate_signup(req: SignupRequest) -> Result<ValidSignup, ApiError> {
    let credentials = validate_credentials(LoginRequest {
        username: req.username,
        password: req.password,
    })?;

    let name = req.name.trim();
    if name.is_empty() {
        return Err(ApiError::bad_request(NAME_MISSING));
    }

    let email = req.email.trim().to_lowercase();
    if !is_valid_email(&email) {
        return Err(ApiError::bad_request(INVALID_EMAIL));
    }

    // Absent, null and empty all mean "no avatar".
    let url = match req.url.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) if is_valid_url(raw) => Some(raw.to_string()),
        Some(_) => return Err(ApiError::bad_request(INVALID_URL)),
    };

    Ok(ValidSignup {
        credentials,
        name: name.to_string(),
        email,
        url,
    })
}

/// Validate tweet or comment text and return it trimmed.
pub fn validate_text(req: TextRequest) -> Result<String, ApiError> {
    let text = req.text.trim();
    if text.chars().count() < TEXT_MIN_CHARS {
        return Err(ApiError::bad_request(TEXT_LENGTH));
    }
    Ok(text.to_string())
}

fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && !email.chars().any(char::is_whitespace)
        && domain.split('.').count() >= 2
        && domain.split('.').all(|label| !label.is_empty())
}

fn is_valid_url(raw: &str) -> bool {
    match Url::parse(raw) {
        Ok(url) => matches!(url.scheme(), "http" | "https") && url.host().is_some(),
        Err(_) => false,
    }
}
