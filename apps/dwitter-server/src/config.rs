// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Configuration is loaded from the environment at startup (a `.env` file is
//! honoured in development). Secrets have no defaults: the server refuses to
//! start without them.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `JWT_SECRET` | HMAC secret for identity tokens | Required |
//! | `JWT_EXPIRES_SEC` | Token lifetime in seconds | `86400` |
//! | `BCRYPT_SALT_ROUNDS` | bcrypt cost for passwords (4..=31) | `12` |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `DATA_DIR` | Root directory for user and tweet documents | `./data` |
//! | `CORS_ALLOW_ORIGIN` | Allowed browser origin (`*` mirrors the caller) | `*` |
//! | `CSRF_SECRET_KEY` | Secret the CSRF tokens are derived from | Required |
//! | `RATE_LIMIT_WINDOW` | Rate limit window in milliseconds | `60000` |
//! | `RATE_LIMIT_MAX_REQUEST` | Requests allowed per window | `10` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::{fmt, path::PathBuf, time::Duration};

use axum::http::HeaderValue;

use crate::storage::paths::DATA_ROOT;

pub const JWT_SECRET_ENV: &str = "JWT_SECRET";
pub const JWT_EXPIRES_SEC_ENV: &str = "JWT_EXPIRES_SEC";
pub const BCRYPT_SALT_ROUNDS_ENV: &str = "BCRYPT_SALT_ROUNDS";
pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
/// Environment variable name for the document store root.
pub const DATA_DIR_ENV: &str = "DATA_DIR";
pub const CORS_ALLOW_ORIGIN_ENV: &str = "CORS_ALLOW_ORIGIN";
pub const CSRF_SECRET_KEY_ENV: &str = "CSRF_SECRET_KEY";
pub const RATE_LIMIT_WINDOW_ENV: &str = "RATE_LIMIT_WINDOW";
pub const RATE_LIMIT_MAX_REQUEST_ENV: &str = "RATE_LIMIT_MAX_REQUEST";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

const DEFAULT_JWT_EXPIRES_SECS: i64 = 86_400;
/// Upper bound on the token lifetime (one year).
const MAX_JWT_EXPIRES_SECS: i64 = 365 * 86_400;
const DEFAULT_BCRYPT_COST: u32 = 12;
const MIN_BCRYPT_COST: u32 = 4;
const MAX_BCRYPT_COST: u32 = 31;
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_RATE_LIMIT_WINDOW_MS: u64 = 60_000;
const DEFAULT_RATE_LIMIT_MAX_REQUESTS: u32 = 10;

/// Configuration loading error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("required environment variable {0} is not set")]
    Missing(&'static str),
    #[error("environment variable {name} is invalid: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Server configuration.
#[derive(Clone)]
pub struct AppConfig {
    pub jwt_secret: String,
    pub jwt_expires_secs: i64,
    pub bcrypt_cost: u32,
    pub host: String,
    pub port: u16,
    pub data_dir: PathBuf,
    /// Exact allowed origin; `None` mirrors the request origin.
    pub cors_allow_origin: Option<HeaderValue>,
    pub csrf_secret: String,
    pub rate_limit_window: Duration,
    pub rate_limit_max_requests: u32,
}

impl AppConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let jwt_secret = get(JWT_SECRET_ENV).ok_or(ConfigError::Missing(JWT_SECRET_ENV))?;
        let csrf_secret =
            get(CSRF_SECRET_KEY_ENV).ok_or(ConfigError::Missing(CSRF_SECRET_KEY_ENV))?;

        let jwt_expires_secs = parse_or(get(JWT_EXPIRES_SEC_ENV), JWT_EXPIRES_SEC_ENV, DEFAULT_JWT_EXPIRES_SECS)?;
        if !(1..=MAX_JWT_EXPIRES_SECS).contains(&jwt_expires_secs) {
            return Err(invalid(JWT_EXPIRES_SEC_ENV, "must be between 1 and 31536000"));
        }

        let bcrypt_cost = parse_or(get(BCRYPT_SALT_ROUNDS_ENV), BCRYPT_SALT_ROUNDS_ENV, DEFAULT_BCRYPT_COST)?;
        if !(MIN_BCRYPT_COST..=MAX_BCRYPT_COST).contains(&bcrypt_cost) {
            return Err(invalid(BCRYPT_SALT_ROUNDS_ENV, "must be between 4 and 31"));
        }

        let port = parse_or(get(PORT_ENV), PORT_ENV, DEFAULT_PORT)?;

        let rate_limit_window_ms =
            parse_or(get(RATE_LIMIT_WINDOW_ENV), RATE_LIMIT_WINDOW_ENV, DEFAULT_RATE_LIMIT_WINDOW_MS)?;
        if rate_limit_window_ms == 0 {
            return Err(invalid(RATE_LIMIT_WINDOW_ENV, "must be positive"));
        }
        let rate_limit_max_requests = parse_or(
            get(RATE_LIMIT_MAX_REQUEST_ENV),
            RATE_LIMIT_MAX_REQUEST_ENV,
            DEFAULT_RATE_LIMIT_MAX_REQUESTS,
        )?;

        let cors_allow_origin = match get(CORS_ALLOW_ORIGIN_ENV) {
            None => None,
            Some(origin) if origin.trim() == "*" => None,
            Some(origin) => Some(
                HeaderValue::from_str(origin.trim())
                    .map_err(|e| invalid(CORS_ALLOW_ORIGIN_ENV, e.to_string()))?,
            ),
        };

        Ok(Self {
            jwt_secret,
            jwt_expires_secs,
            bcrypt_cost,
            host: get(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            data_dir: get(DATA_DIR_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DATA_ROOT)),
            cors_allow_origin,
            csrf_secret,
            rate_limit_window: Duration::from_millis(rate_limit_window_ms),
            rate_limit_max_requests,
        })
    }

    /// Address the server binds to.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("jwt_secret", &"<redacted>")
            .field("jwt_expires_secs", &self.jwt_expires_secs)
            .field("bcrypt_cost", &self.bcrypt_cost)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("data_dir", &self.data_dir)
            .field("cors_allow_origin", &self.cors_allow_origin)
            .field("csrf_secret", &"<redacted>")
            .field("rate_limit_window", &self.rate_limit_window)
            .field("rate_limit_max_requests", &self.rate_limit_max_requests)
            .finish()
    }
}

fn parse_or<T>(raw: Option<String>, name: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: fmt::Display,
{
    match raw {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| invalid(name, e.to_string())),
    }
}

fn invalid(name: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        name,
        reason: reason.into(),
    }
}
