// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Double-submit CSRF guard.
//!
//! The token handed out by `GET /auth/csrf-token` is a bcrypt hash of a
//! server-held secret. Browsers cannot attach custom headers to a cross-site
//! form post, so requiring the hash in `dwitter-csrf-token` on every
//! state-changing request blocks blind cross-site submissions.
//!
//! The token is not bound to a user or session: anyone who can fetch it can
//! replay it. It defends against forged form posts, not against a client that
//! can read responses.

use axum::http::{HeaderValue, Method};

use super::AuthError;

/// Request header carrying the CSRF token.
pub const CSRF_HEADER: &str = "dwitter-csrf-token";

/// bcrypt work factor for CSRF tokens. The minimum bcrypt allows: the hash
/// only has to hide the secret, not resist offline guessing of a password.
const CSRF_HASH_COST: u32 = 4;

/// Issues and checks CSRF tokens.
#[derive(Clone)]
pub struct CsrfGuard {
    secret: String,
}

impl CsrfGuard {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Issue a fresh CSRF token. Every issued token stays valid for as long
    /// as the secret does.
    pub fn issue(&self) -> Result<String, AuthError> {
        bcrypt::hash(&self.secret, CSRF_HASH_COST)
            .map_err(|e| AuthError::Internal(format!("bcrypt hash: {e}")))
    }

    /// Whether requests with this method must carry a CSRF token.
    pub fn requires_check(method: &Method) -> bool {
        matches!(
            *method,
            Method::POST | Method::PUT | Method::PATCH | Method::DELETE
        )
    }

    /// Check a request's CSRF header.
    ///
    /// Safe methods always pass. State-changing methods need a header that
    /// verifies against the secret.
    pub fn check(&self, method: &Method, header: Option<&HeaderValue>) -> Result<(), AuthError> {
        if !Self::requires_check(method) {
            return Ok(());
        }

        let token = header
            .and_then(|value| value.to_str().ok())
            .ok_or(AuthError::CsrfCheckFailed)?;

        // bcrypt takes the work factor from the hash itself; only accept ours.
        let parts = token
            .parse::<bcrypt::HashParts>()
            .map_err(|_| AuthError::CsrfCheckFailed)?;
        if parts.get_cost() != CSRF_HASH_COST {
            return Err(AuthError::CsrfCheckFailed);
        }

        match bcrypt::verify(&self.secret, token) {
            Ok(true) => Ok(()),
            _ => Err(AuthError::CsrfCheckFailed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn guard() -> CsrfGuard {
        CsrfGuard::new("csrf-secret-seed")
    }

    #[test]
    fn issued_token_passes_for_state_changing_methods() {
        let guard = guard();
        let token = guard.issue().unwrap();
        let header = HeaderValue::from_str(&token).unwrap();

        for method in [Method::POST, Method::PUT, Method::PATCH, Method::DELETE] {
            assert!(guard.check(&method, Some(&header)).is_ok(), "{method} should pass");
        }
    }

    #[test]
    fn safe_methods_skip_the_check() {
        let guard = guard();

        for method in [Method::GET, Method::HEAD, Method::OPTIONS] {
            assert!(guard.check(&method, None).is_ok(), "{method} should pass");
        }
    }

    #[test]
    fn missing_or_wrong_token_is_rejected() {
        let guard = guard();
        let wrong = HeaderValue::from_static("wrongCSRFToken");

        assert!(matches!(
            guard.check(&Method::POST, None),
            Err(AuthError::CsrfCheckFailed)
        ));
        assert!(matches!(
            guard.check(&Method::DELETE, Some(&wrong)),
            Err(AuthError::CsrfCheckFailed)
        ));
    }

    #[test]
    fn token_from_another_secret_is_rejected() {
        let foreign = CsrfGuard::new("another-secret").issue().unwrap();
        let header = HeaderValue::from_str(&foreign).unwrap();

        assert!(guard().check(&Method::PUT, Some(&header)).is_err());
    }

    #[test]
    fn raised_cost_token_is_rejected_without_hashing() {
        let guard = guard();
        let token = guard.issue().unwrap();
        assert!(token.starts_with("$2b$04$"));

        // At cost 31 a real verify would run for hours.
        let raised = token.replacen("$2b$04$", "$2b$31$", 1);
        let header = HeaderValue::from_str(&raised).unwrap();

        let started = std::time::Instant::now();
        assert!(matches!(
            guard.check(&Method::POST, Some(&header)),
            Err(AuthError::CsrfCheckFailed)
        ));
        assert!(started.elapsed() < std::time::Duration::from_secs(1));
    }

    #[test]
    fn tokens_differ_but_all_verify() {
        let guard = guard();
        let first = guard.issue().unwrap();
        let second = guard.issue().unwrap();

        assert_ne!(first, second);
        assert!(!first.contains("csrf-secret-seed"));
        for token in [first, second] {
            let header = HeaderValue::from_str(&token).unwrap();
            assert!(guard.check(&Method::POST, Some(&header)).is_ok());
        }
    }
}
