// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Identity token issuance and verification (HS256 JWT).
//!
//! Tokens are stateless: any instance holding the signing secret can verify
//! them without a session lookup. A token cannot be revoked before it
//! expires.

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use super::{claims::TokenClaims, AuthError};

/// Default token lifetime (24 hours).
pub const DEFAULT_TOKEN_TTL_SECS: i64 = 86_400;

/// Signs and verifies identity tokens.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl_secs: i64,
}

impl TokenService {
    /// Create a token service from a shared secret and lifetime.
    pub fn new(secret: &[u8], ttl_secs: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            ttl_secs,
        }
    }

    /// Token lifetime in seconds.
    pub fn ttl_secs(&self) -> i64 {
        self.ttl_secs
    }

    /// Issue a token for `subject_id`, valid for the configured lifetime.
    pub fn issue(&self, subject_id: &str) -> Result<String, AuthError> {
        self.issue_at(subject_id, Utc::now().timestamp())
    }

    /// Issue a token as if the current time were `now` (Unix seconds).
    pub fn issue_at(&self, subject_id: &str, now: i64) -> Result<String, AuthError> {
        let exp = now
            .checked_add(self.ttl_secs)
            .ok_or_else(|| AuthError::Internal("token expiry overflows".to_string()))?;
        let claims = TokenClaims {
            sub: subject_id.to_string(),
            iat: now,
            exp,
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Internal(format!("jwt encode: {e}")))
    }

    /// Verify a token and return its subject id.
    pub fn verify(&self, token: &str) -> Result<String, AuthError> {
        self.verify_at(token, Utc::now().timestamp())
    }

    /// Verify a token against the instant `now` (Unix seconds).
    pub fn verify_at(&self, token: &str, now: i64) -> Result<String, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked below against `now`, without leeway.
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["exp", "sub"]);

        let token_data = decode::<TokenClaims>(token, &self.decoding_key, &validation)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::InvalidSignature => AuthError::InvalidSignature,
                _ => AuthError::MalformedToken,
            })?;

        let claims = token_data.claims;
        if now >= claims.exp {
            return Err(AuthError::TokenExpired);
        }

        Ok(claims.sub)
    }
}
