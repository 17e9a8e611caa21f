// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Password hashing.
//!
//! bcrypt is deliberately slow, so both operations run on the blocking pool
//! instead of stalling the async runtime.

use super::AuthError;

/// Default bcrypt work factor for stored passwords.
pub const DEFAULT_PASSWORD_COST: u32 = 12;

/// Hashes and verifies user passwords with bcrypt.
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Hash a plaintext password.
    pub async fn hash(&self, password: &str) -> Result<String, AuthError> {
        let password = password.to_owned();
        let cost = self.cost;
        tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
            .await
            .map_err(|e| AuthError::Internal(format!("hash task: {e}")))?
            .map_err(|e| AuthError::Internal(format!("bcrypt hash: {e}")))
    }

    /// Check a plaintext password against a stored hash.
    ///
    /// A hash that cannot be parsed counts as a mismatch.
    pub async fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        let password = password.to_owned();
        let hash = hash.to_owned();
        let verified = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
            .await
            .map_err(|e| AuthError::Internal(format!("verify task: {e}")))?;

        match verified {
            Ok(matches) => Ok(matches),
            Err(e) => {
                tracing::warn!(error = %e, "Stored password hash is unreadable");
                Ok(false)
            }
        }
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(DEFAULT_PASSWORD_COST)
    }
}
