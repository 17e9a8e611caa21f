// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! JWT claims and authenticated caller representation.

use serde::{Deserialize, Serialize};

/// Claims carried by an identity token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenClaims {
    /// Subject: the user id
    pub sub: String,
    /// Issued at (Unix seconds)
    pub iat: i64,
    /// Expiration (Unix seconds); the token is invalid from this instant on
    pub exp: i64,
}

/// Authenticated caller attached to a request.
///
/// Built once by the `Auth` extractor and passed by value to handlers; it is
/// never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    /// Id of the user the token resolved to
    pub user_id: String,
    /// The raw token the caller presented
    pub token: String,
}
