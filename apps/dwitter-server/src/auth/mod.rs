// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Identity tokens, password hashing and CSRF protection for the Dwitter API.
//!
//! ## Auth Flow
//!
//! 1. `POST /auth/signup` or `POST /auth/login` verifies credentials
//! 2. The server signs an HS256 JWT whose `sub` is the user id
//! 3. The token is returned in the body and set as the `token` cookie
//! 4. Later requests present it as `Authorization: Bearer <token>` or via the
//!    cookie; the `Auth` extractor verifies it and loads the user
//!
//! ## CSRF
//!
//! Every POST, PUT, PATCH and DELETE must carry the `dwitter-csrf-token`
//! header obtained from `GET /auth/csrf-token`. The check runs before
//! authentication.

pub mod claims;
pub mod cookies;
pub mod csrf;
pub mod error;
pub mod extractor;
pub mod middleware;
pub mod password;
pub mod token;

pub use claims::{AuthenticatedUser, TokenClaims};
pub use cookies::{clear_token_cookie, token_cookie, TOKEN_COOKIE};
pub use csrf::{CsrfGuard, CSRF_HEADER};
pub use error::AuthError;
pub use extractor::Auth;
pub use middleware::csrf_protection;
pub use password::PasswordHasher;
pub use token::TokenService;
