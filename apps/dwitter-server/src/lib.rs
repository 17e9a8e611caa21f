// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Dwitter - Microblogging API Server
//!
//! Users sign up, post short tweets and comment on each other's tweets.
//! Every mutating request passes a CSRF check, a token check and, for
//! existing tweets and comments, an ownership check.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers and router (Axum)
//! - `auth` - Identity tokens, password hashing, CSRF guard
//! - `storage` - JSON document store and repositories
//! - `validation` - Request body rules

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod rate_limit;
pub mod state;
pub mod storage;
pub mod telemetry;
pub mod validation;

#[cfg(test)]
pub(crate) mod test_support;
