// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Request-pipeline middleware for the auth layer.
//!
//! The CSRF check runs as middleware rather than as an extractor so that it
//! rejects a request before any handler extractor runs. A request with both
//! a bad CSRF header and a bad token therefore gets 403, not 401.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::csrf::CSRF_HEADER;
use crate::state::AppState;

/// Reject state-changing requests without a valid CSRF header.
///
/// Usage:
///
/// ```rust,ignore
/// router.layer(axum::middleware::from_fn_with_state(state.clone(), csrf_protection))
/// ```
pub async fn csrf_protection(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let header = request.headers().get(CSRF_HEADER);

    match state.csrf.check(request.method(), header) {
        Ok(()) => next.run(request).await,
        Err(e) => {
            tracing::debug!(
                method = %request.method(),
                path = %request.uri().path(),
                "CSRF check failed"
            );
            e.into_response()
        }
    }
}
