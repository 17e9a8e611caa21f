// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Global fixed-window rate limiter.
//!
//! Every request counts against one shared bucket: at most `max_requests`
//! per `window`. The window starts with the first request after the previous
//! one ran out.

use std::time::{Duration, Instant};

use axum::{
    extract::{Request, State},
    http::{header::RETRY_AFTER, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tokio::sync::Mutex;

use crate::{error::ApiError, state::AppState};

pub const TOO_MANY_REQUESTS: &str = "Too many requests, please try again later";

#[derive(Debug)]
struct Window {
    started: Instant,
    count: u32,
}

/// Outcome of a rate limit check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateDecision {
    Allowed,
    /// Rejected; the window resets after this long
    Limited { retry_after: Duration },
}

#[derive(Debug)]
pub struct RateLimiter {
    window: Mutex<Option<Window>>,
    max_requests: u32,
    window_len: Duration,
}

impl RateLimiter {
    pub fn new(max_requests: u32, window_len: Duration) -> Self {
        Self {
            window: Mutex::new(None),
            max_requests,
            window_len,
        }
    }

    /// Count one request now.
    pub async fn check(&self) -> RateDecision {
        self.check_at(Instant::now()).await
    }

    /// Count one request at `now`.
    pub async fn check_at(&self, now: Instant) -> RateDecision {
        let mut slot = self.window.lock().await;

        if slot
            .as_ref()
            .is_none_or(|window| now.duration_since(window.started) >= self.window_len)
        {
            *slot = None;
        }
        let window = slot.get_or_insert_with(|| Window { started: now, count: 0 });

        if window.count < self.max_requests {
            window.count += 1;
            RateDecision::Allowed
        } else {
            let elapsed = now.duration_since(window.started);
            RateDecision::Limited {
                retry_after: self.window_len.saturating_sub(elapsed),
            }
        }
    }
}

/// Reject requests over the global limit with 429.
pub async fn rate_limit(State(state): State<AppState>, request: Request, next: Next) -> Response {
    match state.rate_limiter.check().await {
        RateDecision::Allowed => next.run(request).await,
        RateDecision::Limited { retry_after } => {
            tracing::warn!(
                path = %request.uri().path(),
                retry_after_secs = retry_after.as_secs(),
                "Rate limit exceeded"
            );
            // Round up so clients never retry inside the same window.
            let secs = retry_after.as_secs() + u64::from(retry_after.subsec_nanos() > 0);
            let mut response =
                ApiError::new(StatusCode::TOO_MANY_REQUESTS, TOO_MANY_REQUESTS).into_response();
            response.headers_mut().insert(RETRY_AFTER, HeaderValue::from(secs));
            response
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn allows_up_to_max_per_window() {
        let limiter = RateLimiter::new(3, Duration::from_secs(60));
        let start = Instant::now();

        for _ in 0..3 {
            assert_eq!(limiter.check_at(start).await, RateDecision::Allowed);
        }
        assert_eq!(
            limiter.check_at(start + Duration::from_secs(20)).await,
            RateDecision::Limited {
                retry_after: Duration::from_secs(40)
            }
        );
    }

    #[tokio::test]
    async fn window_resets_after_its_length() {
        let limiter = RateLimiter::new(1, Duration::from_secs(60));
        let start = Instant::now();

        assert_eq!(limiter.check_at(start).await, RateDecision::Allowed);
        assert!(matches!(
            limiter.check_at(start + Duration::from_secs(59)).await,
            RateDecision::Limited { .. }
        ));
        assert_eq!(
            limiter.check_at(start + Duration::from_secs(60)).await,
            RateDecision::Allowed
        );
    }

    #[tokio::test]
    async fn zero_max_rejects_everything() {
        let limiter = RateLimiter::new(0, Duration::from_secs(1));

        assert!(matches!(limiter.check().await, RateDecision::Limited { .. }));
    }
}
