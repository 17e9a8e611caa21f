// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Shared fixtures for unit and router tests.

use std::{path::PathBuf, time::Duration};

use axum::{
    body::{to_bytes, Body},
    http::{header::AUTHORIZATION, header::CONTENT_TYPE, Method, Request},
    response::Response,
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use crate::{
    api,
    auth::CSRF_HEADER,
    config::AppConfig,
    state::AppState,
    storage::{NewUser, StoredUser},
};

/// Password of every seeded user.
pub const TEST_PASSWORD: &str = "abcd1234";

/// Configuration with the cheapest bcrypt cost and no practical rate limit.
pub fn test_config() -> AppConfig {
    AppConfig {
        jwt_secret: "test-jwt-secret".to_string(),
        jwt_expires_secs: 86_400,
        bcrypt_cost: 4,
        host: "127.0.0.1".to_string(),
        port: 0,
        data_dir: PathBuf::from("./data"),
        cors_allow_origin: None,
        csrf_secret: "test-csrf-secret".to_string(),
        rate_limit_window: Duration::from_secs(60),
        rate_limit_max_requests: 10_000,
    }
}

pub fn test_state() -> AppState {
    AppState::in_memory(test_config())
}

/// Insert a user directly into the credential store.
pub fn seed_user(state: &AppState, username: &str) -> StoredUser {
    state
        .users
        .create(NewUser {
            username: username.to_string(),
            password_hash: bcrypt::hash(TEST_PASSWORD, 4).unwrap(),
            name: format!("{username} name"),
            email: format!("{username}@example.com"),
            url: None,
        })
        .unwrap()
}

pub fn token_for(state: &AppState, user: &StoredUser) -> String {
    state.tokens.issue(&user.id).unwrap()
}

pub async fn body_json(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// The full router over an in-memory state, plus a valid CSRF token.
pub struct TestApp {
    pub state: AppState,
    pub router: Router,
    pub csrf: String,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_state(test_state())
    }

    pub fn with_state(state: AppState) -> Self {
        let router = api::router(state.clone());
        let csrf = state.csrf.issue().unwrap();
        Self { state, router, csrf }
    }

    /// Seed a user and return it with a token for it.
    pub fn user(&self, username: &str) -> (StoredUser, String) {
        let user = seed_user(&self.state, username);
        let token = token_for(&self.state, &user);
        (user, token)
    }

    pub async fn oneshot(&self, request: Request<Body>) -> Response {
        self.router.clone().oneshot(request).await.unwrap()
    }

    /// Send a request carrying the CSRF header, an optional bearer token
    /// and an optional JSON body.
    pub async fn call(&self, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Response {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(CSRF_HEADER, &self.csrf);
        if let Some(token) = token {
            builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
        }
        let body = match body {
            Some(json) => {
                builder = builder.header(CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        self.oneshot(builder.body(body).unwrap()).await
    }

    pub async fn get(&self, uri: &str, token: &str) -> Response {
        self.call(Method::GET, uri, Some(token), None).await
    }

    /// Create a tweet through the API and return its JSON.
    pub async fn create_tweet(&self, token: &str, text: &str) -> Value {
        let response = self
            .call(Method::POST, "/tweets", Some(token), Some(serde_json::json!({ "text": text })))
            .await;
        assert_eq!(response.status(), 201);
        body_json(response).await
    }
}
