// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::{
    auth::{CsrfGuard, PasswordHasher, TokenService},
    config::AppConfig,
    rate_limit::RateLimiter,
    storage::{
        DocumentStorage, DocumentTweetRepository, DocumentUserRepository, InMemoryTweetRepository,
        InMemoryUserRepository, TweetRepository, UserRepository,
    },
};

/// Shared application state handed to every handler.
///
/// Everything is behind `Arc`, so cloning per request is cheap. The
/// repositories are the only mutable parts and guard themselves.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub tokens: TokenService,
    pub csrf: CsrfGuard,
    pub passwords: PasswordHasher,
    pub users: Arc<dyn UserRepository>,
    pub tweets: Arc<dyn TweetRepository>,
    pub rate_limiter: Arc<RateLimiter>,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        users: Arc<dyn UserRepository>,
        tweets: Arc<dyn TweetRepository>,
    ) -> Self {
        Self {
            tokens: TokenService::new(config.jwt_secret.as_bytes(), config.jwt_expires_secs),
            csrf: CsrfGuard::new(config.csrf_secret.clone()),
            passwords: PasswordHasher::new(config.bcrypt_cost),
            rate_limiter: Arc::new(RateLimiter::new(
                config.rate_limit_max_requests,
                config.rate_limit_window,
            )),
            config: Arc::new(config),
            users,
            tweets,
        }
    }

    /// State backed by the JSON document store. `storage` must be initialized.
    pub fn with_document_storage(config: AppConfig, storage: DocumentStorage) -> Self {
        let users = Arc::new(DocumentUserRepository::new(storage.clone()));
        let tweets = Arc::new(DocumentTweetRepository::new(storage));
        Self::new(config, users, tweets)
    }

    /// State backed by in-memory repositories.
    pub fn in_memory(config: AppConfig) -> Self {
        Self::new(
            config,
            Arc::new(InMemoryUserRepository::new()),
            Arc::new(InMemoryTweetRepository::new()),
        )
    }
}
