// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Request and response bodies for the REST API. Everything derives
//! `ToSchema` so the OpenAPI document stays in step with the handlers.
//!
//! Request string fields default to empty when absent, so a missing field
//! fails the same validation rule as an empty one.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::storage::{StoredComment, StoredTweet};

// =============================================================================
// Auth Models
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CsrfTokenResponse {
    pub csrf_token: String,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct SignupRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    /// Optional avatar URL
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Returned by signup, login and `/auth/me`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct AuthResponse {
    pub token: String,
    pub username: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

// =============================================================================
// Tweet Models
// =============================================================================

/// Body of tweet and comment create/update requests.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct TextRequest {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TweetQuery {
    /// Only return tweets by this username
    pub username: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub text: String,
    pub owner_id: String,
    pub name: String,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Tweet {
    pub id: String,
    pub text: String,
    /// Id of the author; only the author may modify the tweet
    pub owner_id: String,
    pub name: String,
    pub username: String,
    /// Author avatar URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub comments: Vec<Comment>,
    pub created_at: DateTime<Utc>,
}

impl From<StoredComment> for Comment {
    fn from(comment: StoredComment) -> Self {
        Self {
            id: comment.id,
            text: comment.text,
            owner_id: comment.owner_id,
            name: comment.name,
            username: comment.username,
            url: comment.url,
            created_at: comment.created_at,
        }
    }
}

impl From<StoredTweet> for Tweet {
    fn from(tweet: StoredTweet) -> Self {
        Self {
            id: tweet.id,
            text: tweet.text,
            owner_id: tweet.owner_id,
            name: tweet.name,
            username: tweet.username,
            url: tweet.url,
            comments: tweet.comments.into_iter().map(Comment::from).collect(),
            created_at: tweet.created_at,
        }
    }
}
