// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Comment API endpoints.
//!
//! Comments live inside their tweet, and every endpoint answers with the
//! whole updated tweet. Anyone signed in may comment; only a comment's
//! author may edit or delete it (the tweet's author has no say).

use axum::{
    extract::{Path, State},
    Json,
};

use super::tweets::{ensure_owner, find_tweet, load_author};
use crate::{
    api::extract::JsonBody,
    auth::Auth,
    error::{ApiError, ErrorBody},
    models::{TextRequest, Tweet},
    state::AppState,
    storage::{StoredComment, StoredTweet},
    validation::validate_text,
};

fn comment_not_found(comment_id: &str) -> ApiError {
    ApiError::not_found(format!("Comment id({comment_id}) not found"))
}

fn find_comment<'a>(
    state: &AppState,
    tweet: &'a StoredTweet,
    comment_id: &str,
) -> Result<&'a StoredComment, ApiError> {
    if !state.tweets.is_valid_id(comment_id) {
        return Err(comment_not_found(comment_id));
    }
    tweet
        .comment(comment_id)
        .ok_or_else(|| comment_not_found(comment_id))
}

#[utoipa::path(
    post,
    path = "/tweets/{id}/comments",
    tag = "Comments",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Tweet id")),
    request_body = TextRequest,
    responses(
        (status = 200, description = "Tweet with the new comment", body = Tweet),
        (status = 400, description = "Validation failed", body = ErrorBody),
        (status = 401, description = "Authentication Error", body = ErrorBody),
        (status = 403, description = "Failed CSRF check", body = ErrorBody),
        (status = 404, description = "Tweet not found", body = ErrorBody)
    )
)]
pub async fn create_comment(
    Auth(user): Auth,
    State(state): State<AppState>,
    Path(tweet_id): Path<String>,
    JsonBody(request): JsonBody<TextRequest>,
) -> Result<Json<Tweet>, ApiError> {
    let text = validate_text(request)?;

    find_tweet(&state, &tweet_id)?;
    let author = load_author(&state, &user)?;

    let updated = state.tweets.add_comment(&tweet_id, text, &author)?;
    tracing::info!(user_id = %user.user_id, tweet_id = %tweet_id, "Comment added");

    Ok(Json(Tweet::from(updated)))
}

/// Replace a comment's text. Comment author only.
#[utoipa::path(
    put,
    path = "/tweets/{id}/comments/{comment_id}",
    tag = "Comments",
    security(("bearer_auth" = [])),
    params(
        ("id" = String, Path, description = "Tweet id"),
        ("comment_id" = String, Path, description = "Comment id")
    ),
    request_body = TextRequest,
    responses(
        (status = 200, description = "Tweet with the edited comment", body = Tweet),
        (status = 400, description = "Validation failed", body = ErrorBody),
        (status = 401, description = "Authentication Error", body = ErrorBody),
        (status = 403, description = "Not the comment author, or failed CSRF check", body = ErrorBody),
        (status = 404, description = "Tweet or comment not found", body = ErrorBody)
    )
)]
pub async fn update_comment(
    Auth(user): Auth,
    State(state): State<AppState>,
    Path((tweet_id, comment_id)): Path<(String, String)>,
    JsonBody(request): JsonBody<TextRequest>,
) -> Result<Json<Tweet>, ApiError> {
    let text = validate_text(request)?;

    let tweet = find_tweet(&state, &tweet_id)?;
    let comment = find_comment(&state, &tweet, &comment_id)?;
    ensure_owner(comment, &user, &comment_id)?;

    let updated = state.tweets.update_comment(&tweet_id, &comment_id, text)?;
    Ok(Json(Tweet::from(updated)))
}

/// Delete a comment. Comment author only.
#[utoipa::path(
    delete,
    path = "/tweets/{id}/comments/{comment_id}",
    tag = "Comments",
    security(("bearer_auth" = [])),
    params(
        ("id" = String, Path, description = "Tweet id"),
        ("comment_id" = String, Path, description = "Comment id")
    ),
    responses(
        (status = 200, description = "Tweet without the comment", body = Tweet),
        (status = 401, description = "Authentication Error", body = ErrorBody),
        (status = 403, description = "Not the comment author, or failed CSRF check", body = ErrorBody),
        (status = 404, description = "Tweet or comment not found", body = ErrorBody)
    )
)]
pub async fn delete_comment(
    Auth(user): Auth,
    State(state): State<AppState>,
    Path((tweet_id, comment_id)): Path<(String, String)>,
) -> Result<Json<Tweet>, ApiError> {
    let tweet = find_tweet(&state, &tweet_id)?;
    let comment = find_comment(&state, &tweet, &comment_id)?;
    ensure_owner(comment, &user, &comment_id)?;

    let updated = state.tweets.delete_comment(&tweet_id, &comment_id)?;
    tracing::info!(user_id = %user.user_id, comment_id = %comment_id, "Comment deleted");

    Ok(Json(Tweet::from(updated)))
}
