// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Tweet API endpoints.
//!
//! Every endpoint requires authentication. Updates and deletes are limited
//! to the tweet's author and follow one sequence: id shape check (404),
//! load (404), owner check (403), then the write.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    api::extract::JsonBody,
    auth::{Auth, AuthError, AuthenticatedUser},
    error::{ApiError, ErrorBody},
    models::{TextRequest, Tweet, TweetQuery},
    state::AppState,
    storage::{Author, OwnershipEnforcer, StoredTweet},
    validation::validate_text,
};

/// Most tweets a listing returns.
pub const TWEET_LIST_LIMIT: usize = 20;

pub(super) fn tweet_not_found(tweet_id: &str) -> ApiError {
    ApiError::not_found(format!("Tweet id({tweet_id}) not found"))
}

/// Load a tweet, treating a malformed id like a missing one.
pub(super) fn find_tweet(state: &AppState, tweet_id: &str) -> Result<StoredTweet, ApiError> {
    if !state.tweets.is_valid_id(tweet_id) {
        return Err(tweet_not_found(tweet_id));
    }
    state
        .tweets
        .get(tweet_id)?
        .ok_or_else(|| tweet_not_found(tweet_id))
}

/// Display fields of the caller, copied onto what they write.
pub(super) fn load_author(state: &AppState, user: &AuthenticatedUser) -> Result<Author, ApiError> {
    let stored = state
        .users
        .find_by_id(&user.user_id)?
        .ok_or(AuthError::UnknownSubject)?;
    Ok(Author::from(&stored))
}

pub(super) fn ensure_owner<R: OwnershipEnforcer>(
    resource: &R,
    user: &AuthenticatedUser,
    resource_id: &str,
) -> Result<(), ApiError> {
    resource.verify_ownership(user).map_err(|e| {
        tracing::warn!(user_id = %user.user_id, resource_id, "Ownership check failed");
        ApiError::from(e)
    })
}

/// List the newest tweets, optionally by one author.
#[utoipa::path(
    get,
    path = "/tweets",
    tag = "Tweets",
    security(("bearer_auth" = [])),
    params(TweetQuery),
    responses(
        (status = 200, description = "Newest tweets first", body = [Tweet]),
        (status = 401, description = "Authentication Error", body = ErrorBody)
    )
)]
pub async fn list_tweets(
    Auth(_user): Auth,
    State(state): State<AppState>,
    Query(query): Query<TweetQuery>,
) -> Result<Json<Vec<Tweet>>, ApiError> {
    let tweets = state
        .tweets
        .list(query.username.as_deref(), TWEET_LIST_LIMIT)?;
    Ok(Json(tweets.into_iter().map(Tweet::from).collect()))
}

#[utoipa::path(
    get,
    path = "/tweets/{id}",
    tag = "Tweets",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Tweet id")),
    responses(
        (status = 200, description = "The tweet", body = Tweet),
        (status = 401, description = "Authentication Error", body = ErrorBody),
        (status = 404, description = "Tweet not found", body = ErrorBody)
    )
)]
pub async fn get_tweet(
    Auth(_user): Auth,
    State(state): State<AppState>,
    Path(tweet_id): Path<String>,
) -> Result<Json<Tweet>, ApiError> {
    let tweet = find_tweet(&state, &tweet_id)?;
    Ok(Json(Tweet::from(tweet)))
}

#[utoipa::path(
    post,
    path = "/tweets",
    tag = "Tweets",
    security(("bearer_auth" = [])),
    request_body = TextRequest,
    responses(
        (status = 201, description = "Tweet created", body = Tweet),
        (status = 400, description = "Validation failed", body = ErrorBody),
        (status = 401, description = "Authentication Error", body = ErrorBody),
        (status = 403, description = "Failed CSRF check", body = ErrorBody)
    )
)]
pub async fn create_tweet(
    Auth(user): Auth,
    State(state): State<AppState>,
    JsonBody(request): JsonBody<TextRequest>,
) -> Result<(StatusCode, Json<Tweet>), ApiError> {
    let text = validate_text(request)?;
    let author = load_author(&state, &user)?;

    let tweet = state.tweets.create(text, &author)?;
    tracing::info!(user_id = %user.user_id, tweet_id = %tweet.id, "Tweet created");

    Ok((StatusCode::CREATED, Json(Tweet::from(tweet))))
}

/// Replace a tweet's text. Author only.
#[utoipa::path(
    put,
    path = "/tweets/{id}",
    tag = "Tweets",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Tweet id")),
    request_body = TextRequest,
    responses(
        (status = 200, description = "Updated tweet", body = Tweet),
        (status = 400, description = "Validation failed", body = ErrorBody),
        (status = 401, description = "Authentication Error", body = ErrorBody),
        (status = 403, description = "Not the author, or failed CSRF check", body = ErrorBody),
        (status = 404, description = "Tweet not found", body = ErrorBody)
    )
)]
pub async fn update_tweet(
    Auth(user): Auth,
    State(state): State<AppState>,
    Path(tweet_id): Path<String>,
    JsonBody(request): JsonBody<TextRequest>,
) -> Result<Json<Tweet>, ApiError> {
    let text = validate_text(request)?;

    let tweet = find_tweet(&state, &tweet_id)?;
    ensure_owner(&tweet, &user, &tweet_id)?;

    let updated = state.tweets.update_text(&tweet_id, text)?;
    Ok(Json(Tweet::from(updated)))
}

/// Delete a tweet and its comments. Author only.
#[utoipa::path(
    delete,
    path = "/tweets/{id}",
    tag = "Tweets",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Tweet id")),
    responses(
        (status = 204, description = "Tweet deleted"),
        (status = 401, description = "Authentication Error", body = ErrorBody),
        (status = 403, description = "Not the author, or failed CSRF check", body = ErrorBody),
        (status = 404, description = "Tweet not found", body = ErrorBody)
    )
)]
pub async fn delete_tweet(
    Auth(user): Auth,
    State(state): State<AppState>,
    Path(tweet_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let tweet = find_tweet(&state, &tweet_id)?;
    ensure_owner(&tweet, &user, &tweet_id)?;

    state.tweets.delete(&tweet_id)?;
    tracing::info!(user_id = %user.user_id, tweet_id = %tweet_id, "Tweet deleted");

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use crate::test_support::{body_json, TestApp};
    use axum::{
        body::{to_bytes, Body},
        http::{Method, Request, StatusCode},
    };
    use serde_json::json;

    #[tokio::test]
    async fn create_tweet_records_owner_and_author() {
        let app = TestApp::new();
        let (user, token) = app.user("bob123");

        let tweet = app.create_tweet(&token, "  valid text  ").await;

        assert_eq!(tweet["text"], "valid text");
        assert_eq!(tweet["ownerId"], user.id.as_str());
        assert_eq!(tweet["username"], "bob123");
        assert_eq!(tweet["name"], "bob123 name");
        assert_eq!(tweet["comments"], json!([]));
    }

    #[tokio::test]
    async fn short_text_is_rejected() {
        let app = TestApp::new();
        let (_, token) = app.user("bob123");

        let response = app
            .call(Method::POST, "/tweets", Some(&token), Some(json!({ "text": "ok" })))
            .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await["message"],
            "text should be at least 3 characters."
        );
    }

    #[tokio::test]
    async fn create_without_auth_is_401() {
        let app = TestApp::new();
        let response = app
            .call(Method::POST, "/tweets", None, Some(json!({ "text": "valid text" })))
            .await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn get_tweet_is_stable() {
        let app = TestApp::new();
        let (_, token) = app.user("bob123");
        let tweet = app.create_tweet(&token, "valid text").await;
        let uri = format!("/tweets/{}", tweet["id"].as_str().unwrap());

        let first = to_bytes(app.get(&uri, &token).await.into_body(), usize::MAX)
            .await
            .unwrap();
        let second = to_bytes(app.get(&uri, &token).await.into_body(), usize::MAX)
            .await
            .unwrap();

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn malformed_and_unknown_ids_are_404() {
        let app = TestApp::new();
        let (_, token) = app.user("bob123");

        let response = app.get("/tweets/falseTweetId12345", &token).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            body_json(response).await["message"],
            "Tweet id(falseTweetId12345) not found"
        );

        let missing = uuid::Uuid::new_v4();
        let response = app.get(&format!("/tweets/{missing}"), &token).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn list_is_newest_first_and_filterable() {
        let app = TestApp::new();
        let (_, bob) = app.user("bob123");
        let (_, alice) = app.user("alice1");
        app.create_tweet(&bob, "first from bob").await;
        app.create_tweet(&alice, "from alice").await;
        app.create_tweet(&bob, "second from bob").await;

        let all = body_json(app.get("/tweets", &bob).await).await;
        let texts: Vec<&str> = all
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["text"].as_str().unwrap())
            .collect();
        assert_eq!(texts, ["second from bob", "from alice", "first from bob"]);

        let bobs = body_json(app.get("/tweets?username=bob123", &bob).await).await;
        assert_eq!(bobs.as_array().unwrap().len(), 2);
        assert!(bobs
            .as_array()
            .unwrap()
            .iter()
            .all(|t| t["username"] == "bob123"));
    }

    #[tokio::test]
    async fn list_is_capped() {
        let app = TestApp::new();
        let (_, token) = app.user("bob123");
        for i in 0..25 {
            app.create_tweet(&token, &format!("tweet number {i}")).await;
        }

        let all = body_json(app.get("/tweets", &token).await).await;
        assert_eq!(all.as_array().unwrap().len(), super::TWEET_LIST_LIMIT);
    }

    #[tokio::test]
    async fn owner_can_update_and_delete() {
        let app = TestApp::new();
        let (_, token) = app.user("bob123");
        let tweet = app.create_tweet(&token, "valid text").await;
        let uri = format!("/tweets/{}", tweet["id"].as_str().unwrap());

        let response = app
            .call(Method::PUT, &uri, Some(&token), Some(json!({ "text": "edited text" })))
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        let updated = body_json(response).await;
        assert_eq!(updated["text"], "edited text");
        assert_eq!(updated["id"], tweet["id"]);
        assert_eq!(updated["createdAt"], tweet["createdAt"]);

        let response = app.call(Method::DELETE, &uri, Some(&token), None).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(body.is_empty());

        let response = app.get(&uri, &token).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn non_owner_cannot_update_or_delete() {
        let app = TestApp::new();
        let (_, owner) = app.user("bob123");
        let (_, intruder) = app.user("alice1");
        let tweet = app.create_tweet(&owner, "valid text").await;
        let tweet_id = tweet["id"].as_str().unwrap();
        let uri = format!("/tweets/{tweet_id}");

        let response = app
            .call(Method::PUT, &uri, Some(&intruder), Some(json!({ "text": "hijacked" })))
            .await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            body_json(response).await["message"],
            "You don't have permission to modify this tweet"
        );

        let response = app.call(Method::DELETE, &uri, Some(&intruder), None).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let stored = app.state.tweets.get(tweet_id).unwrap().unwrap();
        assert_eq!(stored.text, "valid text");
    }

    #[tokio::test]
    async fn update_unknown_tweet_is_404() {
        let app = TestApp::new();
        let (_, token) = app.user("bob123");

        let response = app
            .call(
                Method::PUT,
                "/tweets/falseTweetId12345",
                Some(&token),
                Some(json!({ "text": "edited text" })),
            )
            .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn validation_runs_after_auth() {
        let app = TestApp::new();
        let request = Request::post("/tweets")
            .header(crate::auth::CSRF_HEADER, &app.csrf)
            .header("content-type", "application/json")
            .body(Body::from(r#"{"text":"ok"}"#))
            .unwrap();

        let response = app.oneshot(request).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
