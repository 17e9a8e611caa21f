// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Tweet repository.
//!
//! A tweet is one JSON document under `tweets/{tweet_id}.json` with its
//! comments embedded in append order. Author display fields are copied onto
//! the tweet and each comment at creation time, so reads never join users.

use std::sync::{Mutex, RwLock};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::super::{DocumentStorage, OwnedResource, StorageError, StorageResult};
use super::users::StoredUser;

/// Denormalized author fields copied onto tweets and comments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author {
    pub user_id: String,
    pub name: String,
    pub username: String,
    pub url: Option<String>,
}

impl From<&StoredUser> for Author {
    fn from(user: &StoredUser) -> Self {
        Self {
            user_id: user.id.clone(),
            name: user.name.clone(),
            username: user.username.clone(),
            url: user.url.clone(),
        }
    }
}

/// Comment embedded in a tweet document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoredComment {
    pub id: String,
    pub text: String,
    /// Id of the commenting user, immutable
    pub owner_id: String,
    pub name: String,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Tweet document as persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoredTweet {
    pub id: String,
    pub text: String,
    /// Id of the authoring user, immutable
    pub owner_id: String,
    pub name: String,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub comments: Vec<StoredComment>,
}

impl OwnedResource for StoredTweet {
    fn owner_user_id(&self) -> &str {
        &self.owner_id
    }

    fn resource_kind(&self) -> &'static str {
        "tweet"
    }
}

impl OwnedResource for StoredComment {
    fn owner_user_id(&self) -> &str {
        &self.owner_id
    }

    fn resource_kind(&self) -> &'static str {
        "comment"
    }
}

impl StoredTweet {
    fn new(text: String, author: &Author) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            text,
            owner_id: author.user_id.clone(),
            name: author.name.clone(),
            username: author.username.clone(),
            url: author.url.clone(),
            created_at: Utc::now(),
            comments: Vec::new(),
        }
    }

    /// Find an embedded comment by id.
    pub fn comment(&self, comment_id: &str) -> Option<&StoredComment> {
        self.comments.iter().find(|comment| comment.id == comment_id)
    }

    fn push_comment(&mut self, text: String, author: &Author) {
        self.comments.push(StoredComment {
            id: Uuid::new_v4().to_string(),
            text,
            owner_id: author.user_id.clone(),
            name: author.name.clone(),
            username: author.username.clone(),
            url: author.url.clone(),
            created_at: Utc::now(),
        });
    }

    fn set_comment_text(&mut self, comment_id: &str, text: String) -> StorageResult<()> {
        let comment = self
            .comments
            .iter_mut()
            .find(|comment| comment.id == comment_id)
            .ok_or_else(|| StorageError::NotFound(format!("Comment id({comment_id})")))?;
        comment.text = text;
        Ok(())
    }

    fn remove_comment(&mut self, comment_id: &str) -> StorageResult<()> {
        let before = self.comments.len();
        self.comments.retain(|comment| comment.id != comment_id);
        if self.comments.len() == before {
            return Err(StorageError::NotFound(format!("Comment id({comment_id})")));
        }
        Ok(())
    }
}

/// Resource store contract for tweets and their comments.
///
/// Every mutation is applied atomically with respect to other mutations of
/// the same repository. Missing tweets or comments yield
/// `StorageError::NotFound`.
pub trait TweetRepository: Send + Sync {
    /// Whether `id` has the shape of an identifier this store hands out.
    fn is_valid_id(&self, id: &str) -> bool {
        Uuid::parse_str(id).is_ok()
    }

    /// Newest tweets first, optionally only those by `username`.
    fn list(&self, username: Option<&str>, limit: usize) -> StorageResult<Vec<StoredTweet>>;

    fn get(&self, tweet_id: &str) -> StorageResult<Option<StoredTweet>>;

    fn create(&self, text: String, author: &Author) -> StorageResult<StoredTweet>;

    fn update_text(&self, tweet_id: &str, text: String) -> StorageResult<StoredTweet>;

    fn delete(&self, tweet_id: &str) -> StorageResult<()>;

    fn add_comment(&self, tweet_id: &str, text: String, author: &Author) -> StorageResult<StoredTweet>;

    fn update_comment(
        &self,
        tweet_id: &str,
        comment_id: &str,
        text: String,
    ) -> StorageResult<StoredTweet>;

    fn delete_comment(&self, tweet_id: &str, comment_id: &str) -> StorageResult<StoredTweet>;

    /// Check that the backing store is usable.
    fn health_check(&self) -> StorageResult<()> {
        Ok(())
    }
}

fn newest_first(
    tweets: impl Iterator<Item = StoredTweet>,
    username: Option<&str>,
    limit: usize,
) -> Vec<StoredTweet> {
    let mut tweets: Vec<StoredTweet> = tweets
        .filter(|tweet| username.is_none_or(|name| tweet.username == name))
        .collect();
    tweets.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    tweets.truncate(limit);
    tweets
}

fn tweet_not_found(tweet_id: &str) -> StorageError {
    StorageError::NotFound(format!("Tweet id({tweet_id})"))
}

/// Repository for tweets on the document store.
pub struct DocumentTweetRepository {
    storage: DocumentStorage,
    /// Serializes read-modify-write cycles on tweet documents.
    write_lock: Mutex<()>,
}

impl DocumentTweetRepository {
    /// Create a new DocumentTweetRepository.
    pub fn new(storage: DocumentStorage) -> Self {
        Self {
            storage,
            write_lock: Mutex::new(()),
        }
    }

    fn read(&self, tweet_id: &str) -> StorageResult<StoredTweet> {
        if !self.is_valid_id(tweet_id) {
            return Err(tweet_not_found(tweet_id));
        }
        match self.storage.read_json(self.storage.paths().tweet(tweet_id)) {
            Err(StorageError::NotFound(_)) => Err(tweet_not_found(tweet_id)),
            other => other,
        }
    }

    fn modify(
        &self,
        tweet_id: &str,
        mutate: impl FnOnce(&mut StoredTweet) -> StorageResult<()>,
    ) -> StorageResult<StoredTweet> {
        let _guard = self.write_lock.lock().map_err(|_| StorageError::LockPoisoned)?;

        let mut tweet = self.read(tweet_id)?;
        mutate(&mut tweet)?;
        self.storage
            .write_json(self.storage.paths().tweet(tweet_id), &tweet)?;
        Ok(tweet)
    }
}

impl TweetRepository for DocumentTweetRepository {
    fn list(&self, username: Option<&str>, limit: usize) -> StorageResult<Vec<StoredTweet>> {
        let tweet_ids = self
            .storage
            .list_files(self.storage.paths().tweets_dir(), "json")?;

        let mut tweets = Vec::with_capacity(tweet_ids.len());
        for id in tweet_ids {
            match self.read(&id) {
                Ok(tweet) => tweets.push(tweet),
                Err(e) => tracing::warn!(tweet_id = %id, error = %e, "Skipping unreadable tweet document"),
            }
        }

        Ok(newest_first(tweets.into_iter(), username, limit))
    }

    fn get(&self, tweet_id: &str) -> StorageResult<Option<StoredTweet>> {
        match self.read(tweet_id) {
            Ok(tweet) => Ok(Some(tweet)),
            Err(StorageError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn create(&self, text: String, author: &Author) -> StorageResult<StoredTweet> {
        let tweet = StoredTweet::new(text, author);
        self.storage
            .write_json(self.storage.paths().tweet(&tweet.id), &tweet)?;
        Ok(tweet)
    }

    fn update_text(&self, tweet_id: &str, text: String) -> StorageResult<StoredTweet> {
        self.modify(tweet_id, |tweet| {
            tweet.text = text;
            Ok(())
        })
    }

    fn delete(&self, tweet_id: &str) -> StorageResult<()> {
        let _guard = self.write_lock.lock().map_err(|_| StorageError::LockPoisoned)?;

        let path = self.storage.paths().tweet(tweet_id);
        if !self.is_valid_id(tweet_id) || !self.storage.exists(&path) {
            return Err(tweet_not_found(tweet_id));
        }
        self.storage.delete(path)
    }

    fn add_comment(&self, tweet_id: &str, text: String, author: &Author) -> StorageResult<StoredTweet> {
        self.modify(tweet_id, |tweet| {
            tweet.push_comment(text, author);
            Ok(())
        })
    }

    fn update_comment(
        &self,
        tweet_id: &str,
        comment_id: &str,
        text: String,
    ) -> StorageResult<StoredTweet> {
        self.modify(tweet_id, |tweet| tweet.set_comment_text(comment_id, text))
    }

    fn delete_comment(&self, tweet_id: &str, comment_id: &str) -> StorageResult<StoredTweet> {
        self.modify(tweet_id, |tweet| tweet.remove_comment(comment_id))
    }

    fn health_check(&self) -> StorageResult<()> {
        self.storage.health_check()
    }
}

/// Volatile tweet repository for tests and local experiments.
#[derive(Default)]
pub struct InMemoryTweetRepository {
    tweets: RwLock<Vec<StoredTweet>>,
}

impl InMemoryTweetRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn modify(
        &self,
        tweet_id: &str,
        mutate: impl FnOnce(&mut StoredTweet) -> StorageResult<()>,
    ) -> StorageResult<StoredTweet> {
        let mut tweets = self.tweets.write().map_err(|_| StorageError::LockPoisoned)?;
        let tweet = tweets
            .iter_mut()
            .find(|tweet| tweet.id == tweet_id)
            .ok_or_else(|| tweet_not_found(tweet_id))?;
        mutate(tweet)?;
        Ok(tweet.clone())
    }
}

impl TweetRepository for InMemoryTweetRepository {
    fn list(&self, username: Option<&str>, limit: usize) -> StorageResult<Vec<StoredTweet>> {
        let tweets = self.tweets.read().map_err(|_| StorageError::LockPoisoned)?;
        // Reverse insertion order first so equal timestamps stay newest-first.
        Ok(newest_first(tweets.iter().rev().cloned(), username, limit))
    }

    fn get(&self, tweet_id: &str) -> StorageResult<Option<StoredTweet>> {
        let tweets = self.tweets.read().map_err(|_| StorageError::LockPoisoned)?;
        Ok(tweets.iter().find(|tweet| tweet.id == tweet_id).cloned())
    }

    fn create(&self, text: String, author: &Author) -> StorageResult<StoredTweet> {
        let tweet = StoredTweet::new(text, author);
        self.tweets
            .write()
            .map_err(|_| StorageError::LockPoisoned)?
            .push(tweet.clone());
        Ok(tweet)
    }

    fn update_text(&self, tweet_id: &str, text: String) -> StorageResult<StoredTweet> {
        self.modify(tweet_id, |tweet| {
            tweet.text = text;
            Ok(())
        })
    }

    fn delete(&self, tweet_id: &str) -> StorageResult<()> {
        let mut tweets = self.tweets.write().map_err(|_| StorageError::LockPoisoned)?;
        let before = tweets.len();
        tweets.retain(|tweet| tweet.id != tweet_id);
        if tweets.len() == before {
            return Err(tweet_not_found(tweet_id));
        }
        Ok(())
    }

    fn add_comment(&self, tweet_id: &str, text: String, author: &Author) -> StorageResult<StoredTweet> {
        self.modify(tweet_id, |tweet| {
            tweet.push_comment(text, author);
            Ok(())
        })
    }

    fn update_comment(
        &self,
        tweet_id: &str,
        comment_id: &str,
        text: String,
    ) -> StorageResult<StoredTweet> {
        self.modify(tweet_id, |tweet| tweet.set_comment_text(comment_id, text))
    }

    fn delete_comment(&self, tweet_id: &str, comment_id: &str) -> StorageResult<StoredTweet> {
        self.modify(tweet_id, |tweet| tweet.remove_comment(comment_id))
    }
}
