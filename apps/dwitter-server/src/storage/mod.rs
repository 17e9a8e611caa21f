// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Document Storage Module
//!
//! Persistent storage as one JSON document per entity under `DATA_DIR`.
//!
//! ## Storage Layout
//!
//! ```text
//! $DATA_DIR/
//!   users/
//!     {user_id}.json     # Credentials and profile fields
//!   tweets/
//!     {tweet_id}.json    # Tweet with embedded comments
//! ```
//!
//! Handlers never touch files directly; they go through the repository
//! traits, which also have in-memory implementations for tests.

pub mod document_fs;
pub mod ownership;
pub mod paths;
pub mod repository;

pub use document_fs::{DocumentStorage, StorageError, StorageResult};
pub use ownership::{OwnedResource, OwnershipEnforcer};
pub use paths::StoragePaths;
pub use repository::{
    Author, DocumentTweetRepository, DocumentUserRepository, InMemoryTweetRepository,
    InMemoryUserRepository, NewUser, StoredComment, StoredTweet, StoredUser, TweetRepository,
    UserRepository,
};
