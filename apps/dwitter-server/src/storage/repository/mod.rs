// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Repository layer providing typed access to the document store.
//!
//! Each entity has a trait describing the store contract, a document-store
//! implementation for production and an in-memory implementation for tests.

pub mod tweets;
pub mod users;

pub use tweets::{
    Author, DocumentTweetRepository, InMemoryTweetRepository, StoredComment, StoredTweet,
    TweetRepository,
};
pub use users::{
    DocumentUserRepository, InMemoryUserRepository, NewUser, StoredUser, UserRepository,
};
