// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User repository (credential store).
//!
//! Each user is one JSON document under `users/{user_id}.json`. Usernames are
//! unique and compared case-sensitively.

use std::sync::{Mutex, RwLock};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::super::{DocumentStorage, StorageError, StorageResult};

/// User record as persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoredUser {
    /// Unique user identifier (UUID)
    pub id: String,
    /// Login name, unique
    pub username: String,
    /// bcrypt hash of the password
    pub password_hash: String,
    /// Display name
    pub name: String,
    /// Normalized (lower-case) email
    pub email: String,
    /// Avatar URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// When the account was created
    pub created_at: DateTime<Utc>,
}

/// Fields required to create a user. The password must already be hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub name: String,
    pub email: String,
    pub url: Option<String>,
}

impl NewUser {
    fn into_stored(self) -> StoredUser {
        StoredUser {
            id: Uuid::new_v4().to_string(),
            username: self.username,
            password_hash: self.password_hash,
            name: self.name,
            email: self.email,
            url: self.url,
            created_at: Utc::now(),
        }
    }
}

/// Credential store contract.
pub trait UserRepository: Send + Sync {
    /// Persist a new user and return the stored record.
    ///
    /// # Errors
    /// `StorageError::AlreadyExists` when the username is taken.
    fn create(&self, user: NewUser) -> StorageResult<StoredUser>;

    /// Look a user up by exact username.
    fn find_by_username(&self, username: &str) -> StorageResult<Option<StoredUser>>;

    /// Look a user up by id. Ids that are not UUIDs never match.
    fn find_by_id(&self, user_id: &str) -> StorageResult<Option<StoredUser>>;

    /// Check that the backing store is usable.
    fn health_check(&self) -> StorageResult<()> {
        Ok(())
    }
}

/// Repository for users on the document store.
pub struct DocumentUserRepository {
    storage: DocumentStorage,
    /// Serializes the duplicate check and the insert.
    write_lock: Mutex<()>,
}

impl DocumentUserRepository {
    /// Create a new DocumentUserRepository.
    pub fn new(storage: DocumentStorage) -> Self {
        Self {
            storage,
            write_lock: Mutex::new(()),
        }
    }

    fn list_all(&self) -> StorageResult<Vec<StoredUser>> {
        let user_ids = self
            .storage
            .list_files(self.storage.paths().users_dir(), "json")?;

        let mut users = Vec::new();
        for id in user_ids {
            match self.storage.read_json(self.storage.paths().user(&id)) {
                Ok(user) => users.push(user),
                Err(e) => tracing::warn!(user_id = %id, error = %e, "Skipping unreadable user document"),
            }
        }
        Ok(users)
    }
}

impl UserRepository for DocumentUserRepository {
    fn create(&self, user: NewUser) -> StorageResult<StoredUser> {
        let _guard = self.write_lock.lock().map_err(|_| StorageError::LockPoisoned)?;

        if self.find_by_username(&user.username)?.is_some() {
            return Err(StorageError::AlreadyExists(user.username));
        }

        let stored = user.into_stored();
        self.storage
            .write_json(self.storage.paths().user(&stored.id), &stored)?;
        Ok(stored)
    }

    fn find_by_username(&self, username: &str) -> StorageResult<Option<StoredUser>> {
        Ok(self
            .list_all()?
            .into_iter()
            .find(|user| user.username == username))
    }

    fn find_by_id(&self, user_id: &str) -> StorageResult<Option<StoredUser>> {
        if Uuid::parse_str(user_id).is_err() {
            return Ok(None);
        }

        match self.storage.read_json(self.storage.paths().user(user_id)) {
            Ok(user) => Ok(Some(user)),
            Err(StorageError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn health_check(&self) -> StorageResult<()> {
        self.storage.health_check()
    }
}

/// Volatile user repository for tests and local experiments.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<Vec<StoredUser>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl UserRepository for InMemoryUserRepository {
    fn create(&self, user: NewUser) -> StorageResult<StoredUser> {
        let mut users = self.users.write().map_err(|_| StorageError::LockPoisoned)?;

        if users.iter().any(|existing| existing.username == user.username) {
            return Err(StorageError::AlreadyExists(user.username));
        }

        let stored = user.into_stored();
        users.push(stored.clone());
        Ok(stored)
    }

    fn find_by_username(&self, username: &str) -> StorageResult<Option<StoredUser>> {
        let users = self.users.read().map_err(|_| StorageError::LockPoisoned)?;
        Ok(users.iter().find(|user| user.username == username).cloned())
    }

    fn find_by_id(&self, user_id: &str) -> StorageResult<Option<StoredUser>> {
        let users = self.users.read().map_err(|_| StorageError::LockPoisoned)?;
        Ok(users.iter().find(|user| user.id == user_id).cloned())
    }
}
