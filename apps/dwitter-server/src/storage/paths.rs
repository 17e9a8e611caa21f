// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Path constants and utilities for the document store layout.

use std::path::{Path, PathBuf};

/// Default base directory for persistent documents.
pub const DATA_ROOT: &str = "./data";

/// Storage path utilities for the document store.
#[derive(Debug, Clone)]
pub struct StoragePaths {
    root: PathBuf,
}

impl Default for StoragePaths {
    fn default() -> Self {
        Self::new(DATA_ROOT)
    }
}

impl StoragePaths {
    /// Create a new StoragePaths with a custom root (useful for testing).
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Root directory for all documents.
    pub fn root(&self) -> &Path {
        &self.root
    }

    // ========== User Paths ==========

    /// Directory containing all user documents.
    pub fn users_dir(&self) -> PathBuf {
        self.root.join("users")
    }

    /// Path to a specific user document.
    pub fn user(&self, user_id: &str) -> PathBuf {
        self.users_dir().join(format!("{user_id}.json"))
    }

    // ========== Tweet Paths ==========

    /// Directory containing all tweet documents.
    pub fn tweets_dir(&self) -> PathBuf {
        self.root.join("tweets")
    }

    /// Path to a specific tweet document (comments are embedded).
    pub fn tweet(&self, tweet_id: &str) -> PathBuf {
        self.tweets_dir().join(format!("{tweet_id}.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_root_is_data_dir() {
        let paths = StoragePaths::default();
        assert_eq!(paths.root(), Path::new(DATA_ROOT));
    }

    #[test]
    fn document_paths_are_nested_under_collections() {
        let paths = StoragePaths::new("/srv/dwitter");
        assert_eq!(paths.user("u-1"), PathBuf::from("/srv/dwitter/users/u-1.json"));
        assert_eq!(paths.tweet("t-1"), PathBuf::from("/srv/dwitter/tweets/t-1.json"));
    }
}
