// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User repository for persistent storage.
//!
//! This is the credential store consulted at login and signup. Each user
//! is stored as a separate JSON file under `DATA_DIR/users/`, keyed by
//! username. The stored record carries the bcrypt password hash, the
//! activation flag, and the set of granted role names.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

use super::{FileStorage, StorageError, StorageResult};

/// User record stored on the filesystem.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoredUser {
    /// Unique username (record key)
    pub username: String,
    /// Display name
    pub nickname: String,
    /// Bcrypt hash of the user's password (never serialized into API responses)
    pub password_hash: String,
    /// Whether the account is activated; deactivated accounts cannot log in
    pub activated: bool,
    /// Role names granted to this user (e.g. "ROLE_USER", "ROLE_ADMIN")
    pub authorities: BTreeSet<String>,
    /// When the account was created
    pub created_at: DateTime<Utc>,
}

/// Canonical record-key form of a username.
///
/// Applies Unicode NFKC normalization and trims surrounding whitespace so
/// visually-identical usernames resolve to the same stored record. Both
/// signup and login pass presented usernames through this before lookup.
pub fn normalize_username(username: &str) -> String {
    username.trim().nfkc().collect()
}

/// Repository for user operations on persistent storage.
pub struct UserRepository<'a> {
    storage: &'a FileStorage,
}

impl<'a> UserRepository<'a> {
    /// Create a new UserRepository.
    pub fn new(storage: &'a FileStorage) -> Self {
        Self { storage }
    }

    /// Check if a user record exists.
    pub fn exists(&self, username: &str) -> bool {
        self.storage.exists(self.storage.paths().user(username))
    }

    /// Look up a user by username.
    ///
    /// Returns `Ok(None)` when no record exists; other storage failures
    /// propagate as errors.
    pub fn find_by_username(&self, username: &str) -> StorageResult<Option<StoredUser>> {
        let path = self.storage.paths().user(username);
        if !self.storage.exists(&path) {
            return Ok(None);
        }
        self.storage.read_json(path).map(Some)
    }

    /// Create a new user record.
    pub fn create(&self, user: &StoredUser) -> StorageResult<()> {
        let username = &user.username;

        if self.exists(username) {
            return Err(StorageError::AlreadyExists(format!("User {username}")));
        }

        self.storage
            .write_json(self.storage.paths().user(username), user)
    }

    /// Update an existing user record.
    pub fn update(&self, user: &StoredUser) -> StorageResult<()> {
        let username = &user.username;

        if !self.exists(username) {
            return Err(StorageError::NotFound(format!("User {username}")));
        }

        self.storage
            .write_json(self.storage.paths().user(username), user)
    }

    /// List all stored usernames.
    pub fn list_usernames(&self) -> StorageResult<Vec<String>> {
        self.storage
            .list_files(self.storage.paths().users_dir(), "json")
    }
}
