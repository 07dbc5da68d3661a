// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Request and response structures for the REST API. All types derive
//! `Serialize`/`Deserialize` and `ToSchema` for automatic JSON handling
//! and OpenAPI documentation.
//!
//! Request types carry their own `validate()` so handlers reject bad
//! input before touching storage or crypto.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::storage::StoredUser;

/// Login request body.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct LoginRequest {
    /// Username, 3-50 characters
    pub username: String,
    /// Password, 3-100 characters
    pub password: String,
}

impl LoginRequest {
    /// Validate field lengths.
    ///
    /// Only lengths are checked here; whether the pair is *correct* is
    /// the credential entry point's job.
    pub fn validate(&self) -> Result<(), &'static str> {
        if !(3..=50).contains(&self.username.chars().count()) {
            return Err("username must be 3-50 characters");
        }
        if !(3..=100).contains(&self.password.chars().count()) {
            return Err("password must be 3-100 characters");
        }
        Ok(())
    }
}

/// Login response body. The same token is also returned in the
/// `Authorization` response header.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    /// Signed bearer token
    pub token: String,
}

/// Signup request body.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SignupRequest {
    /// Desired username, 3-50 characters from `[A-Za-z0-9._-]`
    pub username: String,
    /// Password, 3-100 characters
    pub password: String,
    /// Display name, 3-50 characters
    pub nickname: String,
}

impl SignupRequest {
    /// Validate field lengths and the username character set.
    ///
    /// Usernames become storage record keys (one file per user), so
    /// they are restricted to a path-safe character set.
    pub fn validate(&self) -> Result<(), &'static str> {
        if !(3..=50).contains(&self.username.chars().count()) {
            return Err("username must be 3-50 characters");
        }
        if !self
            .username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        {
            return Err("username may only contain letters, digits, '.', '_' and '-'");
        }
        if !(3..=100).contains(&self.password.chars().count()) {
            return Err("password must be 3-100 characters");
        }
        if !(3..=50).contains(&self.nickname.chars().count()) {
            return Err("nickname must be 3-50 characters");
        }
        Ok(())
    }
}

/// Public view of a user record.
///
/// Deliberately omits the password hash and activation flag.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    /// Unique username
    pub username: String,
    /// Display name
    pub nickname: String,
    /// Granted role names
    pub authorities: BTreeSet<String>,
}

impl From<StoredUser> for UserResponse {
    fn from(user: StoredUser) -> Self {
        Self {
            username: user.username,
            nickname: user.nickname,
            authorities: user.authorities,
        }
    }
}
