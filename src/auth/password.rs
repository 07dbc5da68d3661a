// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Password hashing collaborator.
//!
//! One-way bcrypt hashing with a per-password salt. The service only
//! ever compares a presented password against a stored hash; plaintext
//! passwords are never persisted or logged.

use thiserror::Error;

/// Password hashing failure (invalid stored hash, cost out of range).
#[derive(Debug, Error)]
#[error("password hashing error: {0}")]
pub struct PasswordError(String);

/// Bcrypt password hasher/verifier.
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    cost: u32,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self {
            cost: bcrypt::DEFAULT_COST,
        }
    }
}

impl PasswordHasher {
    /// Create a hasher with the default cost.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a hasher with a custom cost factor.
    ///
    /// Tests use the minimum cost; production keeps the default.
    pub fn with_cost(cost: u32) -> Self {
        Self { cost }
    }

    /// Hash a password with a fresh random salt.
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        bcrypt::hash(password, self.cost).map_err(|e| PasswordError(e.to_string()))
    }

    /// Verify a presented password against a stored hash.
    ///
    /// `Ok(false)` means the password does not match; `Err` means the
    /// stored hash itself is unusable (corrupt record), which is a
    /// server-side problem rather than a credential failure.
    pub fn verify(&self, presented: &str, stored_hash: &str) -> Result<bool, PasswordError> {
        bcrypt::verify(presented, stored_hash).map_err(|e| PasswordError(e.to_string()))
    }
}
