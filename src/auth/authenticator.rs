// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Credential authentication entry point.
//!
//! Invoked only on the login path: verifies a presented username and
//! password against the stored record and produces the [`Principal`]
//! that the token codec then signs. Per-request bearer authentication
//! never comes through here.

use thiserror::Error;

use super::password::{PasswordError, PasswordHasher};
use super::principal::Principal;
use crate::storage::{normalize_username, FileStorage, StorageError, UserRepository};

/// Login failure kinds.
///
/// These are internal distinctions for logs and audit; the HTTP layer
/// collapses the first three into one generic response so callers
/// cannot probe which usernames exist.
#[derive(Debug, Error)]
pub enum CredentialError {
    /// No account for the given username
    #[error("unknown user")]
    UnknownUser,

    /// Password does not match the stored hash
    #[error("bad credential")]
    BadCredential,

    /// Account exists but is not activated
    #[error("account disabled")]
    AccountDisabled,

    /// Credential store failure
    #[error(transparent)]
    Store(#[from] StorageError),

    /// Stored hash unusable
    #[error(transparent)]
    Password(#[from] PasswordError),
}

impl CredentialError {
    /// Stable identifier for logs and audit records.
    pub fn kind(&self) -> &'static str {
        match self {
            CredentialError::UnknownUser => "unknown_user",
            CredentialError::BadCredential => "bad_credential",
            CredentialError::AccountDisabled => "account_disabled",
            CredentialError::Store(_) => "store_error",
            CredentialError::Password(_) => "password_error",
        }
    }
}

/// Verifies username/password pairs against the credential store.
pub struct CredentialAuthenticator<'a> {
    users: UserRepository<'a>,
    passwords: &'a PasswordHasher,
}

impl<'a> CredentialAuthenticator<'a> {
    /// Create an authenticator over the given store and hasher.
    pub fn new(storage: &'a FileStorage, passwords: &'a PasswordHasher) -> Self {
        Self {
            users: UserRepository::new(storage),
            passwords,
        }
    }

    /// Authenticate a username/password pair.
    ///
    /// Deactivated accounts are rejected before the password is
    /// compared, so the response for a disabled account never reveals
    /// whether the password was correct.
    pub fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Principal, CredentialError> {
        let username = normalize_username(username);

        let user = self
            .users
            .find_by_username(&username)?
            .ok_or(CredentialError::UnknownUser)?;

        if !user.activated {
            return Err(CredentialError::AccountDisabled);
        }

        if !self.passwords.verify(password, &user.password_hash)? {
            return Err(CredentialError::BadCredential);
        }

        Ok(Principal::new(user.username, user.authorities))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::roles::ROLE_USER;
    use crate::storage::{StoragePaths, StoredUser};
    use chrono::Utc;
    use std::collections::BTreeSet;
    use tempfile::TempDir;

    fn setup() -> (TempDir, FileStorage, PasswordHasher) {
        let temp = TempDir::new().unwrap();
        let paths = StoragePaths::new(temp.path());
        let mut storage = FileStorage::new(paths);
        storage.initialize().unwrap();
        (temp, storage, PasswordHasher::with_cost(4))
    }

    fn store_user(storage: &FileStorage, hasher: &PasswordHasher, activated: bool) {
        let user = StoredUser {
            username: "alice".to_string(),
            nickname: "Alice".to_string(),
            password_hash: hasher.hash("correct horse").unwrap(),
            activated,
            authorities: BTreeSet::from([ROLE_USER.to_string()]),
            created_at: Utc::now(),
        };
        UserRepository::new(storage).create(&user).unwrap();
    }

    #[test]
    fn correct_credentials_yield_principal() {
        let (_temp, storage, hasher) = setup();
        store_user(&storage, &hasher, true);

        let auth = CredentialAuthenticator::new(&storage, &hasher);
        let principal = auth.authenticate("alice", "correct horse").unwrap();

        assert_eq!(principal.name(), "alice");
        assert!(principal.has_role(ROLE_USER));
    }

    #[test]
    fn presented_username_is_normalized() {
        let (_temp, storage, hasher) = setup();
        store_user(&storage, &hasher, true);

        let auth = CredentialAuthenticator::new(&storage, &hasher);
        let principal = auth.authenticate("  alice  ", "correct horse").unwrap();
        assert_eq!(principal.name(), "alice");
    }

    #[test]
    fn unknown_user_is_distinguished_internally() {
        let (_temp, storage, hasher) = setup();

        let auth = CredentialAuthenticator::new(&storage, &hasher);
        let result = auth.authenticate("nobody", "whatever");
        assert!(matches!(result, Err(CredentialError::UnknownUser)));
    }

    #[test]
    fn wrong_password_is_bad_credential() {
        let (_temp, storage, hasher) = setup();
        store_user(&storage, &hasher, true);

        let auth = CredentialAuthenticator::new(&storage, &hasher);
        let result = auth.authenticate("alice", "wrong");
        assert!(matches!(result, Err(CredentialError::BadCredential)));
    }

    #[test]
    fn disabled_account_rejected_even_with_correct_password() {
        let (_temp, storage, hasher) = setup();
        store_user(&storage, &hasher, false);

        let auth = CredentialAuthenticator::new(&storage, &hasher);

        // Correct and incorrect passwords must be indistinguishable
        let with_correct = auth.authenticate("alice", "correct horse");
        let with_wrong = auth.authenticate("alice", "wrong");

        assert!(matches!(with_correct, Err(CredentialError::AccountDisabled)));
        assert!(matches!(with_wrong, Err(CredentialError::AccountDisabled)));
    }
}
