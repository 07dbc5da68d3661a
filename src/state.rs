// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::auth::{PasswordHasher, TokenProvider};
use crate::storage::FileStorage;

/// Shared application state.
///
/// Clone-cheap: handlers get their own handle per request. The token
/// provider (and the signing key inside it) is the only resource shared
/// across concurrent requests, and it is read-only after startup, so no
/// synchronization is needed anywhere in the request path.
#[derive(Clone)]
pub struct AppState {
    pub storage: FileStorage,
    pub tokens: Arc<TokenProvider>,
    pub passwords: Arc<PasswordHasher>,
}

impl AppState {
    pub fn new(storage: FileStorage, tokens: TokenProvider) -> Self {
        Self {
            storage,
            tokens: Arc::new(tokens),
            passwords: Arc::new(PasswordHasher::new()),
        }
    }

    /// Replace the password hasher (tests use a low-cost one).
    pub fn with_password_hasher(mut self, passwords: PasswordHasher) -> Self {
        self.passwords = Arc::new(passwords);
        self
    }
}
