// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Stateless signed-token authentication for the identity service.
//!
//! ## Auth Flow
//!
//! 1. Client posts credentials to `/api/authenticate`
//! 2. The credential entry point verifies them against the user store
//! 3. The token codec signs `{sub, auth, exp}` with the shared HS512 key
//!    and the token is returned in the response header and body
//! 4. Subsequent requests send `Authorization: Bearer <token>`
//! 5. The middleware validates the token and installs the principal
//!    into the request's [`AuthContext`]; route gates read it from there
//!
//! ## Security
//!
//! - One symmetric signing key per process, derived at startup; rotation
//!   requires a restart and invalidates nothing (old tokens fail
//!   signature verification)
//! - No revocation or refresh: expiry is the only invalidation, so a
//!   leaked token stays usable until its `exp` passes
//! - Token validation failures degrade to an anonymous request rather
//!   than an error; gates on protected routes produce the 401

pub mod authenticator;
pub mod context;
pub mod error;
pub mod extractor;
pub mod middleware;
pub mod password;
pub mod principal;
pub mod roles;
pub mod token;

pub use authenticator::{CredentialAuthenticator, CredentialError};
pub use context::AuthContext;
pub use error::AuthError;
pub use extractor::{AdminOnly, Auth, OptionalAuth};
pub use password::{PasswordError, PasswordHasher};
pub use principal::Principal;
pub use token::{KeyError, SigningKey, TokenError, TokenProvider};
