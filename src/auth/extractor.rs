// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractors over the request's authentication context.
//!
//! These are the gates route handlers declare in their signatures:
//!
//! ```rust,ignore
//! async fn my_handler(Auth(principal): Auth) -> impl IntoResponse {
//!     // principal is the authenticated Principal
//! }
//! ```
//!
//! The middleware has already done all token work by the time an
//! extractor runs; extractors only read the context and apply the
//! route's role requirement.

use axum::{extract::FromRequestParts, http::request::Parts};

use super::{context::AuthContext, AuthError, Principal};

/// Extractor requiring an authenticated principal.
///
/// Rejects with 401 when the request's context is anonymous, i.e. no
/// token was presented or the presented token failed validation.
pub struct Auth(pub Principal);

impl<S> FromRequestParts<S> for Auth
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let context = parts
            .extensions
            .get::<AuthContext>()
            .cloned()
            .unwrap_or_default();

        match context.principal() {
            Some(principal) => Ok(Auth(principal.clone())),
            None => Err(AuthError::Unauthenticated),
        }
    }
}

/// Extractor requiring the admin role.
pub struct AdminOnly(pub Principal);

impl<S> FromRequestParts<S> for AdminOnly
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Auth(principal) = Auth::from_request_parts(parts, state).await?;

        if !principal.is_admin() {
            return Err(AuthError::InsufficientPermissions);
        }

        Ok(AdminOnly(principal))
    }
}

/// Optional authentication extractor.
///
/// Returns `None` instead of rejecting when the context is anonymous.
/// For routes that serve both authenticated and unauthenticated callers.
pub struct OptionalAuth(pub Option<Principal>);

impl<S> FromRequestParts<S> for OptionalAuth
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Auth::from_request_parts(parts, state).await {
            Ok(Auth(principal)) => Ok(OptionalAuth(Some(principal))),
            Err(_) => Ok(OptionalAuth(None)),
        }
    }
}
