// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication middleware.
//!
//! Runs once per request, before any route handler. It resolves the
//! bearer token (if one is presented), validates it, and installs an
//! [`AuthContext`] into the request extensions.
//!
//! The middleware itself never rejects a request: an absent, malformed,
//! or invalid token just means the request continues with an anonymous
//! context, and route-level gates decide whether that is acceptable.
//! This keeps transport-level token extraction decoupled from
//! authorization semantics, and lets open routes (login, signup,
//! health) share the same pipeline.

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};

use super::context::AuthContext;
use crate::state::AppState;

/// Literal scheme prefix, trailing space included.
const BEARER_PREFIX: &str = "Bearer ";

/// Authentication middleware function.
///
/// Apply over the whole router with
/// `axum::middleware::from_fn_with_state(state, authenticate)`.
pub async fn authenticate(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let context = match bearer_token(request.headers()) {
        Some(token) => match state.tokens.decode(token) {
            Ok(principal) => {
                tracing::debug!(
                    user = %principal.name(),
                    uri = %request.uri(),
                    "authenticated request"
                );
                AuthContext::authenticated(principal)
            }
            Err(err) => {
                // The failure kind is logged for diagnosis; the raw token never is
                tracing::warn!(error = %err, uri = %request.uri(), "bearer token rejected");
                AuthContext::anonymous()
            }
        },
        None => AuthContext::anonymous(),
    };

    request.extensions_mut().insert(context);
    next.run(request).await
}

/// Resolve the bearer token from the Authorization header.
///
/// Returns the remainder after the literal `"Bearer "` prefix, or
/// `None` when the header is absent, unreadable, uses another scheme,
/// or carries an empty token.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix(BEARER_PREFIX)?;
    (!token.is_empty()).then_some(token)
}
