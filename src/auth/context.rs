// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Per-request authentication context.
//!
//! The context is an explicit value carried in the request's axum
//! extensions, not a thread-local: each request gets its own slot,
//! created by the authentication middleware and discarded with the
//! request. Concurrent requests can never observe each other's
//! principal because no context ever leaves its request.

use std::sync::Arc;

use super::principal::Principal;

/// Request-scoped holder of the current authenticated principal.
///
/// Empty (`anonymous`) until the authentication middleware validates a
/// bearer token, set at most once per request, read any number of times
/// by extractors and handlers downstream.
#[derive(Debug, Clone, Default)]
pub struct AuthContext {
    principal: Option<Arc<Principal>>,
}

impl AuthContext {
    /// Context for a request that presented no valid credential.
    pub fn anonymous() -> Self {
        Self { principal: None }
    }

    /// Context for a request whose bearer token validated.
    pub fn authenticated(principal: Principal) -> Self {
        Self {
            principal: Some(Arc::new(principal)),
        }
    }

    /// The authenticated principal, if any.
    pub fn principal(&self) -> Option<&Principal> {
        self.principal.as_deref()
    }

    /// The authenticated username, if any.
    ///
    /// Convenience for business logic that only needs "who is calling",
    /// e.g. resolving `GET /api/user` to the caller's own record.
    pub fn username(&self) -> Option<&str> {
        self.principal().map(Principal::name)
    }

    /// Whether a principal is present.
    pub fn is_authenticated(&self) -> bool {
        self.principal.is_some()
    }

    /// Whether the current principal holds the given role.
    /// Always false for an anonymous context.
    pub fn has_role(&self, role: &str) -> bool {
        self.principal()
            .map(|p| p.has_role(role))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::roles::{ROLE_ADMIN, ROLE_USER};
    use std::collections::BTreeSet;

    #[test]
    fn anonymous_context_is_empty() {
        let ctx = AuthContext::anonymous();
        assert!(!ctx.is_authenticated());
        assert!(ctx.principal().is_none());
        assert!(ctx.username().is_none());
        assert!(!ctx.has_role(ROLE_USER));
    }

    #[test]
    fn authenticated_context_exposes_principal() {
        let principal = Principal::new("alice", BTreeSet::from([ROLE_USER.to_string()]));
        let ctx = AuthContext::authenticated(principal);

        assert!(ctx.is_authenticated());
        assert_eq!(ctx.username(), Some("alice"));
        assert!(ctx.has_role(ROLE_USER));
        assert!(!ctx.has_role(ROLE_ADMIN));
    }

    #[test]
    fn default_is_anonymous() {
        assert!(!AuthContext::default().is_authenticated());
    }

    #[test]
    fn clones_share_the_same_principal() {
        let principal = Principal::new("alice", BTreeSet::new());
        let ctx = AuthContext::authenticated(principal);
        let clone = ctx.clone();

        assert_eq!(clone.username(), ctx.username());
    }
}
