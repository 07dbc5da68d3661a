// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authenticated principal representation.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::roles::{self, ROLE_ADMIN};

/// An authenticated identity and its granted roles.
///
/// This is the primary type used throughout the application to represent
/// the user making a request. It is constructed either by the credential
/// entry point at login (from the stored record) or by the token codec
/// (from a validated token), and is never mutated afterwards.
///
/// An empty role set is a valid authenticated state; whether it is
/// *sufficient* for a given route is the gate's decision, not this
/// type's.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    name: String,
    roles: BTreeSet<String>,
}

impl Principal {
    /// Create a principal. `name` must be non-empty; both constructors
    /// upstream (credential entry point, token codec) enforce this
    /// before calling.
    pub fn new(name: impl Into<String>, roles: BTreeSet<String>) -> Self {
        Self {
            name: name.into(),
            roles,
        }
    }

    /// The unique username this principal authenticated as.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The granted role names.
    pub fn roles(&self) -> &BTreeSet<String> {
        &self.roles
    }

    /// Check if the principal holds the given role (exact match).
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.contains(role)
    }

    /// Check if the principal holds at least one of the given roles.
    pub fn has_any_role(&self, required: &[&str]) -> bool {
        roles::has_any_role(&self.roles, required)
    }

    /// Check if this principal is an admin.
    pub fn is_admin(&self) -> bool {
        self.has_role(ROLE_ADMIN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::roles::ROLE_USER;

    fn sample_principal() -> Principal {
        Principal::new(
            "alice",
            BTreeSet::from([ROLE_USER.to_string(), ROLE_ADMIN.to_string()]),
        )
    }

    #[test]
    fn exposes_name_and_roles() {
        let principal = sample_principal();
        assert_eq!(principal.name(), "alice");
        assert_eq!(principal.roles().len(), 2);
    }

    #[test]
    fn has_role_is_exact_match() {
        let principal = sample_principal();
        assert!(principal.has_role(ROLE_USER));
        assert!(!principal.has_role("role_user"));
    }

    #[test]
    fn admin_check_uses_role_admin() {
        assert!(sample_principal().is_admin());

        let plain = Principal::new("bob", BTreeSet::from([ROLE_USER.to_string()]));
        assert!(!plain.is_admin());
    }

    #[test]
    fn empty_role_set_is_a_valid_principal() {
        let principal = Principal::new("carol", BTreeSet::new());
        assert!(principal.roles().is_empty());
        assert!(!principal.has_any_role(&[ROLE_USER, ROLE_ADMIN]));
    }
}
