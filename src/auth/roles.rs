// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Role names for authorization.
//!
//! Roles are plain strings carried in the token's `auth` claim and
//! matched verbatim by route gates. The service itself only ever grants
//! the two names below; tokens minted elsewhere with the shared secret
//! may carry arbitrary role names and still authenticate.

/// Granted to every registered account.
pub const ROLE_USER: &str = "ROLE_USER";

/// Grants access to other users' records and administrative routes.
pub const ROLE_ADMIN: &str = "ROLE_ADMIN";

/// Check whether `roles` holds at least one of the `required` role names.
///
/// This is the query surface route gates use; matching is exact string
/// equality with no hierarchy between roles.
pub fn has_any_role<'a>(
    roles: impl IntoIterator<Item = &'a String>,
    required: &[&str],
) -> bool {
    roles
        .into_iter()
        .any(|role| required.iter().any(|r| r == role))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn matches_any_required_role() {
        let roles = BTreeSet::from([ROLE_USER.to_string()]);
        assert!(has_any_role(&roles, &[ROLE_USER, ROLE_ADMIN]));
        assert!(!has_any_role(&roles, &[ROLE_ADMIN]));
    }

    #[test]
    fn empty_role_set_matches_nothing() {
        let roles: BTreeSet<String> = BTreeSet::new();
        assert!(!has_any_role(&roles, &[ROLE_USER]));
    }

    #[test]
    fn matching_is_exact() {
        let roles = BTreeSet::from(["role_user".to_string()]);
        assert!(!has_any_role(&roles, &[ROLE_USER]));
    }
}
