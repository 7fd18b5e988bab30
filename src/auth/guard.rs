// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 MindWell

//! Role-based authorization guard.

use super::{AuthError, AuthenticatedUser, Role};

/// Allow the operation only if `user` holds `role`.
///
/// Works purely on the roles already in the request context.
pub fn require_role(user: &AuthenticatedUser, role: Role) -> Result<(), AuthError> {
    if user.has_role(role) {
        Ok(())
    } else {
        tracing::info!(subject = %user.subject, required = %role, "Permission denied");
        Err(AuthError::Forbidden)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_is_forbidden_from_admin_operations() {
        let user = AuthenticatedUser::new("alice@example.com", [Role::User]);
        assert!(require_role(&user, Role::User).is_ok());
        assert!(matches!(
            require_role(&user, Role::Admin),
            Err(AuthError::Forbidden)
        ));
    }

    #[test]
    fn admin_does_not_imply_user() {
        let admin = AuthenticatedUser::new("root@example.com", [Role::Admin]);
        assert!(require_role(&admin, Role::Admin).is_ok());
        assert!(matches!(
            require_role(&admin, Role::User),
            Err(AuthError::Forbidden)
        ));
    }

    #[test]
    fn explicit_grants_combine() {
        let both = AuthenticatedUser::new("ops@example.com", [Role::Admin, Role::User]);
        assert!(require_role(&both, Role::Admin).is_ok());
        assert!(require_role(&both, Role::User).is_ok());
        assert!(require_role(&both, Role::Psychologist).is_err());
    }

    #[test]
    fn no_roles_means_no_access() {
        let nobody = AuthenticatedUser::new("nobody@example.com", []);
        assert!(require_role(&nobody, Role::User).is_err());
    }
}
