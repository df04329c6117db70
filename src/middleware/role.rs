//! Per-endpoint user eligibility checks.

use async_trait::async_trait;

use scoreboard_auth::{AuthenticatedUser, Role};

/// Decides whether an authenticated, verified caller may use an endpoint.
#[async_trait]
pub trait UserCheck: Send + Sync {
    async fn allows(&self, user: &AuthenticatedUser) -> bool;
}

/// Admits every caller.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnyUser;

#[async_trait]
impl UserCheck for AnyUser {
    async fn allows(&self, _user: &AuthenticatedUser) -> bool {
        true
    }
}

/// Admits callers holding the given role.
#[derive(Debug, Clone, Copy)]
pub struct RequireRole(pub Role);

#[async_trait]
impl UserCheck for RequireRole {
    async fn allows(&self, user: &AuthenticatedUser) -> bool {
        user.has_role(self.0)
    }
}

/// Admits callers holding any of the given roles.
#[derive(Debug, Clone)]
pub struct RequireAnyRole(pub Vec<Role>);

#[async_trait]
impl UserCheck for RequireAnyRole {
    async fn allows(&self, user: &AuthenticatedUser) -> bool {
        self.0.iter().any(|role| user.has_role(*role))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scoreboard_auth::UserName;

    fn user(role: Role) -> AuthenticatedUser {
        AuthenticatedUser {
            email: "role@test.com".to_string(),
            name: UserName {
                first: "Role".to_string(),
                middle: None,
                last: None,
            },
            role,
            verified: true,
        }
    }

    #[tokio::test]
    async fn test_require_role() {
        assert!(RequireRole(Role::Jury).allows(&user(Role::Jury)).await);
        assert!(!RequireRole(Role::Jury).allows(&user(Role::Competitor)).await);
    }

    #[tokio::test]
    async fn test_require_any_role() {
        let check = RequireAnyRole(vec![Role::Jury, Role::Competitor]);
        assert!(check.allows(&user(Role::Competitor)).await);
        assert!(!RequireAnyRole(vec![]).allows(&user(Role::Jury)).await);
    }

    #[tokio::test]
    async fn test_any_user() {
        assert!(AnyUser.allows(&user(Role::Competitor)).await);
    }
}
