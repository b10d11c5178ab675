//! Route access decisions.

use crate::authz::identity::CallerIdentity;
use crate::routes::rule::LoginRequirement;

/// Outcome of evaluating a matched rule's access policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorizationDecision {
    Allow,
    Deny,
}

/// Evaluate a rule's login requirement against the caller.
///
/// First matching row wins: no requirement, admin caller, system-originated
/// request (task queue / scheduled work), then `Required` with any
/// authenticated caller. Everything else is denied.
pub fn authorize(
    login: LoginRequirement,
    caller: &CallerIdentity,
    system_originated: bool,
) -> AuthorizationDecision {
    if login == LoginRequirement::None {
        return AuthorizationDecision::Allow;
    }
    if caller.is_admin() {
        return AuthorizationDecision::Allow;
    }
    if system_originated {
        return AuthorizationDecision::Allow;
    }
    if login == LoginRequirement::Required && caller.is_authenticated() {
        return AuthorizationDecision::Allow;
    }
    AuthorizationDecision::Deny
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(admin: bool) -> CallerIdentity {
        CallerIdentity::User {
            name: "alice".to_string(),
            admin,
        }
    }

    #[test]
    fn no_requirement_allows_everyone() {
        for caller in [CallerIdentity::Anonymous, user(false), user(true)] {
            assert_eq!(
                authorize(LoginRequirement::None, &caller, false),
                AuthorizationDecision::Allow
            );
        }
    }

    #[test]
    fn admin_requirement_splits_on_admin_bit() {
        assert_eq!(
            authorize(LoginRequirement::Admin, &user(true), false),
            AuthorizationDecision::Allow
        );
        assert_eq!(
            authorize(LoginRequirement::Admin, &user(false), false),
            AuthorizationDecision::Deny
        );
        assert_eq!(
            authorize(LoginRequirement::Admin, &CallerIdentity::Anonymous, false),
            AuthorizationDecision::Deny
        );
    }

    #[test]
    fn required_needs_any_authenticated_caller() {
        assert_eq!(
            authorize(LoginRequirement::Required, &user(false), false),
            AuthorizationDecision::Allow
        );
        assert_eq!(
            authorize(LoginRequirement::Required, &CallerIdentity::Anonymous, false),
            AuthorizationDecision::Deny
        );
    }

    #[test]
    fn system_originated_requests_always_pass() {
        for login in [LoginRequirement::Required, LoginRequirement::Admin] {
            assert_eq!(
                authorize(login, &CallerIdentity::Anonymous, true),
                AuthorizationDecision::Allow
            );
        }
    }
}
