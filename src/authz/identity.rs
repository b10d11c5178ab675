//! Caller identity contract.

use axum::http::HeaderMap;

/// Who is making the request, as reported by the identity collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallerIdentity {
    Anonymous,
    User {
        /// Display name used in denial messaging.
        name: String,
        admin: bool,
    },
}

impl CallerIdentity {
    pub fn is_admin(&self) -> bool {
        matches!(self, CallerIdentity::User { admin: true, .. })
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, CallerIdentity::User { .. })
    }
}

/// External identity collaborator.
///
/// Supplies the current caller and the remediation URLs embedded in 403
/// responses. `destination` is the reconstructed URL of the denied request
/// so the caller lands back where they started after login/logout.
pub trait IdentityProvider: Send + Sync {
    fn current_user(&self, headers: &HeaderMap) -> CallerIdentity;

    fn create_login_url(&self, destination: &str) -> String;

    fn create_logout_url(&self, destination: &str) -> String;
}
